//! Shared application state.
//!
//! The store is an explicit container handed to pages by reference. Pages
//! only read sync status from it; the storage layer owns the sender side.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

use crate::actions::ActionRecord;
use crate::error::Error;

/// Number of action records kept for feedback/undo surfaces.
const FEEDBACK_CAPACITY: usize = 50;

/// Unified sync state reported by the storage layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Offline,
    Syncing,
    Synced,
    Error,
}

impl SyncState {
    #[must_use]
    pub const fn is_syncing(self) -> bool {
        matches!(self, Self::Syncing)
    }
}

/// Application store shared by every page.
#[derive(Debug)]
pub struct AppStore {
    sync: watch::Receiver<SyncState>,
    records: Mutex<VecDeque<ActionRecord>>,
    last_failure: Mutex<Option<String>>,
}

impl AppStore {
    /// Build a store that follows the given sync status channel.
    pub fn new(sync: watch::Receiver<SyncState>) -> Self {
        Self {
            sync,
            records: Mutex::new(VecDeque::with_capacity(FEEDBACK_CAPACITY)),
            last_failure: Mutex::new(None),
        }
    }

    /// Current sync status.
    pub fn sync_state(&self) -> SyncState {
        *self.sync.borrow()
    }

    /// Whether a sync is in progress right now.
    pub fn syncing(&self) -> bool {
        self.sync_state().is_syncing()
    }

    /// Resolve once no sync is in progress.
    ///
    /// Returns immediately when the storage side of the channel is gone.
    pub async fn wait_until_idle(&self) {
        let mut sync = self.sync.clone();
        let _ = sync.wait_for(|state| !state.is_syncing()).await;
    }

    /// Record a completed note action for feedback surfaces.
    pub fn record_action(&self, record: ActionRecord) {
        tracing::info!(note_id = %record.note_id, label = %record.label, "{}", record.message());
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        if records.len() == FEEDBACK_CAPACITY {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// Recorded actions, oldest first.
    pub fn records(&self) -> Vec<ActionRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Most recent recorded action.
    pub fn last_record(&self) -> Option<ActionRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .back()
            .cloned()
    }

    /// Global handler for failures that note actions let surface.
    pub fn report_failure(&self, error: &Error) {
        tracing::error!(%error, "note action failed");
        *self
            .last_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error.to_string());
    }

    /// Message of the last reported failure.
    pub fn last_failure(&self) -> Option<String> {
        self.last_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
