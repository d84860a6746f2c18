//! Storage facade consumed by note pages.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{Note, NoteId};
use crate::Result;

mod local;
mod migrations;
mod repository;

pub use local::{LocalStorage, SyncGuard};

/// Local-first note storage with a sync status flag.
pub trait NoteStorage: Send + Sync {
    /// Whether a sync with the remote side is in progress.
    fn syncing(&self) -> bool;

    /// Wait until sync ends or `timeout` elapses.
    ///
    /// Resolves `true` when no sync is running anymore, `false` on timeout.
    fn wait_till_sync_end(&self, timeout: Duration) -> impl Future<Output = bool> + Send;

    /// Point lookup by id. Deleted notes are still returned.
    fn get_note(&self, id: &NoteId) -> impl Future<Output = Result<Option<Note>>> + Send;

    /// Persist a complete note snapshot.
    fn put_note(&self, note: &Note) -> impl Future<Output = Result<()>> + Send;
}

impl<S: NoteStorage> NoteStorage for Arc<S> {
    fn syncing(&self) -> bool {
        (**self).syncing()
    }

    fn wait_till_sync_end(&self, timeout: Duration) -> impl Future<Output = bool> + Send {
        (**self).wait_till_sync_end(timeout)
    }

    fn get_note(&self, id: &NoteId) -> impl Future<Output = Result<Option<Note>>> + Send {
        (**self).get_note(id)
    }

    fn put_note(&self, note: &Note) -> impl Future<Output = Result<()>> + Send {
        (**self).put_note(note)
    }
}
