//! Local note store backed by `SQLite`.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rusqlite::Connection;
use tokio::sync::watch;

use super::migrations;
use super::repository::SqliteNoteRepository;
use crate::models::{Note, NoteId};
use crate::state::SyncState;
use crate::storage::NoteStorage;
use crate::{Error, Result};

/// Thread-safe local note store.
///
/// Writes follow last-writer-wins on `modification_date`: a snapshot older
/// than the stored one is dropped. Queries run on the blocking pool.
#[derive(Clone)]
pub struct LocalStorage {
    inner: Arc<Inner>,
}

struct Inner {
    conn: Mutex<Connection>,
    sync: watch::Sender<SyncState>,
}

impl LocalStorage {
    /// Open an in-memory store (useful for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    /// Open a store at the given path, creating it if it doesn't exist
    ///
    /// Missing parent directories are created. Runs migrations automatically.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened note store");
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        Self::configure(&conn)?;
        migrations::run(&conn)?;
        let (sync, _) = watch::channel(SyncState::Offline);
        Ok(Self {
            inner: Arc::new(Inner {
                conn: Mutex::new(conn),
                sync,
            }),
        })
    }

    /// Configure `SQLite` for a single local writer
    fn configure(conn: &Connection) -> Result<()> {
        // In-memory databases report "memory" instead of switching to WAL
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(())
    }

    /// Run `query` against the connection on the blocking pool.
    async fn with_repository<T, F>(&self, query: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteNoteRepository<'_>) -> Result<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let conn = inner.conn.lock().unwrap_or_else(PoisonError::into_inner);
            let repo = SqliteNoteRepository::new(&conn);
            query(&repo)
        })
        .await
        .map_err(|e| Error::Storage(format!("storage task failed: {e}")))?
    }

    /// Subscribe to sync status changes (feeds [`crate::AppStore`]).
    pub fn sync_status(&self) -> watch::Receiver<SyncState> {
        self.inner.sync.subscribe()
    }

    /// Current sync status.
    pub fn sync_state(&self) -> SyncState {
        *self.inner.sync.borrow()
    }

    /// Mark a sync as running until the returned guard is dropped.
    pub fn begin_sync(&self) -> SyncGuard {
        self.inner.sync.send_replace(SyncState::Syncing);
        tracing::debug!("sync started");
        SyncGuard {
            inner: Arc::clone(&self.inner),
            outcome: SyncState::Synced,
        }
    }

    /// Create and persist a new note.
    pub async fn create_note(&self, text: &str) -> Result<Note> {
        let note = Note::new(text);
        self.put_note(&note).await?;
        Ok(note)
    }

    /// Notes that are not deleted, pinned first then newest first.
    pub async fn list_notes(&self, include_archived: bool) -> Result<Vec<Note>> {
        self.with_repository(move |repo| repo.list(include_archived))
            .await
    }

    /// Ids starting with `prefix`, at most `limit` of them.
    pub async fn note_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<NoteId>> {
        let prefix = prefix.to_string();
        self.with_repository(move |repo| repo.ids_by_prefix(&prefix, limit))
            .await
    }
}

impl NoteStorage for LocalStorage {
    fn syncing(&self) -> bool {
        self.sync_state().is_syncing()
    }

    async fn wait_till_sync_end(&self, timeout: Duration) -> bool {
        let mut sync = self.inner.sync.subscribe();
        tokio::time::timeout(timeout, async move {
            sync.wait_for(|state| !state.is_syncing()).await.is_ok()
        })
        .await
        .unwrap_or(false)
    }

    async fn get_note(&self, id: &NoteId) -> Result<Option<Note>> {
        let id = id.clone();
        self.with_repository(move |repo| repo.get(&id)).await
    }

    async fn put_note(&self, note: &Note) -> Result<()> {
        let incoming = note.clone();
        let applied = self
            .with_repository(move |repo| repo.upsert(&incoming))
            .await?;
        if !applied {
            tracing::debug!(
                note_id = %note.id,
                incoming = %note.modification_date,
                "dropping stale note write"
            );
        }
        Ok(())
    }
}

/// Running sync; ends the sync when dropped.
#[must_use = "the sync ends as soon as the guard is dropped"]
pub struct SyncGuard {
    inner: Arc<Inner>,
    outcome: SyncState,
}

impl SyncGuard {
    /// End the sync in the error state.
    pub fn fail(mut self) {
        self.outcome = SyncState::Error;
    }
}

impl Drop for SyncGuard {
    fn drop(&mut self) {
        tracing::debug!(outcome = ?self.outcome, "sync finished");
        self.inner.sync.send_replace(self.outcome);
    }
}
