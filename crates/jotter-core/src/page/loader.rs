//! Route loader for the note page.

use std::time::Duration;

use crate::models::{Note, NoteId};
use crate::storage::NoteStorage;
use crate::Result;

/// Resolve the note a page is routed to.
///
/// A running sync may still rename or merge the note, so the lookup waits for
/// it first, at most `sync_wait`. Running out of patience is not an error;
/// the lookup happens either way. An unknown id resolves to `None`.
pub async fn load_note<S: NoteStorage>(
    storage: &S,
    id: &NoteId,
    sync_wait: Duration,
) -> Result<Option<Note>> {
    if storage.syncing() && !storage.wait_till_sync_end(sync_wait).await {
        tracing::debug!(note_id = %id, ?sync_wait, "sync still running, loading note anyway");
    }
    storage.get_note(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn loads_existing_note_without_sync() {
        let storage = LocalStorage::in_memory().unwrap();
        let note = storage.create_note("hello").await.unwrap();

        let loaded = load_note(&storage, &note.id, Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(loaded.map(|n| n.id), Some(note.id));
    }

    #[tokio::test]
    async fn missing_note_resolves_to_none() {
        let storage = LocalStorage::in_memory().unwrap();
        let loaded = load_note(&storage, &NoteId::from("missing"), Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn waits_for_sync_before_lookup() {
        let storage = LocalStorage::in_memory().unwrap();
        let guard = storage.begin_sync();
        let mut synced = Note::new("arrived with sync");
        synced.id = NoteId::from("n-sync");

        let loader = load_note(&storage, &synced.id, Duration::from_secs(5));
        let sync = async {
            tokio::task::yield_now().await;
            storage.put_note(&synced).await.unwrap();
            drop(guard);
        };
        let (loaded, ()) = tokio::join!(loader, sync);

        assert_eq!(loaded.unwrap(), Some(synced));
    }

    #[tokio::test]
    async fn wait_timeout_still_looks_up() {
        let storage = LocalStorage::in_memory().unwrap();
        let note = storage.create_note("already here").await.unwrap();
        let _guard = storage.begin_sync();

        let loaded = load_note(&storage, &note.id, Duration::from_millis(20))
            .await
            .unwrap();
        assert!(storage.syncing());
        assert_eq!(loaded, Some(note));
    }
}
