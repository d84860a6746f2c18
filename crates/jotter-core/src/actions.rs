//! Note mutations routed through storage with a feedback label.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::{Note, NoteId};
use crate::state::AppStore;
use crate::storage::NoteStorage;
use crate::Result;

/// Kind of change a dispatched snapshot represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionLabel {
    Saved,
    Archived,
    Pinned,
    Unpinned,
    Deleted,
}

impl ActionLabel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Archived => "archived",
            Self::Pinned => "pinned",
            Self::Unpinned => "unpinned",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted note action, kept for toasts and undo surfaces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub note_id: NoteId,
    pub label: ActionLabel,
    /// `modification_date` of the persisted snapshot
    pub at: String,
}

impl ActionRecord {
    /// User-facing feedback line, e.g. "Note pinned".
    #[must_use]
    pub fn message(&self) -> String {
        format!("Note {}", self.label)
    }
}

/// Persists note snapshots and records what kind of change they were.
pub struct ActionDispatcher<S> {
    storage: Arc<S>,
    store: Arc<AppStore>,
}

impl<S> Clone for ActionDispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: NoteStorage> ActionDispatcher<S> {
    pub const fn new(storage: Arc<S>, store: Arc<AppStore>) -> Self {
        Self { storage, store }
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn store(&self) -> &Arc<AppStore> {
        &self.store
    }

    /// Persist `note` and record `label` once storage acknowledges.
    ///
    /// Storage failures are returned untouched; nothing is recorded.
    pub async fn save_note(&self, note: &Note, label: ActionLabel) -> Result<()> {
        self.storage.put_note(note).await?;
        self.store.record_action(ActionRecord {
            note_id: note.id.clone(),
            label,
            at: note.modification_date.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;

    #[test]
    fn labels_render_lowercase() {
        assert_eq!(ActionLabel::Unpinned.to_string(), "unpinned");
        assert_eq!(
            serde_json::to_string(&ActionLabel::Archived).unwrap(),
            "\"archived\""
        );
    }

    #[test]
    fn record_message_mentions_label() {
        let record = ActionRecord {
            note_id: NoteId::from("n1"),
            label: ActionLabel::Deleted,
            at: "2024-01-01T00:00:00.000Z".to_string(),
        };
        assert_eq!(record.message(), "Note deleted");
    }

    #[tokio::test]
    async fn save_note_persists_and_records() {
        let storage = Arc::new(LocalStorage::in_memory().unwrap());
        let store = Arc::new(AppStore::new(storage.sync_status()));
        let dispatcher = ActionDispatcher::new(Arc::clone(&storage), Arc::clone(&store));

        let note = Note::new("draft");
        dispatcher.save_note(&note, ActionLabel::Saved).await.unwrap();

        assert_eq!(storage.get_note(&note.id).await.unwrap(), Some(note.clone()));
        let record = store.last_record().unwrap();
        assert_eq!(record.note_id, note.id);
        assert_eq!(record.label, ActionLabel::Saved);
        assert_eq!(record.at, note.modification_date);
    }
}
