//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;
use crate::util::iso_timestamp;

/// Opaque note identifier, stable for the note's lifetime
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Create a new unique note ID (UUID v4)
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NoteId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("note id cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A note in the system
///
/// Flags are kept as integers on the wire (`1` set, `0` cleared) and any
/// non-zero value reads as set. `not_archived` and `not_deleted` are
/// inverted: a truthy value means the note is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,
    /// Plain text content; `None` once the note is deleted
    pub text: Option<String>,
    /// Creation timestamp (ISO-8601, UTC)
    pub creation_date: String,
    /// Last modification timestamp (ISO-8601, UTC)
    pub modification_date: String,
    /// Sort key used by note lists
    #[serde(default)]
    pub order: i64,
    /// `1` while the note is not deleted
    pub not_deleted: u8,
    /// `1` while the note is not archived
    pub not_archived: u8,
    /// `1` when pinned
    pub pinned: u8,
}

impl Note {
    /// Create a new active note with the given text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        let stamp = iso_timestamp(now);
        Self {
            id: NoteId::new(),
            text: Some(text.into()),
            creation_date: stamp.clone(),
            modification_date: stamp,
            order: now.timestamp_millis(),
            not_deleted: 1,
            not_archived: 1,
            pinned: 0,
        }
    }

    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        self.pinned != 0
    }

    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.not_archived == 0
    }

    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.not_deleted == 0
    }

    /// Deleted and stripped of its text. The page never renders a tombstone.
    #[must_use]
    pub const fn is_tombstone(&self) -> bool {
        self.text.is_none() && self.is_deleted()
    }

    /// Text as shown in an editor (empty for tombstones)
    #[must_use]
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Copy with replaced text
    #[must_use]
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..self.clone()
        }
    }

    /// Copy stamped with a new modification date
    #[must_use]
    pub fn touched(&self, modification_date: impl Into<String>) -> Self {
        Self {
            modification_date: modification_date.into(),
            ..self.clone()
        }
    }

    /// Copy with `pinned` flipped and a new modification date
    #[must_use]
    pub fn pin_toggled(&self, modification_date: impl Into<String>) -> Self {
        Self {
            pinned: u8::from(!self.is_pinned()),
            ..self.touched(modification_date)
        }
    }

    /// Archived copy with a new modification date
    #[must_use]
    pub fn archived(&self, modification_date: impl Into<String>) -> Self {
        Self {
            not_archived: 0,
            ..self.touched(modification_date)
        }
    }

    /// Tombstone copy with a new modification date
    #[must_use]
    pub fn deleted(&self, modification_date: impl Into<String>) -> Self {
        Self {
            text: None,
            not_deleted: 0,
            ..self.touched(modification_date)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_id_unique() {
        let id1 = NoteId::new();
        let id2 = NoteId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_note_id_parse_rejects_blank() {
        assert!("   ".parse::<NoteId>().is_err());
        let parsed: NoteId = " n1 ".parse().unwrap();
        assert_eq!(parsed.as_str(), "n1");
    }

    #[test]
    fn test_note_new() {
        let note = Note::new("Hello world");
        assert_eq!(note.text.as_deref(), Some("Hello world"));
        assert!(!note.is_deleted());
        assert!(!note.is_archived());
        assert!(!note.is_pinned());
        assert_eq!(note.creation_date, note.modification_date);
        assert!(note.order > 0);
    }

    #[test]
    fn test_copies_leave_source_untouched() {
        let note = Note::new("keep me");
        let deleted = note.deleted("2030-01-01T00:00:00.000Z");

        assert!(deleted.is_tombstone());
        assert_eq!(deleted.modification_date, "2030-01-01T00:00:00.000Z");
        assert_eq!(note.text.as_deref(), Some("keep me"));
        assert!(!note.is_deleted());
    }

    #[test]
    fn test_pin_toggled_flips_flag() {
        let note = Note::new("pin");
        let pinned = note.pin_toggled("2030-01-01T00:00:00.000Z");
        assert!(pinned.is_pinned());
        assert!(!pinned.pin_toggled("2030-01-01T00:00:00.001Z").is_pinned());
    }

    #[test]
    fn test_nonzero_flags_read_as_set() {
        let mut note = Note::new("flags");
        note.pinned = 2;
        note.not_archived = 7;
        assert!(note.is_pinned());
        assert!(!note.is_archived());
    }

    #[test]
    fn test_serializes_deleted_text_as_null() {
        let note = Note::new("bye").deleted("2030-01-01T00:00:00.000Z");
        let json = serde_json::to_value(&note).unwrap();
        assert!(json["text"].is_null());
        assert_eq!(json["not_deleted"], 0);
        assert_eq!(json["id"], note.id.as_str());
    }
}
