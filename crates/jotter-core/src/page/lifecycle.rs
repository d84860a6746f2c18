//! Note page lifecycle as a pure reducer over explicit state snapshots.

use crate::models::Note;
use crate::page::navigation::NavTarget;

/// Where the page is in its life.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum NotePageState {
    /// Mounted, loader not resolved yet.
    #[default]
    Loading,
    /// Loader resolved without a (renderable) note.
    NotFound,
    /// Note present, possibly with unsaved local edits.
    Loaded(LoadedNote),
    /// A terminal action was persisted and navigation was issued.
    Navigating(NavTarget),
    /// The page was torn down; its local copy is gone.
    Unmounted,
}

/// Local working copy next to the last snapshot known to be persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedNote {
    note: Note,
    baseline: Note,
}

impl LoadedNote {
    pub fn new(note: Note) -> Self {
        Self {
            baseline: note.clone(),
            note,
        }
    }

    /// Working copy shown in the editor.
    pub const fn note(&self) -> &Note {
        &self.note
    }

    /// Last persisted snapshot.
    pub const fn baseline(&self) -> &Note {
        &self.baseline
    }

    /// Local text differs from what storage holds.
    pub fn is_dirty(&self) -> bool {
        self.note.text != self.baseline.text
    }
}

/// Inputs to the lifecycle reducer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageEvent {
    /// Load protocol finished.
    Resolved(Option<Note>),
    /// Editor reported new text.
    TextChanged(String),
    /// Storage acknowledged a save-class snapshot (save, pin, unpin).
    Persisted(Note),
    /// Archive/delete was persisted and navigation issued.
    Left(NavTarget),
    /// The page is going away.
    Unmount,
}

impl NotePageState {
    /// Next state for `event`. Events that do not apply leave the state as is.
    #[must_use]
    pub fn apply(self, event: PageEvent) -> Self {
        match (self, event) {
            (_, PageEvent::Unmount) => Self::Unmounted,
            (Self::Loading, PageEvent::Resolved(Some(note))) if !note.is_tombstone() => {
                Self::Loaded(LoadedNote::new(note))
            }
            (Self::Loading, PageEvent::Resolved(_)) => Self::NotFound,
            (Self::Loaded(mut loaded), PageEvent::TextChanged(text)) => {
                loaded.note.text = Some(text);
                Self::Loaded(loaded)
            }
            (Self::Loaded(loaded), PageEvent::Persisted(persisted)) => {
                // Keep keystrokes typed while the write was in flight.
                let note = Note {
                    text: loaded.note.text,
                    ..persisted.clone()
                };
                Self::Loaded(LoadedNote {
                    note,
                    baseline: persisted,
                })
            }
            (Self::Loaded(_), PageEvent::Left(target)) => Self::Navigating(target),
            (state, _) => state,
        }
    }

    pub const fn loaded(&self) -> Option<&LoadedNote> {
        match self {
            Self::Loaded(loaded) => Some(loaded),
            _ => None,
        }
    }

    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}
