//! Routes into the note page and the way back out.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::models::NoteId;

pub const ROOT_PATH: &str = "/";

/// Route parameters and state for the note page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub note_id: NoteId,
    #[serde(default)]
    pub state: RouteState,
}

impl Route {
    pub const fn new(note_id: NoteId) -> Self {
        Self {
            note_id,
            state: RouteState {
                from_notes_page: false,
            },
        }
    }

    /// Mark the route as entered from the notes list.
    #[must_use]
    pub const fn from_notes_page(mut self, from_notes_page: bool) -> Self {
        self.state.from_notes_page = from_notes_page;
        self
    }

    /// Path the note page lives at.
    pub fn path(&self) -> String {
        format!("/n/{}", self.note_id)
    }
}

/// History state carried along with a route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteState {
    pub from_notes_page: bool,
}

/// Where the page went when it left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavTarget {
    /// One step back in history (to the list it came from).
    Back,
    /// The application root.
    Root,
}

/// Router capability used by pages.
pub trait Navigator: Send + Sync {
    /// Go back one history entry.
    fn back(&self);

    /// Push `path` onto the history.
    fn navigate(&self, path: &str);
}

/// Leave the page: back to the list when it sent us here, else to the root.
pub fn go_home(navigator: &dyn Navigator, state: RouteState) -> NavTarget {
    if state.from_notes_page {
        navigator.back();
        NavTarget::Back
    } else {
        navigator.navigate(ROOT_PATH);
        NavTarget::Root
    }
}

/// In-memory history stack.
#[derive(Debug)]
pub struct HistoryNavigator {
    entries: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    /// History starting at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            entries: Mutex::new(vec![path.into()]),
        }
    }

    /// History as if `route` was opened from the notes list at `/`.
    pub fn entered_from_list(route: &Route) -> Self {
        let history = Self::new(ROOT_PATH);
        history.navigate(&route.path());
        history
    }

    /// Current location.
    pub fn current(&self) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for HistoryNavigator {
    fn back(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() > 1 {
            entries.pop();
        }
    }

    fn navigate(&self, path: &str) {
        tracing::debug!(path, "navigate");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}
