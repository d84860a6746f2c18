//! What the page shell shows: header actions and body.

use crate::models::Note;

pub const EDITOR_ID: &str = "note-editor";
pub const EDITOR_CLASS: &str = "text-input";

/// Controlled text input: shows `value`, reports every change back to the
/// page through `NotePage::change_text`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorProps {
    pub id: &'static str,
    pub class: &'static str,
    pub placeholder: String,
    pub value: String,
}

impl EditorProps {
    pub fn for_note(note: &Note, placeholder: &str) -> Self {
        Self {
            id: EDITOR_ID,
            class: EDITOR_CLASS,
            placeholder: placeholder.to_string(),
            value: note.text_or_empty().to_string(),
        }
    }
}

/// Header buttons, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageAction {
    Delete,
    Archive,
    Pin { pinned: bool },
    Save,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageMessage {
    Loading,
    NotFound,
}

impl PageMessage {
    pub const fn text(self) -> &'static str {
        match self {
            Self::Loading => "Loading...",
            Self::NotFound => "Not found",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageBody {
    Message(PageMessage),
    Editor(EditorProps),
    /// Nothing to show (page is leaving or gone).
    Blank,
}

/// Snapshot of the page chrome for one render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageView {
    pub header_actions: Vec<PageAction>,
    pub body: PageBody,
    /// Reset scroll position (first render after mount).
    pub scroll_to_top: bool,
}

impl PageView {
    pub fn message(message: PageMessage, scroll_to_top: bool) -> Self {
        Self {
            header_actions: Vec::new(),
            body: PageBody::Message(message),
            scroll_to_top,
        }
    }

    pub fn editor(note: &Note, placeholder: &str, scroll_to_top: bool) -> Self {
        Self {
            header_actions: vec![
                PageAction::Delete,
                PageAction::Archive,
                PageAction::Pin {
                    pinned: note.is_pinned(),
                },
                PageAction::Save,
            ],
            body: PageBody::Editor(EditorProps::for_note(note, placeholder)),
            scroll_to_top,
        }
    }

    pub const fn blank() -> Self {
        Self {
            header_actions: Vec::new(),
            body: PageBody::Blank,
            scroll_to_top: false,
        }
    }
}
