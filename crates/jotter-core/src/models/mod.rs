//! Data models for Jotter

mod note;

pub use note::{Note, NoteId};
