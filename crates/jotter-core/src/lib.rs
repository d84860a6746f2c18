//! jotter-core - Core library for Jotter
//!
//! This crate contains the note model, the local-first storage facade, and
//! the single-note page controller used by every Jotter interface.

pub mod actions;
pub mod config;
pub mod error;
pub mod models;
pub mod page;
pub mod state;
pub mod storage;
pub mod util;

pub use actions::{ActionDispatcher, ActionLabel, ActionRecord};
pub use config::PageConfig;
pub use error::{Error, Result};
pub use models::{Note, NoteId};
pub use page::{ActionOutcome, NotePage, PageContext};
pub use state::{AppStore, SyncState};
pub use storage::{LocalStorage, NoteStorage};
