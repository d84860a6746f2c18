//! Error types for jotter-core

use thiserror::Error;

/// Result type alias using jotter-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in jotter-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Storage facade rejected or failed a write
    #[error("Storage error: {0}")]
    Storage(String),

    /// A note action was triggered while the page had no note loaded
    #[error("No note is loaded on this page")]
    NoteNotLoaded,

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}
