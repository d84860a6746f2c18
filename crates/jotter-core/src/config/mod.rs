//! Note page configuration.
//!
//! Values come from an optional JSON file and are then overridden by
//! environment variables.

use std::env;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::normalize_text_option;
use crate::{Error, Result};

const ENV_SYNC_WAIT_MS: &str = "JOTTER_SYNC_WAIT_MS";
const ENV_DELETE_CONFIRMATION: &str = "JOTTER_DELETE_CONFIRMATION";

/// Ceiling for the pre-load sync wait.
pub const DEFAULT_SYNC_WAIT_MS: u64 = 5000;
pub const DEFAULT_DELETE_CONFIRMATION: &str = "Are you sure you want to delete this note?";
pub const DEFAULT_EDITOR_PLACEHOLDER: &str = "What's on you mind?";

/// Note page settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// How long the loader waits for a running sync before looking up a note.
    pub sync_wait_timeout_ms: u64,
    /// Prompt shown before a note is deleted.
    pub delete_confirmation: String,
    /// Placeholder for an empty editor.
    pub editor_placeholder: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            sync_wait_timeout_ms: DEFAULT_SYNC_WAIT_MS,
            delete_confirmation: DEFAULT_DELETE_CONFIRMATION.to_string(),
            editor_placeholder: DEFAULT_EDITOR_PLACEHOLDER.to_string(),
        }
    }
}

impl PageConfig {
    /// Load from an optional JSON file, then apply environment overrides.
    ///
    /// A path that does not exist yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) if path.exists() => parse_page_config(&std::fs::read_to_string(path)?)?,
            _ => Self::default(),
        };
        base.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from a key lookup (environment in production).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = normalize_text_option(lookup(ENV_SYNC_WAIT_MS)) {
            self.sync_wait_timeout_ms = raw.parse().map_err(|_| {
                Error::Config(format!("{ENV_SYNC_WAIT_MS} must be a whole number of milliseconds"))
            })?;
        }
        if let Some(message) = normalize_text_option(lookup(ENV_DELETE_CONFIRMATION)) {
            self.delete_confirmation = message;
        }
        Ok(self)
    }

    #[must_use]
    pub const fn sync_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.sync_wait_timeout_ms)
    }
}

/// Parse a page config from a raw JSON payload.
pub fn parse_page_config(payload: &str) -> Result<PageConfig> {
    if payload.trim().is_empty() {
        return Ok(PageConfig::default());
    }
    Ok(serde_json::from_str(payload)?)
}
