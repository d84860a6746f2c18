use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use jotter_core::page::{
    Confirm, HistoryNavigator, NavTarget, Navigator, PageAction, PageBody, PageView, Route,
};
use jotter_core::util::parse_iso;
use jotter_core::{
    ActionDispatcher, ActionLabel, ActionOutcome, AppStore, LocalStorage, Note, NoteId, NotePage,
    NoteStorage, PageConfig, PageContext,
};
use serde::Serialize;

use crate::error::CliError;

const ENV_DATA_PATH: &str = "JOTTER_DATA_PATH";
const ENV_CONFIG_PATH: &str = "JOTTER_CONFIG";

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub preview: String,
    pub text: String,
    pub pinned: bool,
    pub archived: bool,
    pub modification_date: String,
    pub relative_time: String,
}

/// Storage, store and page settings shared by every command of one run.
pub struct App {
    storage: Arc<LocalStorage>,
    store: Arc<AppStore>,
    config: PageConfig,
}

/// A mounted note page together with the history it navigates.
pub struct OpenedPage {
    pub page: NotePage<LocalStorage>,
    pub history: Arc<HistoryNavigator>,
}

impl App {
    pub fn open(data_path: &Path, config_path: Option<&Path>) -> Result<Self, CliError> {
        let storage = LocalStorage::open_path(data_path)?;
        let config = PageConfig::load(config_path)?;
        Ok(Self::from_parts(storage, config))
    }

    pub fn from_parts(storage: LocalStorage, config: PageConfig) -> Self {
        let store = Arc::new(AppStore::new(storage.sync_status()));
        Self {
            storage: Arc::new(storage),
            store,
            config,
        }
    }

    pub const fn storage(&self) -> &Arc<LocalStorage> {
        &self.storage
    }

    pub const fn store(&self) -> &Arc<AppStore> {
        &self.store
    }

    pub fn context(
        &self,
        navigator: Arc<dyn Navigator>,
        confirm: Arc<dyn Confirm>,
    ) -> PageContext<LocalStorage> {
        PageContext {
            dispatcher: ActionDispatcher::new(Arc::clone(&self.storage), Arc::clone(&self.store)),
            navigator,
            confirm,
            config: self.config.clone(),
        }
    }

    /// Resolve a full id or a unique id prefix.
    pub async fn resolve_note_id(&self, note_query: &str) -> Result<NoteId, CliError> {
        let note_query = normalize_note_identifier(note_query)?;
        let note_id = note_query.parse::<NoteId>()?;
        if self.storage.get_note(&note_id).await?.is_some() {
            return Ok(note_id);
        }

        let mut matching_ids = self.storage.note_ids_by_prefix(&note_query, 3).await?;
        match matching_ids.len() {
            0 => Err(CliError::NoteNotFound(note_query)),
            1 => Ok(matching_ids.remove(0)),
            _ => {
                let options = matching_ids
                    .iter()
                    .map(|id| id.as_str().chars().take(13).collect::<String>())
                    .collect::<Vec<_>>()
                    .join(", ");

                Err(CliError::AmbiguousNoteId(format!(
                    "ID prefix '{note_query}' is ambiguous; matches: {options}"
                )))
            }
        }
    }

    /// Route to the note page and run its loader.
    pub async fn open_page(
        &self,
        note_query: &str,
        from_list: bool,
        confirm: Arc<dyn Confirm>,
    ) -> Result<OpenedPage, CliError> {
        let note_id = self.resolve_note_id(note_query).await?;
        let route = Route::new(note_id).from_notes_page(from_list);
        let history = Arc::new(if from_list {
            HistoryNavigator::entered_from_list(&route)
        } else {
            HistoryNavigator::new(route.path())
        });
        let navigator: Arc<dyn Navigator> = history.clone();
        let page = NotePage::open(route, self.context(navigator, confirm)).await?;
        Ok(OpenedPage { page, history })
    }
}

impl OpenedPage {
    /// Text rendition of the page once no running sync can still change it.
    ///
    /// A terminal prints once, so a missing note is only reported after the
    /// sync that could have delivered it has ended.
    pub async fn settled_lines(&self, store: &AppStore) -> Vec<String> {
        if !self.page.state().is_loaded() && store.syncing() {
            store.wait_until_idle().await;
        }
        render_view(&self.page.view())
    }

    /// Lines describing how an action ended.
    pub fn report(&self, outcome: ActionOutcome, store: &AppStore) -> Vec<String> {
        let feedback = |label: ActionLabel| {
            store
                .last_record()
                .map_or_else(|| format!("Note {label}"), |record| record.message())
        };
        match outcome {
            ActionOutcome::Persisted(label) | ActionOutcome::Detached(label) => {
                vec![feedback(label)]
            }
            ActionOutcome::Left { label, target } => {
                let location = self.history.current().unwrap_or_default();
                let how = match target {
                    NavTarget::Back => "back to",
                    NavTarget::Root => "home at",
                };
                vec![feedback(label), format!("-> {how} {location}")]
            }
            ActionOutcome::Cancelled => vec!["Delete cancelled".to_string()],
        }
    }
}

/// Text rendition of the page: header actions, then the body.
pub fn render_view(view: &PageView) -> Vec<String> {
    let mut lines = Vec::new();
    if !view.header_actions.is_empty() {
        lines.push(
            view.header_actions
                .iter()
                .map(|action| format!("[{}]", action_name(*action)))
                .collect::<Vec<_>>()
                .join(" "),
        );
    }
    match &view.body {
        PageBody::Message(message) => lines.push(message.text().to_string()),
        PageBody::Editor(editor) if editor.value.is_empty() => {
            lines.push(editor.placeholder.clone());
        }
        PageBody::Editor(editor) => lines.extend(editor.value.lines().map(str::to_string)),
        PageBody::Blank => {}
    }
    lines
}

const fn action_name(action: PageAction) -> &'static str {
    match action {
        PageAction::Delete => "delete",
        PageAction::Archive => "archive",
        PageAction::Pin { pinned: true } => "unpin",
        PageAction::Pin { pinned: false } => "pin",
        PageAction::Save => "save",
    }
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

pub fn format_note_lines(notes: &[Note]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    notes
        .iter()
        .map(|note| {
            let short_id = note.id.as_str().chars().take(13).collect::<String>();
            let marker = if note.is_pinned() { "*" } else { " " };
            let preview = note_preview(note, 40);
            let relative_time = relative_modification_time(note, now_ms);

            if note.is_archived() {
                format!("{marker} {short_id:<13}  {preview:<40}  {relative_time:<10}  (archived)")
            } else {
                format!("{marker} {short_id:<13}  {preview:<40}  {relative_time}")
            }
        })
        .collect()
}

pub fn note_to_list_item(note: &Note) -> NoteListItem {
    let now_ms = Utc::now().timestamp_millis();

    NoteListItem {
        id: note.id.to_string(),
        preview: note_preview(note, 80),
        text: note.text_or_empty().to_string(),
        pinned: note.is_pinned(),
        archived: note.is_archived(),
        modification_date: note.modification_date.clone(),
        relative_time: relative_modification_time(note, now_ms),
    }
}

fn relative_modification_time(note: &Note, now_ms: i64) -> String {
    parse_iso(&note.modification_date).map_or_else(
        || note.modification_date.clone(),
        |date| format_relative_time(date.timestamp_millis(), now_ms),
    )
}

pub fn note_preview(note: &Note, max_chars: usize) -> String {
    let first_line = note.text_or_empty().lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < year {
        format!("{}w ago", diff / week)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn resolve_note_content(content_parts: &[String]) -> Result<String, CliError> {
    if let Some(content) = normalize_content(&content_parts.join(" ")) {
        return Ok(content);
    }

    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }

    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_note_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyNoteId)
    } else {
        Ok(trimmed.to_string())
    }
}

fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn resolve_data_path(cli_data_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = cli_data_path.or_else(|| env::var_os(ENV_DATA_PATH).map(PathBuf::from)) {
        return Ok(path);
    }
    dirs::data_dir()
        .map(|dir| dir.join("jotter").join("jotter.db"))
        .ok_or_else(|| CliError::Config("Failed to resolve data directory".to_string()))
}

/// Explicit path, then `JOTTER_CONFIG`, then the per-user config directory.
pub fn resolve_config_path(cli_config_path: Option<PathBuf>) -> Option<PathBuf> {
    cli_config_path
        .or_else(|| env::var_os(ENV_CONFIG_PATH).map(PathBuf::from))
        .or_else(|| dirs::config_dir().map(|dir| dir.join("jotter").join("config.json")))
}
