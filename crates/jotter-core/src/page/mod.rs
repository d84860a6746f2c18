//! Single-note page: load, edit, save, pin, archive and delete one note.
//!
//! [`NotePage`] is a cheap-to-clone handle. Every action snapshots the local
//! note when it is dispatched, awaits the dispatcher, then re-enters the
//! lifecycle reducer. Completions that arrive after [`NotePage::unmount`]
//! are dropped. The page offers no mutual exclusion between actions;
//! storage orders concurrent writes by `modification_date`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::actions::{ActionDispatcher, ActionLabel};
use crate::config::PageConfig;
use crate::models::Note;
use crate::storage::NoteStorage;
use crate::util::{compare_modification_dates, next_modification_date};
use crate::{Error, Result};

mod confirm;
mod lifecycle;
mod loader;
mod navigation;
mod view;

pub use confirm::{AlwaysConfirm, Confirm, ConfirmFuture, NeverConfirm};
pub use lifecycle::{LoadedNote, NotePageState, PageEvent};
pub use loader::load_note;
pub use navigation::{go_home, HistoryNavigator, NavTarget, Navigator, Route, RouteState, ROOT_PATH};
pub use view::{EditorProps, PageAction, PageBody, PageMessage, PageView, EDITOR_CLASS, EDITOR_ID};

/// Collaborators shared by every note page of an app.
pub struct PageContext<S> {
    pub dispatcher: ActionDispatcher<S>,
    pub navigator: Arc<dyn Navigator>,
    pub confirm: Arc<dyn Confirm>,
    pub config: PageConfig,
}

impl<S> Clone for PageContext<S> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            navigator: Arc::clone(&self.navigator),
            confirm: Arc::clone(&self.confirm),
            config: self.config.clone(),
        }
    }
}

/// How an action ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Persisted; the page adopted the snapshot and stays on the note.
    Persisted(ActionLabel),
    /// Persisted; the page navigated away.
    Left { label: ActionLabel, target: NavTarget },
    /// Persisted, but the page was unmounted or had already left.
    Detached(ActionLabel),
    /// The user declined the confirmation, or the page was gone by the time
    /// they answered; nothing was dispatched.
    Cancelled,
}

struct Local {
    state: NotePageState,
    last_stamp: Option<String>,
}

impl Local {
    /// Fresh timestamp after both the note's and the last one this page issued.
    fn next_stamp(&mut self, note: &Note) -> String {
        let previous = match self.last_stamp.as_deref() {
            Some(last) if compare_modification_dates(last, &note.modification_date).is_gt() => {
                last
            }
            _ => note.modification_date.as_str(),
        };
        let stamp = next_modification_date(Some(previous));
        self.last_stamp = Some(stamp.clone());
        stamp
    }
}

struct PageInner<S> {
    route: Route,
    context: PageContext<S>,
    local: Mutex<Local>,
    active: AtomicBool,
    scroll_reset_pending: AtomicBool,
}

/// Controller for one mounted note page.
pub struct NotePage<S> {
    inner: Arc<PageInner<S>>,
}

impl<S> Clone for NotePage<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: NoteStorage> NotePage<S> {
    /// Mount a page for `route` in the loading state.
    pub fn mount(route: Route, context: PageContext<S>) -> Self {
        tracing::debug!(note_id = %route.note_id, from_notes_page = route.state.from_notes_page, "mounting note page");
        Self {
            inner: Arc::new(PageInner {
                route,
                context,
                local: Mutex::new(Local {
                    state: NotePageState::Loading,
                    last_stamp: None,
                }),
                active: AtomicBool::new(true),
                scroll_reset_pending: AtomicBool::new(true),
            }),
        }
    }

    /// Mount and run the loader, like a router resolving data before paint.
    pub async fn open(route: Route, context: PageContext<S>) -> Result<Self> {
        let page = Self::mount(route, context);
        page.load().await?;
        Ok(page)
    }

    /// Run the load protocol and feed its result into the lifecycle.
    pub async fn load(&self) -> Result<()> {
        let found = load_note(
            self.inner.context.dispatcher.storage(),
            &self.inner.route.note_id,
            self.inner.context.config.sync_wait_timeout(),
        )
        .await?;
        if !self.commit(PageEvent::Resolved(found)) {
            tracing::debug!(note_id = %self.inner.route.note_id, "load finished after unmount");
        }
        Ok(())
    }

    pub fn route(&self) -> &Route {
        &self.inner.route
    }

    pub fn state(&self) -> NotePageState {
        self.local().state.clone()
    }

    /// Local working copy, when a note is loaded.
    pub fn note(&self) -> Option<Note> {
        self.local().state.loaded().map(|loaded| loaded.note().clone())
    }

    /// Whether the editor holds text that was not persisted yet.
    pub fn is_dirty(&self) -> bool {
        self.local()
            .state
            .loaded()
            .is_some_and(LoadedNote::is_dirty)
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::Acquire)
    }

    /// Editor change handler. Only touches local state.
    pub fn change_text(&self, text: impl Into<String>) {
        self.commit(PageEvent::TextChanged(text.into()));
    }

    /// Persist the current local snapshot.
    pub async fn save(&self) -> Result<ActionOutcome> {
        let snapshot = self.snapshot(|note, stamp| note.touched(stamp))?;
        self.persist(snapshot, ActionLabel::Saved).await
    }

    /// Flip the pinned flag. The header shows the new value only after
    /// storage acknowledged it.
    pub async fn toggle_pin(&self) -> Result<ActionOutcome> {
        let snapshot = self.snapshot(|note, stamp| note.pin_toggled(stamp))?;
        let label = if snapshot.is_pinned() {
            ActionLabel::Pinned
        } else {
            ActionLabel::Unpinned
        };
        self.persist(snapshot, label).await
    }

    /// Archive the note and leave the page.
    pub async fn archive(&self) -> Result<ActionOutcome> {
        let snapshot = self.snapshot(|note, stamp| note.archived(stamp))?;
        self.persist_and_leave(snapshot, ActionLabel::Archived).await
    }

    /// Ask for confirmation, then delete the note and leave the page.
    pub async fn delete(&self) -> Result<ActionOutcome> {
        if !self.local().state.is_loaded() {
            return Err(Error::NoteNotLoaded);
        }
        let context = &self.inner.context;
        if !context
            .confirm
            .confirm(&context.config.delete_confirmation)
            .await
        {
            tracing::debug!(note_id = %self.inner.route.note_id, "delete cancelled");
            return Ok(ActionOutcome::Cancelled);
        }
        // The page may have unmounted or left while the prompt was open.
        let snapshot = if self.is_active() {
            self.snapshot(|note, stamp| note.deleted(stamp)).ok()
        } else {
            None
        };
        let Some(snapshot) = snapshot else {
            tracing::debug!(note_id = %self.inner.route.note_id, "page gone before delete confirmed");
            return Ok(ActionOutcome::Cancelled);
        };
        self.persist_and_leave(snapshot, ActionLabel::Deleted).await
    }

    /// Header back affordance. Leaves without persisting local edits.
    pub fn go_home(&self) -> Option<NavTarget> {
        if !self.is_active() {
            return None;
        }
        let mut local = self.local();
        if matches!(
            local.state,
            NotePageState::Navigating(_) | NotePageState::Unmounted
        ) {
            return None;
        }
        let target = go_home(self.inner.context.navigator.as_ref(), self.inner.route.state);
        local.state = NotePageState::Navigating(target);
        Some(target)
    }

    /// Tear the page down. Pending actions still persist, but their
    /// completions no longer touch this page or navigate.
    pub fn unmount(&self) {
        self.inner.active.store(false, Ordering::Release);
        let mut local = self.local();
        local.state = std::mem::take(&mut local.state).apply(PageEvent::Unmount);
    }

    /// Current view model for the page shell.
    pub fn view(&self) -> PageView {
        let scroll_to_top = self.inner.scroll_reset_pending.swap(false, Ordering::AcqRel);
        let syncing = self.inner.context.dispatcher.store().syncing();
        let local = self.local();
        match &local.state {
            NotePageState::Loading => PageView::message(PageMessage::Loading, scroll_to_top),
            NotePageState::NotFound if syncing => {
                PageView::message(PageMessage::Loading, scroll_to_top)
            }
            NotePageState::NotFound => PageView::message(PageMessage::NotFound, scroll_to_top),
            NotePageState::Loaded(loaded) => PageView::editor(
                loaded.note(),
                &self.inner.context.config.editor_placeholder,
                scroll_to_top,
            ),
            NotePageState::Navigating(_) | NotePageState::Unmounted => PageView::blank(),
        }
    }

    fn local(&self) -> MutexGuard<'_, Local> {
        self.inner
            .local
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `event` unless the page is gone. Returns whether it was applied.
    fn commit(&self, event: PageEvent) -> bool {
        if !self.is_active() {
            return false;
        }
        let mut local = self.local();
        local.state = std::mem::take(&mut local.state).apply(event);
        true
    }

    /// Build the snapshot an action dispatches from the current local note.
    fn snapshot(&self, build: impl FnOnce(&Note, String) -> Note) -> Result<Note> {
        let mut local = self.local();
        let note = local
            .state
            .loaded()
            .map(|loaded| loaded.note().clone())
            .ok_or(Error::NoteNotLoaded)?;
        let stamp = local.next_stamp(&note);
        Ok(build(&note, stamp))
    }

    async fn persist(&self, snapshot: Note, label: ActionLabel) -> Result<ActionOutcome> {
        self.inner
            .context
            .dispatcher
            .save_note(&snapshot, label)
            .await?;

        if !self.is_active() {
            tracing::debug!(note_id = %snapshot.id, %label, "completion after unmount ignored");
            return Ok(ActionOutcome::Detached(label));
        }
        let mut local = self.local();
        if !local.state.is_loaded() {
            return Ok(ActionOutcome::Detached(label));
        }
        local.state = std::mem::take(&mut local.state).apply(PageEvent::Persisted(snapshot));
        Ok(ActionOutcome::Persisted(label))
    }

    async fn persist_and_leave(&self, snapshot: Note, label: ActionLabel) -> Result<ActionOutcome> {
        self.inner
            .context
            .dispatcher
            .save_note(&snapshot, label)
            .await?;

        if !self.is_active() {
            tracing::debug!(note_id = %snapshot.id, %label, "completion after unmount ignored");
            return Ok(ActionOutcome::Detached(label));
        }
        let mut local = self.local();
        if !local.state.is_loaded() {
            return Ok(ActionOutcome::Detached(label));
        }
        let target = go_home(self.inner.context.navigator.as_ref(), self.inner.route.state);
        local.state = std::mem::take(&mut local.state).apply(PageEvent::Left(target));
        Ok(ActionOutcome::Left { label, target })
    }
}

#[cfg(test)]
mod tests;
