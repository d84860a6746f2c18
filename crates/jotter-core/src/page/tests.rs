use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::sync::Notify;

use super::*;
use crate::models::NoteId;
use crate::state::AppStore;
use crate::storage::LocalStorage;

struct Harness<S> {
    storage: Arc<S>,
    store: Arc<AppStore>,
    history: Arc<HistoryNavigator>,
}

impl<S: NoteStorage> Harness<S> {
    fn context(&self, confirm: Arc<dyn Confirm>) -> PageContext<S> {
        let navigator: Arc<dyn Navigator> = self.history.clone();
        PageContext {
            dispatcher: ActionDispatcher::new(Arc::clone(&self.storage), Arc::clone(&self.store)),
            navigator,
            confirm,
            config: PageConfig {
                sync_wait_timeout_ms: 20,
                ..PageConfig::default()
            },
        }
    }

    async fn open(&self, route: Route) -> NotePage<S> {
        NotePage::open(route, self.context(Arc::new(AlwaysConfirm)))
            .await
            .unwrap()
    }
}

fn local_harness(route: &Route) -> Harness<LocalStorage> {
    let storage = LocalStorage::in_memory().unwrap();
    let store = Arc::new(AppStore::new(storage.sync_status()));
    Harness {
        storage: Arc::new(storage),
        store,
        history: Arc::new(HistoryNavigator::entered_from_list(route)),
    }
}

fn note(id: &str, text: &str) -> Note {
    let mut note = Note::new(text);
    note.id = NoteId::from(id);
    note.modification_date = "2024-01-01T00:00:00.000Z".to_string();
    note
}

/// Storage whose writes wait until the test releases them.
struct GatedStorage {
    inner: LocalStorage,
    gate: Notify,
}

impl NoteStorage for GatedStorage {
    fn syncing(&self) -> bool {
        self.inner.syncing()
    }

    async fn wait_till_sync_end(&self, timeout: Duration) -> bool {
        self.inner.wait_till_sync_end(timeout).await
    }

    async fn get_note(&self, id: &NoteId) -> Result<Option<Note>> {
        self.inner.get_note(id).await
    }

    async fn put_note(&self, note: &Note) -> Result<()> {
        self.gate.notified().await;
        self.inner.put_note(note).await
    }
}

/// Storage that reads fine but refuses every write.
struct ReadOnlyStorage {
    inner: LocalStorage,
}

impl NoteStorage for ReadOnlyStorage {
    fn syncing(&self) -> bool {
        false
    }

    async fn wait_till_sync_end(&self, _timeout: Duration) -> bool {
        true
    }

    async fn get_note(&self, id: &NoteId) -> Result<Option<Note>> {
        self.inner.get_note(id).await
    }

    async fn put_note(&self, _note: &Note) -> Result<()> {
        Err(Error::Storage("disk is read-only".to_string()))
    }
}

/// Confirmation that answers yes once the test releases it.
struct GatedConfirm {
    gate: Notify,
}

impl Confirm for GatedConfirm {
    fn confirm<'a>(&'a self, _message: &'a str) -> ConfirmFuture<'a> {
        Box::pin(async move {
            self.gate.notified().await;
            true
        })
    }
}

#[tokio::test]
async fn edited_text_is_saved_with_fresh_date() {
    let route = Route::new(NoteId::from("n1")).from_notes_page(true);
    let harness = local_harness(&route);
    harness.storage.put_note(&note("n1", "hello")).await.unwrap();

    let page = harness.open(route).await;
    page.change_text("hello world");
    assert!(page.is_dirty());
    assert!(harness.store.records().is_empty());

    let outcome = page.save().await.unwrap();
    assert_eq!(outcome, ActionOutcome::Persisted(ActionLabel::Saved));

    let stored = harness
        .storage
        .get_note(&NoteId::from("n1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.text.as_deref(), Some("hello world"));
    assert!(stored.modification_date > "2024-01-01T00:00:00.000Z".to_string());
    assert_eq!(stored.pinned, 0);
    assert!(page.state().is_loaded());
    assert!(!page.is_dirty());
    assert_eq!(harness.store.last_record().unwrap().message(), "Note saved");
}

#[tokio::test]
async fn pinned_note_is_unpinned() {
    let route = Route::new(NoteId::from("n2"));
    let harness = local_harness(&route);
    let mut pinned = note("n2", "x");
    pinned.pinned = 1;
    harness.storage.put_note(&pinned).await.unwrap();

    let page = harness.open(route).await;
    let outcome = page.toggle_pin().await.unwrap();
    assert_eq!(outcome, ActionOutcome::Persisted(ActionLabel::Unpinned));

    let stored = harness
        .storage
        .get_note(&NoteId::from("n2"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.pinned, 0);
    assert_eq!(stored.text.as_deref(), Some("x"));
    assert!(page
        .view()
        .header_actions
        .contains(&PageAction::Pin { pinned: false }));
}

#[tokio::test]
async fn pin_twice_restores_flag_with_increasing_dates() {
    let route = Route::new(NoteId::from("n3"));
    let harness = local_harness(&route);
    harness.storage.put_note(&note("n3", "x")).await.unwrap();
    let page = harness.open(route).await;

    page.toggle_pin().await.unwrap();
    let first = page.note().unwrap().modification_date;
    page.toggle_pin().await.unwrap();
    let second = page.note().unwrap().modification_date;

    assert!(second > first);
    let stored = harness
        .storage
        .get_note(&NoteId::from("n3"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.pinned, 0);
    assert_eq!(stored.modification_date, second);
    let labels = harness
        .store
        .records()
        .into_iter()
        .map(|record| record.label)
        .collect::<Vec<_>>();
    assert_eq!(labels, vec![ActionLabel::Pinned, ActionLabel::Unpinned]);
}

#[tokio::test]
async fn saving_twice_keeps_text_and_advances_date() {
    let route = Route::new(NoteId::from("n4"));
    let harness = local_harness(&route);
    harness.storage.put_note(&note("n4", "same")).await.unwrap();
    let page = harness.open(route).await;

    page.save().await.unwrap();
    let first = harness.storage.get_note(&NoteId::from("n4")).await.unwrap().unwrap();
    page.save().await.unwrap();
    let second = harness.storage.get_note(&NoteId::from("n4")).await.unwrap().unwrap();

    assert_eq!(first.text, second.text);
    assert!(second.modification_date > first.modification_date);
}

#[tokio::test]
async fn unknown_note_renders_not_found() {
    let route = Route::new(NoteId::from("ghost"));
    let harness = local_harness(&route);
    let page = harness.open(route).await;

    assert_eq!(page.state(), NotePageState::NotFound);
    let view = page.view();
    assert_eq!(view.body, PageBody::Message(PageMessage::NotFound));
    assert!(view.header_actions.is_empty());
    assert!(matches!(page.save().await, Err(Error::NoteNotLoaded)));
}

#[tokio::test]
async fn missing_note_shows_loading_while_sync_runs() {
    let route = Route::new(NoteId::from("later"));
    let harness = local_harness(&route);
    let guard = harness.storage.begin_sync();

    let page = harness.open(route).await;
    assert_eq!(page.state(), NotePageState::NotFound);
    assert_eq!(page.view().body, PageBody::Message(PageMessage::Loading));

    drop(guard);
    assert_eq!(page.view().body, PageBody::Message(PageMessage::NotFound));
}

#[tokio::test]
async fn deleted_note_is_not_rendered() {
    let route = Route::new(NoteId::from("gone"));
    let harness = local_harness(&route);
    let tombstone = note("gone", "x").deleted("2024-01-02T00:00:00.000Z");
    harness.storage.put_note(&tombstone).await.unwrap();

    let page = harness.open(route).await;
    assert_eq!(page.view().body, PageBody::Message(PageMessage::NotFound));
}

#[tokio::test]
async fn loaded_view_lists_actions_and_resets_scroll_once() {
    let route = Route::new(NoteId::from("n5"));
    let harness = local_harness(&route);
    harness.storage.put_note(&note("n5", "body")).await.unwrap();
    let page = harness.open(route).await;

    let first = page.view();
    assert!(first.scroll_to_top);
    assert_eq!(
        first.header_actions,
        vec![
            PageAction::Delete,
            PageAction::Archive,
            PageAction::Pin { pinned: false },
            PageAction::Save,
        ]
    );
    let PageBody::Editor(editor) = first.body else {
        panic!("expected editor body");
    };
    assert_eq!(editor.value, "body");
    assert_eq!(editor.id, EDITOR_ID);
    assert_eq!(editor.placeholder, "What's on you mind?");

    assert!(!page.view().scroll_to_top);
}

#[tokio::test]
async fn archive_goes_back_to_the_list() {
    let route = Route::new(NoteId::from("n6")).from_notes_page(true);
    let harness = local_harness(&route);
    harness.storage.put_note(&note("n6", "old")).await.unwrap();
    let page = harness.open(route).await;

    let outcome = page.archive().await.unwrap();
    assert_eq!(
        outcome,
        ActionOutcome::Left {
            label: ActionLabel::Archived,
            target: NavTarget::Back,
        }
    );
    assert_eq!(harness.history.entries(), vec![ROOT_PATH.to_string()]);
    assert_eq!(page.view(), PageView::blank());

    let stored = harness.storage.get_note(&NoteId::from("n6")).await.unwrap().unwrap();
    assert!(stored.is_archived());
    assert_eq!(stored.text.as_deref(), Some("old"));
}

#[tokio::test]
async fn delete_goes_to_root_when_opened_directly() {
    let route = Route::new(NoteId::from("n7"));
    let harness = Harness {
        history: Arc::new(HistoryNavigator::new(route.path())),
        ..local_harness(&route)
    };
    harness.storage.put_note(&note("n7", "bye")).await.unwrap();
    let page = harness.open(route).await;

    let outcome = page.delete().await.unwrap();
    assert_eq!(
        outcome,
        ActionOutcome::Left {
            label: ActionLabel::Deleted,
            target: NavTarget::Root,
        }
    );
    assert_eq!(harness.history.current().as_deref(), Some(ROOT_PATH));

    let stored = harness.storage.get_note(&NoteId::from("n7")).await.unwrap().unwrap();
    assert!(stored.is_tombstone());
}

#[tokio::test]
async fn declined_delete_dispatches_nothing() {
    let route = Route::new(NoteId::from("n8")).from_notes_page(true);
    let harness = local_harness(&route);
    harness.storage.put_note(&note("n8", "keep")).await.unwrap();
    let page = NotePage::open(route.clone(), harness.context(Arc::new(NeverConfirm)))
        .await
        .unwrap();

    assert_eq!(page.delete().await.unwrap(), ActionOutcome::Cancelled);
    assert!(page.state().is_loaded());
    assert!(harness.store.records().is_empty());
    assert_eq!(harness.history.current(), Some(route.path()));
}

#[tokio::test]
async fn delete_confirmed_after_unmount_is_cancelled() {
    let route = Route::new(NoteId::from("n13")).from_notes_page(true);
    let harness = local_harness(&route);
    harness.storage.put_note(&note("n13", "keep")).await.unwrap();
    let confirm = Arc::new(GatedConfirm {
        gate: Notify::new(),
    });
    let page = NotePage::open(route.clone(), harness.context(confirm.clone()))
        .await
        .unwrap();

    let pending = page.delete();
    let teardown = async {
        tokio::task::yield_now().await;
        page.unmount();
        confirm.gate.notify_one();
    };
    let (outcome, ()) = tokio::join!(pending, teardown);

    assert_eq!(outcome.unwrap(), ActionOutcome::Cancelled);
    assert!(harness.store.records().is_empty());
    assert_eq!(harness.history.current(), Some(route.path()));
    let stored = harness.storage.get_note(&NoteId::from("n13")).await.unwrap().unwrap();
    assert_eq!(stored.text.as_deref(), Some("keep"));
}

#[tokio::test]
async fn save_replaces_note_dated_with_an_offset() {
    let route = Route::new(NoteId::from("n14"));
    let harness = local_harness(&route);
    let mut stored = note("n14", "old");
    // 07:00Z on the same day
    stored.modification_date = "2999-01-01T12:00:00.000+05:00".to_string();
    harness.storage.put_note(&stored).await.unwrap();
    let page = harness.open(route).await;

    page.change_text("new");
    page.save().await.unwrap();
    page.change_text("newer");
    page.save().await.unwrap();

    let saved = harness.storage.get_note(&NoteId::from("n14")).await.unwrap().unwrap();
    assert_eq!(saved.text.as_deref(), Some("newer"));
    assert_eq!(saved.modification_date, "2999-01-01T07:00:00.002Z");
}

#[tokio::test]
async fn back_affordance_discards_local_edits() {
    let route = Route::new(NoteId::from("n9")).from_notes_page(true);
    let harness = local_harness(&route);
    harness.storage.put_note(&note("n9", "kept")).await.unwrap();
    let page = harness.open(route).await;

    page.change_text("never saved");
    assert_eq!(page.go_home(), Some(NavTarget::Back));
    assert_eq!(page.go_home(), None);

    let stored = harness.storage.get_note(&NoteId::from("n9")).await.unwrap().unwrap();
    assert_eq!(stored.text.as_deref(), Some("kept"));
}

#[tokio::test]
async fn completion_after_unmount_does_not_navigate() {
    let route = Route::new(NoteId::from("n10")).from_notes_page(true);
    let inner = LocalStorage::in_memory().unwrap();
    inner.put_note(&note("n10", "x")).await.unwrap();
    let store = Arc::new(AppStore::new(inner.sync_status()));
    let harness = Harness {
        storage: Arc::new(GatedStorage {
            inner,
            gate: Notify::new(),
        }),
        store,
        history: Arc::new(HistoryNavigator::entered_from_list(&route)),
    };
    let page = harness.open(route.clone()).await;

    let pending = page.archive();
    let teardown = async {
        tokio::task::yield_now().await;
        page.unmount();
        harness.storage.gate.notify_one();
    };
    let (outcome, ()) = tokio::join!(pending, teardown);

    assert_eq!(outcome.unwrap(), ActionOutcome::Detached(ActionLabel::Archived));
    assert_eq!(page.state(), NotePageState::Unmounted);
    assert_eq!(harness.history.current(), Some(route.path()));
    let stored = harness.storage.get_note(&NoteId::from("n10")).await.unwrap().unwrap();
    assert!(stored.is_archived());
}

#[tokio::test]
async fn text_typed_during_save_survives_completion() {
    let route = Route::new(NoteId::from("n11"));
    let inner = LocalStorage::in_memory().unwrap();
    inner.put_note(&note("n11", "a")).await.unwrap();
    let store = Arc::new(AppStore::new(inner.sync_status()));
    let harness = Harness {
        storage: Arc::new(GatedStorage {
            inner,
            gate: Notify::new(),
        }),
        store,
        history: Arc::new(HistoryNavigator::new(route.path())),
    };
    let page = harness.open(route).await;

    page.change_text("ab");
    let pending = page.save();
    let typing = async {
        tokio::task::yield_now().await;
        page.change_text("abc");
        harness.storage.gate.notify_one();
    };
    let (outcome, ()) = tokio::join!(pending, typing);
    outcome.unwrap();

    let stored = harness.storage.get_note(&NoteId::from("n11")).await.unwrap().unwrap();
    assert_eq!(stored.text.as_deref(), Some("ab"));
    assert_eq!(page.note().unwrap().text.as_deref(), Some("abc"));
    assert!(page.is_dirty());
}

#[tokio::test]
async fn storage_failure_keeps_page_and_records_nothing() {
    let route = Route::new(NoteId::from("n12")).from_notes_page(true);
    let inner = LocalStorage::in_memory().unwrap();
    inner.put_note(&note("n12", "x")).await.unwrap();
    let store = Arc::new(AppStore::new(inner.sync_status()));
    let harness = Harness {
        storage: Arc::new(ReadOnlyStorage { inner }),
        store,
        history: Arc::new(HistoryNavigator::entered_from_list(&route)),
    };
    let page = harness.open(route.clone()).await;
    page.change_text("y");

    assert!(matches!(page.save().await, Err(Error::Storage(_))));
    assert!(matches!(page.archive().await, Err(Error::Storage(_))));
    assert!(page.is_dirty());
    assert!(harness.store.records().is_empty());
    assert_eq!(harness.history.current(), Some(route.path()));
}
