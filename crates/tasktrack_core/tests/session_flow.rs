use std::path::Path;
use std::rc::Rc;
use tasktrack_core::storage::{DARK_MODE_KEY, TASKS_KEY, USER_KEY};
use tasktrack_core::{
    AppContext, EmptyState, KvError, KvRepository, KvResult, MemoryKvRepository, NewTask,
    Priority, SessionError, SqliteKvRepository, StorageAdapter, TaskFilter,
};

/// Reads succeed, every write is refused.
#[derive(Default)]
struct RefusingWrites {
    inner: MemoryKvRepository,
}

impl KvRepository for RefusingWrites {
    fn get_value(&self, key: &str) -> KvResult<Option<String>> {
        self.inner.get_value(key)
    }

    fn set_value(&self, _key: &str, _value: &str) -> KvResult<()> {
        Err(KvError::Unavailable("quota exceeded".to_string()))
    }
}

fn open_file(path: &Path) -> AppContext {
    AppContext::open(StorageAdapter::new(SqliteKvRepository::open(path).unwrap()))
}

#[test]
fn relogin_restores_persisted_tasks() {
    let mut app = AppContext::open(StorageAdapter::new(MemoryKvRepository::new()));
    assert!(app.login("alice"));
    let created = app
        .create_task(NewTask::new("Buy milk", Priority::Low))
        .unwrap()
        .created
        .unwrap();

    app.logout();
    assert_eq!(app.user(), None);
    assert_eq!(app.view().unwrap_err(), SessionError::NotLoggedIn);

    assert!(app.login("alice"));
    let view = app.view().unwrap();
    assert_eq!(view.tasks.len(), 1);
    assert_eq!(view.tasks[0].id, created);
}

#[test]
fn tasks_are_shared_across_usernames_on_one_store() {
    let mut app = AppContext::open(StorageAdapter::new(MemoryKvRepository::new()));
    app.login("alice");
    app.create_task(NewTask::new("shared", Priority::Medium))
        .unwrap();
    app.logout();

    app.login("bob");
    assert_eq!(app.view().unwrap().tasks[0].title, "shared");
}

#[test]
fn state_survives_process_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasktrack.db");

    {
        let mut app = open_file(&path);
        app.login("alice");
        app.set_dark_mode(true);
        let id = app
            .create_task(NewTask::new("Renew passport", Priority::High))
            .unwrap()
            .created
            .unwrap();
        app.toggle_task(id).unwrap();
    }

    let app = open_file(&path);
    assert_eq!(app.user(), Some("alice"));
    assert!(app.dark_mode());
    let view = app.view().unwrap();
    assert_eq!(view.counts.completed, 1);
    assert_eq!(view.tasks[0].title, "Renew passport");
}

#[test]
fn blank_login_is_a_silent_noop() {
    let repo = Rc::new(MemoryKvRepository::new());
    let mut app = AppContext::open(StorageAdapter::from_shared(repo.clone()));

    assert!(!app.login(" \t "));
    assert_eq!(app.user(), None);
    assert!(repo.get_value(USER_KEY).unwrap().is_none());
    assert!(app.store().is_err());
}

#[test]
fn startup_never_writes() {
    let repo = Rc::new(MemoryKvRepository::new());
    let _app = AppContext::open(StorageAdapter::from_shared(repo.clone()));
    assert!(repo.is_empty());
}

#[test]
fn refused_writes_do_not_break_the_session() {
    let repo = Rc::new(RefusingWrites::default());
    let mut app = AppContext::open(StorageAdapter::from_shared(repo.clone()));

    assert!(app.login("alice"));
    let outcome = app
        .create_task(NewTask::new("Buy milk", Priority::Low))
        .unwrap();
    assert!(outcome.changed);

    let view = app.view().unwrap();
    assert_eq!(view.tasks.len(), 1);
    assert_eq!(view.tasks[0].title, "Buy milk");
    assert!(repo.get_value(TASKS_KEY).unwrap().is_none());
}

#[test]
fn corrupt_stored_values_fall_back_to_defaults() {
    let repo = Rc::new(MemoryKvRepository::new());
    repo.set_value(USER_KEY, "\"alice\"").unwrap();
    repo.set_value(TASKS_KEY, "[{\"id\": 12").unwrap();
    repo.set_value(DARK_MODE_KEY, "maybe").unwrap();

    let app = AppContext::open(StorageAdapter::from_shared(repo));
    assert_eq!(app.user(), Some("alice"));
    assert!(!app.dark_mode());
    let view = app.view().unwrap();
    assert!(view.tasks.is_empty());
    assert_eq!(view.empty_state, Some(EmptyState::NoTasks));
}

#[test]
fn filter_and_search_feed_the_snapshot() {
    let mut app = AppContext::open(StorageAdapter::new(MemoryKvRepository::new()));
    app.login("alice");
    let milk = app
        .create_task(NewTask::new("Buy milk", Priority::Low))
        .unwrap()
        .created
        .unwrap();
    app.create_task(NewTask::new("Call plumber", Priority::High))
        .unwrap();
    app.toggle_task(milk).unwrap();

    let view = app.set_filter(TaskFilter::Pending).unwrap();
    assert_eq!(view.tasks.len(), 1);
    assert_eq!(view.tasks[0].title, "Call plumber");
    assert_eq!(view.counts.all, 2);

    let view = app.set_search("MILK").unwrap();
    assert!(view.tasks.is_empty());
    assert_eq!(view.empty_state, Some(EmptyState::NoSearchMatches));

    let view = app.set_filter(TaskFilter::Completed).unwrap();
    assert_eq!(view.tasks[0].id, milk);
}

#[test]
fn unknown_ids_report_unchanged() {
    let mut app = AppContext::open(StorageAdapter::new(MemoryKvRepository::new()));
    app.login("alice");
    let outcome = app.delete_task(uuid::Uuid::now_v7()).unwrap();
    assert!(!outcome.changed);
    assert_eq!(outcome.view.counts.all, 0);
}
