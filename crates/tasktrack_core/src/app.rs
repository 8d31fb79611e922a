//! Session-scoped application context.
//!
//! # Responsibility
//! - Wire session, task store and view projection around one storage handle.
//! - Expose a command-query surface: every command returns the fresh view.
//!
//! # Invariants
//! - A task store exists exactly while the session is identified.
//! - Logout drops in-memory tasks but leaves persisted data untouched.
//! - Filter and search state are transient and reset on logout.

use crate::model::task::{NewTask, Task, TaskId, TaskPatch};
use crate::service::task_store::TaskStore;
use crate::session::Session;
use crate::storage::StorageAdapter;
use crate::view::projector::{
    empty_state, project, EmptyState, TaskCounts, TaskFilter, ViewQuery,
};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

/// Raised when a task operation is attempted without an identified user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    NotLoggedIn,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotLoggedIn => write!(f, "no user is logged in"),
        }
    }
}

impl Error for SessionError {}

/// Everything a front end needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    pub user: String,
    pub dark_mode: bool,
    pub query: ViewQuery,
    /// Filtered and searched tasks in insertion order.
    pub tasks: Vec<Task>,
    pub counts: TaskCounts,
    pub empty_state: Option<EmptyState>,
}

/// Result of a task command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// `false` when the command was a no-op (unknown id).
    pub changed: bool,
    /// Id assigned by a create command.
    pub created: Option<TaskId>,
    pub view: ViewSnapshot,
}

pub struct AppContext {
    storage: StorageAdapter,
    session: Session,
    store: Option<TaskStore>,
    query: ViewQuery,
}

impl AppContext {
    /// Restores session state and, for an identified user, the task store.
    pub fn open(storage: StorageAdapter) -> Self {
        let session = Session::load(storage.clone());
        let store = session
            .is_identified()
            .then(|| TaskStore::load(storage.clone()));
        Self {
            storage,
            session,
            store,
            query: ViewQuery::default(),
        }
    }

    pub fn user(&self) -> Option<&str> {
        self.session.user()
    }

    pub fn dark_mode(&self) -> bool {
        self.session.dark_mode()
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    /// Identifies the user and loads the persisted tasks.
    ///
    /// Returns `false` for blank names, leaving state unchanged.
    pub fn login(&mut self, username: &str) -> bool {
        if !self.session.login(username) {
            return false;
        }
        if self.store.is_none() {
            self.store = Some(TaskStore::load(self.storage.clone()));
        }
        true
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.store = None;
        self.query = ViewQuery::default();
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.session.set_dark_mode(enabled);
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.session.toggle_dark_mode()
    }

    /// Read-only access to the task store of the identified session.
    pub fn store(&self) -> SessionResult<&TaskStore> {
        self.store.as_ref().ok_or(SessionError::NotLoggedIn)
    }

    pub fn set_filter(&mut self, filter: TaskFilter) -> SessionResult<ViewSnapshot> {
        self.query.filter = filter;
        self.view()
    }

    pub fn set_search(&mut self, term: impl Into<String>) -> SessionResult<ViewSnapshot> {
        self.query.search = term.into();
        self.view()
    }

    pub fn create_task(&mut self, input: NewTask) -> SessionResult<CommandOutcome> {
        let id = self.store_mut()?.create(input);
        self.outcome(true, Some(id))
    }

    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> SessionResult<CommandOutcome> {
        let changed = self.store_mut()?.update(id, patch);
        self.outcome(changed, None)
    }

    pub fn toggle_task(&mut self, id: TaskId) -> SessionResult<CommandOutcome> {
        let changed = self.store_mut()?.toggle_complete(id);
        self.outcome(changed, None)
    }

    pub fn delete_task(&mut self, id: TaskId) -> SessionResult<CommandOutcome> {
        let changed = self.store_mut()?.delete(id);
        self.outcome(changed, None)
    }

    /// Projects the current collection through the active query.
    pub fn view(&self) -> SessionResult<ViewSnapshot> {
        let (Some(user), Some(store)) = (self.session.user(), self.store.as_ref()) else {
            return Err(SessionError::NotLoggedIn);
        };

        let visible: Vec<Task> = project(store.tasks(), &self.query)
            .into_iter()
            .cloned()
            .collect();
        Ok(ViewSnapshot {
            user: user.to_string(),
            dark_mode: self.session.dark_mode(),
            query: self.query.clone(),
            empty_state: empty_state(store.tasks(), &self.query, visible.len()),
            counts: TaskCounts::from_tasks(store.tasks()),
            tasks: visible,
        })
    }

    fn store_mut(&mut self) -> SessionResult<&mut TaskStore> {
        self.store.as_mut().ok_or(SessionError::NotLoggedIn)
    }

    fn outcome(&self, changed: bool, created: Option<TaskId>) -> SessionResult<CommandOutcome> {
        Ok(CommandOutcome {
            changed,
            created,
            view: self.view()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AppContext, SessionError};
    use crate::model::task::{NewTask, Priority};
    use crate::repo::kv_repo::MemoryKvRepository;
    use crate::storage::StorageAdapter;
    use crate::view::projector::TaskFilter;

    #[test]
    fn anonymous_context_rejects_task_commands() {
        let mut app = AppContext::open(StorageAdapter::new(MemoryKvRepository::new()));
        let err = app
            .create_task(NewTask::new("nope", Priority::Low))
            .expect_err("anonymous create must fail");
        assert_eq!(err, SessionError::NotLoggedIn);
        assert!(app.view().is_err());
        assert!(app.store().is_err());
    }

    #[test]
    fn logout_resets_transient_query() {
        let mut app = AppContext::open(StorageAdapter::new(MemoryKvRepository::new()));
        assert!(app.login("carol"));
        app.set_filter(TaskFilter::Completed).expect("filter");
        app.set_search("x").expect("search");

        app.logout();
        assert_eq!(app.query().filter, TaskFilter::All);
        assert!(app.query().search.is_empty());
    }

    #[test]
    fn commands_return_updated_view() {
        let mut app = AppContext::open(StorageAdapter::new(MemoryKvRepository::new()));
        app.login("dana");
        let outcome = app
            .create_task(NewTask::new("write report", Priority::High))
            .expect("create");
        assert!(outcome.changed);
        assert_eq!(outcome.view.user, "dana");
        assert_eq!(outcome.view.tasks.len(), 1);
        assert_eq!(outcome.view.tasks[0].id, outcome.created.expect("id"));
        assert_eq!(outcome.view.empty_state, None);
    }
}
