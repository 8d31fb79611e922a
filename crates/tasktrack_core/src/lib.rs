//! Core task-state engine for the task tracker.
//! This crate is the single source of truth for task invariants.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;
pub mod storage;
pub mod view;

pub use app::{AppContext, CommandOutcome, SessionError, SessionResult, ViewSnapshot};
pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{NewTask, ParsePriorityError, Priority, Task, TaskId, TaskPatch};
pub use repo::kv_repo::{KvError, KvRepository, KvResult, MemoryKvRepository, SqliteKvRepository};
pub use service::task_store::TaskStore;
pub use session::Session;
pub use storage::StorageAdapter;
pub use view::projector::{
    empty_state, project, EmptyState, ParseFilterError, TaskCounts, TaskFilter, ViewQuery,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
