//! Typed, failure-swallowing storage adapter.
//!
//! # Responsibility
//! - Serialize values to JSON text for the raw key-value repository.
//! - Turn every read/write failure into a log event plus a fallback.
//!
//! # Invariants
//! - `get` never fails; it returns the caller default when a value is absent,
//!   empty, unreadable, or undeserializable.
//! - `set` never fails and never touches caller-owned in-memory state.
//! - Stored values are never written to logs, only keys and sizes.

use crate::repo::kv_repo::KvRepository;
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::rc::Rc;

/// Key holding the identified username (JSON string or `null`).
pub const USER_KEY: &str = "taskTrackerUser";
/// Key holding the full task collection (JSON array).
pub const TASKS_KEY: &str = "taskTrackerTasks";
/// Key holding the dark-mode preference (JSON boolean).
pub const DARK_MODE_KEY: &str = "taskTrackerDarkMode";

/// Shared handle over one key-value repository.
///
/// Cloning is cheap and every clone writes to the same backend.
#[derive(Clone)]
pub struct StorageAdapter {
    repo: Rc<dyn KvRepository>,
}

impl StorageAdapter {
    pub fn new(repo: impl KvRepository + 'static) -> Self {
        Self {
            repo: Rc::new(repo),
        }
    }

    /// Wraps an already shared repository, e.g. one a test keeps inspecting.
    pub fn from_shared(repo: Rc<dyn KvRepository>) -> Self {
        Self { repo }
    }

    /// Reads and deserializes the value stored under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.repo.get_value(key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => {
                debug!("event=storage_get module=storage status=miss key={key}");
                return default;
            }
            Err(err) => {
                error!(
                    "event=storage_get module=storage status=error key={key} error_code=kv_read_failed error={err}"
                );
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(
                    "event=storage_get module=storage status=ok key={key} bytes={}",
                    raw.len()
                );
                value
            }
            Err(err) => {
                warn!(
                    "event=storage_get module=storage status=fallback key={key} error_code=decode_failed line={} column={}",
                    err.line(),
                    err.column()
                );
                default
            }
        }
    }

    /// Serializes `value` and stores it under `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    "event=storage_set module=storage status=error key={key} error_code=encode_failed error={err}"
                );
                return;
            }
        };

        match self.repo.set_value(key, &raw) {
            Ok(()) => debug!(
                "event=storage_set module=storage status=ok key={key} bytes={}",
                raw.len()
            ),
            Err(err) => error!(
                "event=storage_set module=storage status=error key={key} error_code=kv_write_failed error={err}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StorageAdapter;
    use crate::repo::kv_repo::{KvRepository, MemoryKvRepository};
    use std::rc::Rc;

    fn shared() -> (Rc<MemoryKvRepository>, StorageAdapter) {
        let repo = Rc::new(MemoryKvRepository::new());
        let storage = StorageAdapter::from_shared(repo.clone());
        (repo, storage)
    }

    #[test]
    fn get_returns_default_for_missing_key() {
        let (_, storage) = shared();
        assert!(!storage.get("flag", false));
    }

    #[test]
    fn get_returns_default_for_corrupt_json() {
        let (repo, storage) = shared();
        repo.set_value("list", "[1, 2").expect("raw write");
        assert_eq!(storage.get::<Vec<u32>>("list", vec![7]), vec![7]);
    }

    #[test]
    fn get_treats_empty_text_as_absent() {
        let (repo, storage) = shared();
        repo.set_value("name", "").expect("raw write");
        assert_eq!(
            storage.get::<Option<String>>("name", Some("fallback".to_string())),
            Some("fallback".to_string())
        );
    }

    #[test]
    fn set_writes_json_text() {
        let (repo, storage) = shared();
        storage.set("name", &Some("alice"));
        storage.set("gone", &None::<String>);
        assert_eq!(
            repo.get_value("name").expect("raw read").as_deref(),
            Some("\"alice\"")
        );
        assert_eq!(
            repo.get_value("gone").expect("raw read").as_deref(),
            Some("null")
        );
        assert_eq!(storage.get::<Option<String>>("gone", None), None);
    }
}
