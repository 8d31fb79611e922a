//! Authoritative task collection with write-through persistence.
//!
//! # Responsibility
//! - Own the ordered task collection for one identified session.
//! - Apply create/update/toggle/delete and persist the full collection.
//!
//! # Invariants
//! - Ids are unique within the collection at all times.
//! - Short ids are unique prefixes of the hyphen-free id form.
//! - Insertion order is preserved; new tasks are appended.
//! - Unknown ids are silent no-ops and never persist.
//! - A detached store (no session) never persists.
//! - Persistence failures never roll back in-memory state.

use crate::model::task::{NewTask, Task, TaskId, TaskPatch};
use crate::storage::{StorageAdapter, TASKS_KEY};
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

const MIN_SHORT_ID_LEN: usize = 8;

/// Ordered task collection, optionally bound to storage.
pub struct TaskStore {
    tasks: Vec<Task>,
    storage: Option<StorageAdapter>,
}

impl TaskStore {
    /// Creates an empty store that keeps everything in memory.
    pub fn detached() -> Self {
        Self {
            tasks: Vec::new(),
            storage: None,
        }
    }

    /// Loads the persisted collection and writes every mutation back.
    ///
    /// Records that fail to decode are skipped one by one, so a single bad
    /// entry does not cost the rest of the collection. Duplicate ids keep
    /// their first occurrence.
    pub fn load(storage: StorageAdapter) -> Self {
        let records: Vec<Value> = storage.get(TASKS_KEY, Vec::new());
        let stored_len = records.len();

        let decoded: Vec<Task> = records
            .into_iter()
            .filter_map(|record| serde_json::from_value(record).ok())
            .collect();
        if decoded.len() != stored_len {
            warn!(
                "event=task_load module=task_store status=repaired dropped_invalid={}",
                stored_len - decoded.len()
            );
        }

        let decoded_len = decoded.len();
        let mut seen = HashSet::with_capacity(decoded_len);
        let tasks: Vec<Task> = decoded
            .into_iter()
            .filter(|task| seen.insert(task.id))
            .collect();
        if tasks.len() != decoded_len {
            warn!(
                "event=task_load module=task_store status=repaired dropped_duplicates={}",
                decoded_len - tasks.len()
            );
        }

        info!(
            "event=task_load module=task_store status=ok count={}",
            tasks.len()
        );
        Self {
            tasks,
            storage: Some(storage),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Resolves a full id or a unique, case-insensitive id prefix.
    ///
    /// Hyphens are ignored, so both the hyphenated form and the short ids
    /// from [`TaskStore::short_id`] resolve.
    pub fn resolve_prefix(&self, text: &str) -> Option<TaskId> {
        let needle: String = text
            .trim()
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if needle.is_empty() {
            return None;
        }
        if let Ok(id) = Uuid::parse_str(&needle) {
            return self.get(id).map(|task| task.id);
        }

        let mut matches = self
            .tasks
            .iter()
            .filter(|task| task.id.simple().to_string().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Some(task.id),
            _ => None,
        }
    }

    /// Shortest prefix of the hyphen-free id that no other task shares.
    ///
    /// Never shorter than eight characters. Ids created within the same
    /// minute share their leading timestamp digits and get longer prefixes.
    pub fn short_id(&self, id: TaskId) -> String {
        let full = id.simple().to_string();
        let shared = self
            .tasks
            .iter()
            .filter(|task| task.id != id)
            .map(|task| common_prefix_len(&full, &task.id.simple().to_string()))
            .max()
            .unwrap_or(0);
        let len = (shared + 1).clamp(MIN_SHORT_ID_LEN, full.len());
        full[..len].to_string()
    }

    /// Appends a new pending task and returns its id.
    ///
    /// The title is not validated; an empty title is stored as given.
    pub fn create(&mut self, input: NewTask) -> TaskId {
        let mut task = Task::new(input);
        while self.position(task.id).is_some() {
            task.id = Uuid::now_v7();
        }

        let id = task.id;
        self.tasks.push(task);
        debug!(
            "event=task_create module=task_store status=ok count={}",
            self.tasks.len()
        );
        self.persist();
        id
    }

    /// Merges `patch` into the task with `id`.
    ///
    /// Returns `false` when no such task exists.
    pub fn update(&mut self, id: TaskId, patch: TaskPatch) -> bool {
        let Some(index) = self.position(id) else {
            debug!("event=task_update module=task_store status=noop reason=not_found");
            return false;
        };

        self.tasks[index].apply(patch);
        debug!("event=task_update module=task_store status=ok");
        self.persist();
        true
    }

    /// Flips the completion flag of the task with `id`.
    pub fn toggle_complete(&mut self, id: TaskId) -> bool {
        let Some(index) = self.position(id) else {
            debug!("event=task_toggle module=task_store status=noop reason=not_found");
            return false;
        };

        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        debug!(
            "event=task_toggle module=task_store status=ok completed={}",
            task.completed
        );
        self.persist();
        true
    }

    /// Removes the task with `id`.
    pub fn delete(&mut self, id: TaskId) -> bool {
        let Some(index) = self.position(id) else {
            debug!("event=task_delete module=task_store status=noop reason=not_found");
            return false;
        };

        self.tasks.remove(index);
        debug!(
            "event=task_delete module=task_store status=ok count={}",
            self.tasks.len()
        );
        self.persist();
        true
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn persist(&self) {
        if let Some(storage) = &self.storage {
            storage.set(TASKS_KEY, &self.tasks);
        }
    }
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count()
}
