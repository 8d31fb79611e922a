//! Filter + search projection and counts.
//!
//! # Invariants
//! - Projection is recomputed on every call; nothing is cached.
//! - Output order equals collection (insertion) order.
//! - Counts ignore the active filter and search term.

use crate::model::task::Task;
use log::warn;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Completion-status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl TaskFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }

    pub fn accepts(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Pending => !task.completed,
        }
    }
}

impl Display for TaskFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFilterError(pub String);

impl Display for ParseFilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported filter `{}`; expected all|completed|pending",
            self.0
        )
    }
}

impl Error for ParseFilterError {}

impl FromStr for TaskFilter {
    type Err = ParseFilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "completed" | "done" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}

/// Transient view parameters; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuery {
    pub filter: TaskFilter,
    pub search: String,
}

impl ViewQuery {
    pub fn new(filter: TaskFilter, search: impl Into<String>) -> Self {
        Self {
            filter,
            search: search.into(),
        }
    }
}

/// Per-status totals over the unfiltered collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub all: usize,
    pub pending: usize,
    pub completed: usize,
}

impl TaskCounts {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            all: tasks.len(),
            pending: tasks.len() - completed,
            completed,
        }
    }

    /// Count shown next to the given filter control.
    pub fn for_filter(&self, filter: TaskFilter) -> usize {
        match filter {
            TaskFilter::All => self.all,
            TaskFilter::Completed => self.completed,
            TaskFilter::Pending => self.pending,
        }
    }
}

/// Why a projection came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// A search term is active and nothing matched it.
    NoSearchMatches,
    /// The collection itself is empty.
    NoTasks,
    /// Tasks exist, none in the selected category.
    EmptyCategory,
}

impl EmptyState {
    pub fn message(self) -> &'static str {
        match self {
            Self::NoSearchMatches => "No tasks found matching your search.",
            Self::NoTasks => "No tasks yet. Add your first task!",
            Self::EmptyCategory => "No tasks in this category.",
        }
    }
}

/// Case-insensitive literal matcher over title and description.
enum SearchMatcher {
    Any,
    Pattern(Regex),
    Lowercase(String),
}

impl SearchMatcher {
    fn new(term: &str) -> Self {
        if term.is_empty() {
            return Self::Any;
        }

        match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => Self::Pattern(pattern),
            Err(err) => {
                warn!(
                    "event=view_search module=view status=fallback term_chars={} error={err}",
                    term.chars().count()
                );
                Self::Lowercase(term.to_lowercase())
            }
        }
    }

    fn matches(&self, task: &Task) -> bool {
        match self {
            Self::Any => true,
            Self::Pattern(pattern) => {
                pattern.is_match(&task.title) || pattern.is_match(&task.description)
            }
            Self::Lowercase(needle) => {
                task.title.to_lowercase().contains(needle.as_str())
                    || task.description.to_lowercase().contains(needle.as_str())
            }
        }
    }
}

/// Returns the tasks passing both the filter and the search predicate.
pub fn project<'a>(tasks: &'a [Task], query: &ViewQuery) -> Vec<&'a Task> {
    let matcher = SearchMatcher::new(&query.search);
    tasks
        .iter()
        .filter(|task| query.filter.accepts(task) && matcher.matches(task))
        .collect()
}

/// Classifies an empty projection; `None` when something is visible.
pub fn empty_state(tasks: &[Task], query: &ViewQuery, visible: usize) -> Option<EmptyState> {
    if visible > 0 {
        None
    } else if !query.search.is_empty() {
        Some(EmptyState::NoSearchMatches)
    } else if tasks.is_empty() {
        Some(EmptyState::NoTasks)
    } else {
        Some(EmptyState::EmptyCategory)
    }
}

#[cfg(test)]
mod tests {
    use super::{empty_state, project, EmptyState, TaskCounts, TaskFilter, ViewQuery};
    use crate::model::task::{NewTask, Priority, Task};

    fn sample() -> Vec<Task> {
        let mut done = Task::new(NewTask::new("Ship release", Priority::High));
        done.completed = true;
        vec![
            Task::new(NewTask::new("Buy milk", Priority::Low).description("2% please")),
            done,
            Task::new(NewTask::new("Call plumber", Priority::Medium).description("kitchen SINK")),
        ]
    }

    fn titles(tasks: Vec<&Task>) -> Vec<&str> {
        tasks.into_iter().map(|task| task.title.as_str()).collect()
    }

    #[test]
    fn filters_by_completion() {
        let tasks = sample();
        assert_eq!(project(&tasks, &ViewQuery::default()).len(), 3);
        assert_eq!(
            titles(project(&tasks, &ViewQuery::new(TaskFilter::Completed, ""))),
            vec!["Ship release"]
        );
        assert_eq!(
            titles(project(&tasks, &ViewQuery::new(TaskFilter::Pending, ""))),
            vec!["Buy milk", "Call plumber"]
        );
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let tasks = sample();
        assert_eq!(
            titles(project(&tasks, &ViewQuery::new(TaskFilter::All, "MILK"))),
            vec!["Buy milk"]
        );
        assert_eq!(
            titles(project(&tasks, &ViewQuery::new(TaskFilter::All, "sink"))),
            vec!["Call plumber"]
        );
    }

    #[test]
    fn search_treats_metacharacters_literally() {
        let tasks = sample();
        assert_eq!(
            titles(project(&tasks, &ViewQuery::new(TaskFilter::All, "2%"))),
            vec!["Buy milk"]
        );
        assert!(project(&tasks, &ViewQuery::new(TaskFilter::All, ".*")).is_empty());
    }

    #[test]
    fn filter_and_search_compose() {
        let tasks = sample();
        let query = ViewQuery::new(TaskFilter::Completed, "milk");
        assert!(project(&tasks, &query).is_empty());
        assert_eq!(
            empty_state(&tasks, &query, 0),
            Some(EmptyState::NoSearchMatches)
        );
    }

    #[test]
    fn counts_ignore_active_filter() {
        let tasks = sample();
        let counts = TaskCounts::from_tasks(&tasks);
        assert_eq!(
            counts,
            TaskCounts {
                all: 3,
                pending: 2,
                completed: 1
            }
        );
        assert_eq!(counts.for_filter(TaskFilter::Pending), 2);
    }

    #[test]
    fn empty_state_distinguishes_no_tasks_from_empty_category() {
        let query = ViewQuery::new(TaskFilter::Completed, "");
        assert_eq!(empty_state(&[], &query, 0), Some(EmptyState::NoTasks));

        let pending_only = vec![Task::new(NewTask::new("x", Priority::Low))];
        assert_eq!(
            empty_state(&pending_only, &query, 0),
            Some(EmptyState::EmptyCategory)
        );
        assert_eq!(empty_state(&pending_only, &ViewQuery::default(), 1), None);
    }

    #[test]
    fn filter_parses_names() {
        assert_eq!("Pending".parse::<TaskFilter>().expect("parse"), TaskFilter::Pending);
        assert!("archived".parse::<TaskFilter>().is_err());
    }
}
