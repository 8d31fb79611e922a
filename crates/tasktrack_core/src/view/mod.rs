//! Derived, read-only projections over the task collection.
//!
//! # Responsibility
//! - Filter and search tasks without mutating or copying the collection.
//! - Compute per-status counts that label filter controls.

pub mod projector;
