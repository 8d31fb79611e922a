//! Core use-case services.
//!
//! # Responsibility
//! - Own mutable tracker state and apply user commands to it.
//! - Keep front ends decoupled from storage details.

pub mod task_store;
