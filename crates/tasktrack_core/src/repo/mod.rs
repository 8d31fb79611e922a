//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the raw key-value contract the storage adapter builds on.
//! - Isolate SQLite query details from session/task orchestration.
//!
//! # Invariants
//! - Repositories return transport errors; they never decide fallbacks.

pub mod kv_repo;
