//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical task record shared by store and controller.
//! - Own title validation so every write path applies the same rules.
//!
//! # Invariants
//! - Every task is identified by a stable, store-assigned `TaskId`.
//! - Persisted titles are never empty or whitespace-only.

pub mod task;
