//! Core logic for the task list.
//! This crate owns task persistence and the list controller; UI crates only
//! render what the controller caches.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::task::{normalize_title, Task, TaskId, TaskValidationError};
pub use repo::task_store::{SqliteTaskStore, StoreError, StoreResult, TaskStore};
pub use service::task_list::TaskListController;

/// Minimal health-check API for smoke probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
