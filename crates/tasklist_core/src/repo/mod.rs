//! Store layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the task store contract used by the controller.
//! - Isolate SQLite query details from presentation orchestration.
//!
//! # Invariants
//! - Store writes must validate titles before persistence.
//! - Store APIs return semantic errors (`NotFound`, `InvalidArgument`) in
//!   addition to read/write transport errors.

pub mod task_store;
