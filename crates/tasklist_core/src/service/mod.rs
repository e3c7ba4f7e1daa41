//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into user-gesture level APIs.
//! - Keep UI layers decoupled from storage details.

pub mod task_list;
