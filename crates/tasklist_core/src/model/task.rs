//! Task domain model.
//!
//! # Responsibility
//! - Define the task record rendered as one row of the list.
//! - Normalize and validate user-entered titles.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is trimmed and non-empty once it passed `normalize_title`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// One to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identity.
    pub id: TaskId,
    /// User-visible description.
    pub title: String,
    /// Unix epoch milliseconds of the insert.
    pub created_at: i64,
    /// Unix epoch milliseconds of the last title change.
    pub updated_at: i64,
}

impl Task {
    /// Checks record-level invariants.
    ///
    /// Used on read paths so corrupt rows are reported instead of rendered.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// Rejection reasons for task input and persisted task state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Identity is the nil UUID.
    NilId,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::NilId => write!(f, "task id cannot be nil"),
        }
    }
}

impl Error for TaskValidationError {}

/// Trims surrounding whitespace and rejects titles with no visible text.
pub fn normalize_title(raw: &str) -> Result<String, TaskValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}
