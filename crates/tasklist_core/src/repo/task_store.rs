//! Task store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide durable CRUD over the `tasks` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every mutation targets exactly one row, addressed by `uuid`.
//! - Read paths reject corrupt rows instead of masking them.
//! - `fetch_all` returns rows in insertion order.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::task::{normalize_title, Task, TaskId, TaskValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TASK_COLUMNS: &str = "uuid, title, created_at, updated_at";
const REQUIRED_TASK_COLUMNS: &[&str] = &["seq", "uuid", "title", "created_at", "updated_at"];

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by task store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Title input was rejected before touching storage.
    InvalidArgument(TaskValidationError),
    /// No task with this identity exists.
    NotFound(TaskId),
    /// The medium could not be read, or a stored row is corrupt.
    StorageRead(DbError),
    /// The medium rejected a write; the change was not applied.
    StorageWrite(DbError),
    /// The connection was not bootstrapped through `db::open_db*`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(err) => write!(f, "invalid argument: {err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::StorageRead(err) => write!(f, "failed to read tasks: {err}"),
            Self::StorageWrite(err) => write!(f, "failed to save tasks: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidArgument(err) => Some(err),
            Self::StorageRead(err) | Self::StorageWrite(err) => Some(err),
            Self::NotFound(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidArgument(value)
    }
}

fn read_failure(err: impl Into<DbError>) -> StoreError {
    StoreError::StorageRead(err.into())
}

fn write_failure(err: impl Into<DbError>) -> StoreError {
    StoreError::StorageWrite(err.into())
}

/// Durable CRUD over the task record set.
///
/// Implementations are synchronous: each call returns only after the change
/// is persisted or has definitely failed.
pub trait TaskStore {
    /// Returns every stored task in insertion order.
    fn fetch_all(&self) -> StoreResult<Vec<Task>>;
    /// Returns one task by identity.
    fn get(&self, id: TaskId) -> StoreResult<Option<Task>>;
    /// Persists a new task with a fresh identity.
    fn create(&self, title: &str) -> StoreResult<Task>;
    /// Replaces the title of an existing task.
    fn update(&self, id: TaskId, title: &str) -> StoreResult<Task>;
    /// Removes a task permanently.
    fn delete(&self, id: TaskId) -> StoreResult<()>;
}

impl<S: TaskStore + ?Sized> TaskStore for &S {
    fn fetch_all(&self) -> StoreResult<Vec<Task>> {
        (**self).fetch_all()
    }

    fn get(&self, id: TaskId) -> StoreResult<Option<Task>> {
        (**self).get(id)
    }

    fn create(&self, title: &str) -> StoreResult<Task> {
        (**self).create(title)
    }

    fn update(&self, id: TaskId, title: &str) -> StoreResult<Task> {
        (**self).update(id, title)
    }

    fn delete(&self, id: TaskId) -> StoreResult<()> {
        (**self).delete(id)
    }
}

/// SQLite-backed task store over an injected connection.
pub struct SqliteTaskStore<'conn> {
    conn: &'conn Connection,
}

impl std::fmt::Debug for SqliteTaskStore<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteTaskStore").finish_non_exhaustive()
    }
}

impl<'conn> SqliteTaskStore<'conn> {
    /// Wraps a connection returned by `db::open_db` or `db::open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema was
    ///   tampered with.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn).map_err(read_failure)?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let columns = table_columns(conn, "tasks").map_err(read_failure)?;
        if columns.is_empty() {
            return Err(StoreError::MissingRequiredTable("tasks"));
        }
        for &column in REQUIRED_TASK_COLUMNS {
            if !columns.iter().any(|name| name.as_str() == column) {
                return Err(StoreError::MissingRequiredColumn {
                    table: "tasks",
                    column,
                });
            }
        }

        Ok(Self { conn })
    }
}

impl TaskStore for SqliteTaskStore<'_> {
    fn fetch_all(&self) -> StoreResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY seq ASC;"))
            .map_err(read_failure)?;
        let mut rows = stmt.query([]).map_err(read_failure)?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next().map_err(read_failure)? {
            tasks.push(parse_task_row(row).map_err(read_failure)?);
        }

        Ok(tasks)
    }

    fn get(&self, id: TaskId) -> StoreResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE uuid = ?1;"))
            .map_err(read_failure)?;
        let mut rows = stmt.query([id.to_string()]).map_err(read_failure)?;
        if let Some(row) = rows.next().map_err(read_failure)? {
            return Ok(Some(parse_task_row(row).map_err(read_failure)?));
        }

        Ok(None)
    }

    fn create(&self, title: &str) -> StoreResult<Task> {
        let title = normalize_title(title)?;
        let id = Uuid::new_v4();

        // RETURNING keeps insert and read-back in one statement.
        let mut stmt = self
            .conn
            .prepare(&format!(
                "INSERT INTO tasks (uuid, title) VALUES (?1, ?2) RETURNING {TASK_COLUMNS};"
            ))
            .map_err(write_failure)?;
        let mut rows = stmt
            .query(params![id.to_string(), title])
            .map_err(write_failure)?;
        if let Some(row) = rows.next().map_err(write_failure)? {
            return parse_task_row(row).map_err(write_failure);
        }

        Err(write_failure(DbError::InvalidData(format!(
            "insert of task {id} returned no row"
        ))))
    }

    fn update(&self, id: TaskId, title: &str) -> StoreResult<Task> {
        let title = normalize_title(title)?;

        let mut stmt = self
            .conn
            .prepare(&format!(
                "UPDATE tasks
                 SET
                    title = ?1,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?2
                 RETURNING {TASK_COLUMNS};"
            ))
            .map_err(write_failure)?;
        let mut rows = stmt
            .query(params![title, id.to_string()])
            .map_err(write_failure)?;
        if let Some(row) = rows.next().map_err(write_failure)? {
            return parse_task_row(row).map_err(write_failure);
        }

        Err(StoreError::NotFound(id))
    }

    fn delete(&self, id: TaskId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])
            .map_err(write_failure)?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }
}

fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let names = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

fn parse_task_row(row: &Row<'_>) -> Result<Task, DbError> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        DbError::InvalidData(format!("invalid uuid value `{uuid_text}` in tasks.uuid"))
    })?;

    let task = Task {
        id,
        title: row.get("title")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    task.validate()
        .map_err(|err| DbError::InvalidData(format!("{err} (task {id})")))?;
    Ok(task)
}
