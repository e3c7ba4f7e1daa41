//! Task list controller.
//!
//! # Responsibility
//! - Hold the ordered, read-through cache rendered by the UI.
//! - Translate add/edit/delete gestures into store calls.
//!
//! # Invariants
//! - The cache is only mutated from the outcome of a successful store call.
//! - On any store error the cache is left exactly as it was.
//! - Cache order is insertion order; edits never move a row.

use crate::model::task::{normalize_title, Task, TaskId};
use crate::repo::task_store::{StoreError, StoreResult, TaskStore};
use log::{info, warn};
use std::time::Instant;

/// Read-through cache over a `TaskStore`, ordered for display.
#[derive(Debug)]
pub struct TaskListController<S: TaskStore> {
    store: S,
    tasks: Vec<Task>,
}

impl<S: TaskStore> TaskListController<S> {
    /// Builds a controller whose cache mirrors `store.fetch_all()`.
    pub fn load(store: S) -> StoreResult<Self> {
        let tasks = fetch_logged(&store)?;
        Ok(Self { store, tasks })
    }

    /// Replaces the cache with the current store contents.
    ///
    /// The previous cache survives a failed read.
    pub fn reload(&mut self) -> StoreResult<()> {
        self.tasks = fetch_logged(&self.store)?;
        Ok(())
    }

    /// Cached tasks in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task rendered at display row `index`.
    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Display row of the task with this identity.
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Underlying store, for read paths the cache does not cover.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a task and appends it to the cache.
    ///
    /// Blank input is rejected before the store is called.
    pub fn add(&mut self, title: &str) -> StoreResult<&Task> {
        let title = normalize_title(title).map_err(|err| rejected("task_create", err.into()))?;
        let started_at = Instant::now();

        let task = self
            .store
            .create(&title)
            .map_err(|err| failed("task_create", started_at, None, err))?;
        info!(
            "event=task_create module=controller status=ok task_id={} duration_ms={}",
            task.id,
            started_at.elapsed().as_millis()
        );

        self.tasks.push(task);
        let index = self.tasks.len() - 1;
        Ok(&self.tasks[index])
    }

    /// Replaces the title of `id`, keeping its display row.
    pub fn rename(&mut self, id: TaskId, title: &str) -> StoreResult<&Task> {
        let title = normalize_title(title).map_err(|err| rejected("task_update", err.into()))?;
        let started_at = Instant::now();

        let task = self
            .store
            .update(id, &title)
            .map_err(|err| failed("task_update", started_at, Some(id), err))?;
        info!(
            "event=task_update module=controller status=ok task_id={id} duration_ms={}",
            started_at.elapsed().as_millis()
        );

        let index = match self.position(id) {
            Some(index) => {
                self.tasks[index] = task;
                index
            }
            None => {
                warn!("event=task_update module=controller status=resync task_id={id}");
                self.reload()?;
                self.position(id).ok_or(StoreError::NotFound(id))?
            }
        };
        Ok(&self.tasks[index])
    }

    /// Deletes `id` and drops its row from the cache.
    pub fn remove(&mut self, id: TaskId) -> StoreResult<()> {
        let started_at = Instant::now();

        self.store
            .delete(id)
            .map_err(|err| failed("task_delete", started_at, Some(id), err))?;
        info!(
            "event=task_delete module=controller status=ok task_id={id} duration_ms={}",
            started_at.elapsed().as_millis()
        );

        match self.position(id) {
            Some(index) => {
                self.tasks.remove(index);
                Ok(())
            }
            None => {
                warn!("event=task_delete module=controller status=resync task_id={id}");
                self.reload()
            }
        }
    }
}

fn fetch_logged<S: TaskStore>(store: &S) -> StoreResult<Vec<Task>> {
    let started_at = Instant::now();
    match store.fetch_all() {
        Ok(tasks) => {
            info!(
                "event=task_list_load module=controller status=ok count={} duration_ms={}",
                tasks.len(),
                started_at.elapsed().as_millis()
            );
            Ok(tasks)
        }
        Err(err) => Err(failed("task_list_load", started_at, None, err)),
    }
}

fn rejected(event: &str, err: StoreError) -> StoreError {
    warn!("event={event} module=controller status=rejected error={err}");
    err
}

fn failed(event: &str, started_at: Instant, id: Option<TaskId>, err: StoreError) -> StoreError {
    match id {
        Some(id) => warn!(
            "event={event} module=controller status=error task_id={id} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
        None => warn!(
            "event={event} module=controller status=error duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    err
}
