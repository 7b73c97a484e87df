//! The task store: the authoritative ordered list of tasks.
//!
//! `TaskStore` owns the list and the storage it is persisted to. Every
//! successful mutation writes the whole list back under the `tasks` key. A
//! failed write is logged and kept for the front end to report, but the
//! in-memory mutation stands.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::storage::{KeyValueStore, TASKS_KEY};
use crate::task::{Task, TaskDraft};

/// Key that receives unreadable task data before it would be overwritten.
pub const CORRUPT_TASKS_KEY: &str = "tasks.corrupt";

/// In-memory task list bound to its persistent storage.
pub struct TaskStore {
    tasks: Vec<Task>,
    /// `None` once the counter has passed `u64::MAX`.
    next_id: Option<u64>,
    storage: Box<dyn KeyValueStore>,
    persist_error: Option<String>,
}

impl TaskStore {
    /// Load the task list from storage, starting empty if nothing was saved.
    ///
    /// Unreadable data is not fatal: the store starts empty and the raw bytes
    /// are copied under [`CORRUPT_TASKS_KEY`] so the next save does not lose
    /// them. Bytes that are not UTF-8 count as unreadable.
    #[tracing::instrument(skip(storage))]
    pub fn load(mut storage: Box<dyn KeyValueStore>) -> Self {
        let tasks = match storage.get(TASKS_KEY) {
            Ok(None) => {
                debug!("no saved tasks, starting empty");
                Vec::new()
            }
            Ok(Some(raw)) => match serde_json::from_slice::<Vec<Task>>(&raw) {
                Ok(tasks) => {
                    debug!(count = tasks.len(), "loaded tasks");
                    dedup_ids(tasks)
                }
                Err(err) => {
                    warn!(error = %err, "saved tasks are unreadable, starting empty");
                    if let Err(err) = storage.set(CORRUPT_TASKS_KEY, &raw) {
                        warn!(error = %err, "could not keep a copy of the unreadable tasks");
                    }
                    Vec::new()
                }
            },
            Err(err) => {
                warn!(error = %format!("{err:#}"), "reading saved tasks failed, starting empty");
                Vec::new()
            }
        };

        let next_id = tasks.iter().map(|t| t.id).max().map_or(Some(1), |m| m.checked_add(1));
        TaskStore {
            tasks,
            next_id,
            storage,
            persist_error: None,
        }
    }

    /// Serialize the full list and write it under the `tasks` key.
    #[tracing::instrument(skip(self), fields(count = self.tasks.len()))]
    pub fn persist(&mut self) -> anyhow::Result<()> {
        let data = serde_json::to_vec_pretty(&self.tasks)?;
        self.storage.set(TASKS_KEY, &data)?;
        debug!(bytes = data.len(), "persisted tasks");
        Ok(())
    }

    /// Persist after a mutation; failures are recorded, never rolled back.
    fn sync(&mut self) {
        if let Err(err) = self.persist() {
            let msg = format!("{err:#}");
            error!(error = %msg, "failed to save tasks; changes are kept in memory");
            self.persist_error = Some(msg);
        }
    }

    /// Take the most recent unreported persistence failure, if any.
    pub fn take_persist_error(&mut self) -> Option<String> {
        self.persist_error.take()
    }

    /// Append a task built from `draft`.
    ///
    /// Returns `None` without touching the list when the title is blank.
    #[tracing::instrument(skip(self, draft))]
    pub fn add(&mut self, draft: &TaskDraft, now: DateTime<Utc>) -> Option<u64> {
        if !draft.is_valid() {
            debug!("rejected draft with blank title");
            return None;
        }
        let Some(id) = self.allocate_id() else {
            error!("no unused task id left");
            return None;
        };
        self.tasks.push(Task::from_draft(id, draft, now));
        info!(id, "added task");
        self.sync();
        Some(id)
    }

    /// Remove the task with `id`. Returns whether anything was removed.
    #[tracing::instrument(skip(self))]
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            debug!(id, "remove: no such task");
            return false;
        }
        info!(id, "removed task");
        self.sync();
        true
    }

    /// Flip the completion flag of task `id`, returning the new value.
    #[tracing::instrument(skip(self))]
    pub fn toggle_completed(&mut self, id: u64) -> Option<bool> {
        let Some(task) = self.get_mut(id) else {
            debug!(id, "toggle: no such task");
            return None;
        };
        task.completed = !task.completed;
        let completed = task.completed;
        info!(id, completed, "toggled task");
        self.sync();
        Some(completed)
    }

    /// Overwrite the stored task sharing `task.id` with `task` as given.
    #[tracing::instrument(skip(self, task), fields(id = task.id))]
    pub fn replace(&mut self, task: Task) -> bool {
        let Some(slot) = self.get_mut(task.id) else {
            debug!("replace: no such task");
            return false;
        };
        *slot = task;
        info!("replaced task");
        self.sync();
        true
    }

    /// Get a task by ID.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Next id from the counter. Once the counter is used up, the lowest id
    /// not held by any task.
    fn allocate_id(&mut self) -> Option<u64> {
        let id = match self.next_id.filter(|&id| self.get(id).is_none()) {
            Some(id) => id,
            None => {
                let id = (1..=u64::MAX).find(|&id| self.get(id).is_none())?;
                debug!(id, "id counter exhausted, reusing a free id");
                id
            }
        };
        self.next_id = id.checked_add(1);
        Some(id)
    }
}

/// Keep the first task for each id; later duplicates are dropped.
fn dedup_ids(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = std::collections::HashSet::new();
    let before = tasks.len();
    let kept: Vec<Task> = tasks.into_iter().filter(|t| seen.insert(t.id)).collect();
    if kept.len() != before {
        warn!(dropped = before - kept.len(), "dropped tasks with duplicate ids");
    }
    kept
}
