//! Task operations: CRUD, status toggling, filtered and sorted listing.

use crate::error::{ApiError, ApiResult};
use crate::store::{JsonFileStore, StoreError};
use crate::types::{Priority, SortDirection, SortKey, Task, TaskCreate, TaskPatch, TaskStatus};
use std::cmp::Ordering;
use std::path::Path;

/// Filter and sort parameters for task listing.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub project: Option<String>,
    pub sort_by: Option<SortKey>,
    pub order: Option<SortDirection>,
}

/// Service for the task collection, backed by `tasks.json`.
#[derive(Clone)]
pub struct TaskService {
    store: JsonFileStore<Task>,
}

fn store_err(err: StoreError, id: &str) -> ApiError {
    match err {
        StoreError::DuplicateKey(_) => ApiError::task_exists(id),
        StoreError::KeyNotFound(_) => ApiError::task_not_found(id),
        other => ApiError::storage(other),
    }
}

impl TaskService {
    pub fn open(data_dir: &Path) -> ApiResult<Self> {
        let store = JsonFileStore::open(data_dir.join("tasks.json"), "tasks")?;
        Ok(Self { store })
    }

    /// List tasks matching the query, in the requested order.
    ///
    /// Sorting is stable: ties keep their original collection order.
    pub fn list(&self, query: &TaskQuery) -> Vec<Task> {
        let mut tasks = self.store.all();

        if let Some(status) = query.status {
            tasks.retain(|t| t.status == status);
        }
        if let Some(priority) = query.priority {
            tasks.retain(|t| t.priority == priority);
        }
        if let Some(ref project) = query.project {
            tasks.retain(|t| &t.project == project);
        }

        sort_tasks(&mut tasks, query.sort_by.unwrap_or_default(), query.order);
        tasks
    }

    pub fn get(&self, id: &str) -> ApiResult<Task> {
        self.store
            .get(id)
            .ok_or_else(|| ApiError::task_not_found(id))
    }

    pub fn create(&self, input: TaskCreate) -> ApiResult<Task> {
        if input.title.trim().is_empty() {
            return Err(ApiError::missing_field("title"));
        }
        let task = Task::from_create(input);
        self.store.add(&task).map_err(|e| store_err(e, &task.id))?;
        Ok(task)
    }

    /// Apply a partial update. Only provided fields change; `updated_at` is
    /// refreshed on every successful call.
    pub fn update(&self, id: &str, patch: TaskPatch) -> ApiResult<Task> {
        let mut task = self.get(id)?;

        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(ApiError::invalid_value("title", "must not be empty"));
            }
            task.title = title;
        }
        if let Some(notes) = patch.notes {
            task.notes = notes;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(project) = patch.project {
            task.project = project;
        }

        task.touch();
        self.store.update(&task).map_err(|e| store_err(e, id))?;
        Ok(task)
    }

    /// Delete a task. `false` when no task with the id exists.
    pub fn delete(&self, id: &str) -> ApiResult<bool> {
        self.store.remove(id).map_err(|e| store_err(e, id))
    }

    /// Flip a task between active and completed.
    pub fn toggle(&self, id: &str) -> ApiResult<Task> {
        let mut task = self.get(id)?;
        task.status = task.status.toggled();
        task.touch();
        self.store.update(&task).map_err(|e| store_err(e, id))?;
        Ok(task)
    }

    /// Set the status explicitly.
    pub fn set_status(&self, id: &str, status: TaskStatus) -> ApiResult<Task> {
        let mut task = self.get(id)?;
        task.status = status;
        task.touch();
        self.store.update(&task).map_err(|e| store_err(e, id))?;
        Ok(task)
    }
}

/// Stable in-place sort by the given key.
///
/// Natural directions: priority high-first, due date soonest-first with
/// missing dates always last, created newest-first. An explicit `order`
/// overrides the direction for the key's comparison; missing due dates stay
/// last either way.
fn sort_tasks(tasks: &mut [Task], key: SortKey, order: Option<SortDirection>) {
    match key {
        SortKey::Priority => {
            let desc = order == Some(SortDirection::Desc);
            tasks.sort_by(|a, b| {
                let ord = a.priority.rank().cmp(&b.priority.rank());
                if desc { ord.reverse() } else { ord }
            });
        }
        SortKey::DueDate => {
            let desc = order == Some(SortDirection::Desc);
            tasks.sort_by(|a, b| match (&a.due_date, &b.due_date) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => {
                    let ord = a.cmp(b);
                    if desc { ord.reverse() } else { ord }
                }
            });
        }
        SortKey::Created => {
            // Newest first unless asc is requested explicitly.
            let asc = order == Some(SortDirection::Asc);
            tasks.sort_by(|a, b| {
                let ord = b.created_at.cmp(&a.created_at);
                if asc { ord.reverse() } else { ord }
            });
        }
    }
}
