//! Core domain types for the taskkeeper server.

use crate::store::Keyed;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default project assigned to tasks created without an explicit project.
pub const DEFAULT_PROJECT: &str = "Inbox";

/// Lifecycle status of a task.
///
/// Legacy files may contain `pending` or `in_progress`; both deserialize as
/// `Active` so old data directories keep loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[serde(alias = "pending", alias = "in_progress")]
    Active,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Completed => "completed",
        }
    }

    /// Parse a canonical status value. Legacy aliases are accepted on disk
    /// only, not in API parameters.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(TaskStatus::Active),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            TaskStatus::Active => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Active,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Active
    }
}

/// Task priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    /// Sort rank: high priority sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

/// A task in the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default = "default_project")]
    pub project: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_project() -> String {
    DEFAULT_PROJECT.to_string()
}

impl Task {
    /// Build a task from a create request with a fresh id and timestamps.
    pub fn from_create(input: TaskCreate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            notes: input.notes,
            status: TaskStatus::Active,
            priority: input.priority,
            due_date: input.due_date,
            project: input.project,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`. Guaranteed to move strictly forward even if the
    /// wall clock did not advance between two mutations.
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}

impl Keyed for Task {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Request payload for creating a task.
///
/// `title` defaults to empty so a missing field reaches the service layer's
/// validation instead of a deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCreate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default = "default_project")]
    pub project: String,
}

/// Partial update for a task. Only provided fields change; `due_date`
/// distinguishes "absent" (keep) from explicit `null` (clear).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

/// Deserialize a present field into `Some(value)` so an explicit `null`
/// becomes `Some(None)`; an absent field stays `None` via `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Response body for task listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
    pub count: usize,
}

/// A project grouping tasks. The name acts as the key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: String) -> Self {
        Self {
            name,
            created_at: Utc::now(),
        }
    }
}

impl Keyed for Project {
    fn key(&self) -> &str {
        &self.name
    }
}

/// Request payload for creating a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreate {
    #[serde(default)]
    pub name: String,
}

/// UI theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Sort key for task listings, also the persisted default sort preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Priority,
    DueDate,
    #[default]
    Created,
}

impl SortKey {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "priority" => Some(SortKey::Priority),
            "due_date" => Some(SortKey::DueDate),
            "created" => Some(SortKey::Created),
            _ => None,
        }
    }
}

/// Sort direction for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// Application settings singleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub sort_order: SortKey,
}

/// Partial update for settings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortKey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_toggles_both_ways() {
        assert_eq!(TaskStatus::Active.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Completed.toggled(), TaskStatus::Active);
    }

    #[test]
    fn legacy_status_values_deserialize_as_active() {
        for legacy in ["\"pending\"", "\"in_progress\""] {
            let status: TaskStatus = serde_json::from_str(legacy).unwrap();
            assert_eq!(status, TaskStatus::Active);
        }
    }

    #[test]
    fn status_from_str_rejects_legacy_aliases() {
        assert_eq!(TaskStatus::from_str("active"), Some(TaskStatus::Active));
        assert_eq!(TaskStatus::from_str("pending"), None);
        assert_eq!(TaskStatus::from_str("in_progress"), None);
    }

    #[test]
    fn priority_rank_orders_high_first() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn task_from_create_applies_defaults() {
        let input: TaskCreate = serde_json::from_str(r#"{"title": "Buy milk"}"#).unwrap();
        let task = Task::from_create(input);
        assert!(!task.id.is_empty());
        assert_eq!(task.status, TaskStatus::Active);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.project, DEFAULT_PROJECT);
        assert_eq!(task.notes, "");
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn touch_moves_updated_at_strictly_forward() {
        let mut task = Task::from_create(TaskCreate {
            title: "t".to_string(),
            notes: String::new(),
            priority: Priority::default(),
            due_date: None,
            project: DEFAULT_PROJECT.to_string(),
        });
        let before = task.updated_at;
        task.touch();
        assert!(task.updated_at > before);
    }

    #[test]
    fn patch_distinguishes_missing_from_null_due_date() {
        let absent: TaskPatch = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert!(absent.due_date.is_none());

        let cleared: TaskPatch = serde_json::from_str(r#"{"due_date": null}"#).unwrap();
        assert_eq!(cleared.due_date, Some(None));
    }

    #[test]
    fn settings_default_matches_contract() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.sort_order, SortKey::Created);
    }
}
