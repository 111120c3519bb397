//! Task entity model, DTOs, and the read-time view carrying derived
//! attributes.

use chrono::NaiveDate;
use devtrack_core::task::{self, TaskPriority, TaskStatus};
use devtrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<NaiveDate>,
    pub project_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    /// Attach the read-time derived attributes for serialization.
    ///
    /// Stored status strings are always valid (the service layer validates
    /// them), so an unparseable value falls back to the default status.
    pub fn into_view(self, today: NaiveDate) -> TaskView {
        let status = TaskStatus::from_str(&self.status).unwrap_or_default();
        let is_overdue = task::is_overdue(self.due_date, status, today);
        let days_until_due = task::days_until_due(self.due_date, today);
        TaskView {
            task: self,
            is_overdue,
            days_until_due,
        }
    }
}

/// A task with its derived attributes, as serialized on every read path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub is_overdue: bool,
    pub days_until_due: Option<i64>,
}

/// Validated input for inserting a new task.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub project_id: DbId,
}

/// Validated partial update. `project_id` is immutable after creation.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
}

/// Optional sub-filters for project-scoped task listings.
#[derive(Debug, Clone, Default)]
pub struct TaskScopeFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// When set, only tasks overdue as of this date are returned.
    pub overdue_on: Option<NaiveDate>,
}

/// Per-status task count row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskStatusCount {
    pub status: String,
    pub count: i64,
}

/// Per-priority task count row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskPriorityCount {
    pub priority: String,
    pub count: i64,
}
