//! Shared query parameter types for API handlers.
//!
//! Query structs that appear across multiple handler modules are extracted
//! here; single-use ones stay next to their handler.

use chrono::NaiveDate;
use devtrack_core::types::DbId;
use serde::Deserialize;

/// Query parameters for `GET /api/projects`.
///
/// Exactly one filter dimension applies at a time, in priority order:
/// `search`, then `status`, then the date range (both bounds required).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query parameters for `GET /api/tasks`.
///
/// Filter priority order: `overdue`, then `dueWithinDays`, then
/// `projectId` (with nested status/priority/overdue), then `status`, then
/// `priority`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub overdue: Option<bool>,
    pub due_within_days: Option<i64>,
    pub project_id: Option<DbId>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Sub-filters for `GET /api/projects/{id}/tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTasksQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub overdue: Option<bool>,
}
