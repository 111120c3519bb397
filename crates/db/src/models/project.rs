//! Project entity model and DTOs.

use chrono::NaiveDate;
use devtrack_core::project::ProjectStatus;
use devtrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::github_repo::GithubRepoView;
use crate::models::task::TaskView;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project row with eager-loaded child counts.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWithCounts {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub tasks_count: i64,
    pub github_repos_count: i64,
}

/// A project with its tasks and synced repositories, as returned by the
/// single-project read path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWithRelations {
    #[serde(flatten)]
    pub project: Project,
    pub tasks: Vec<TaskView>,
    pub github_repos: Vec<GithubRepoView>,
    pub tasks_count: i64,
    pub github_repos_count: i64,
}

/// Validated input for inserting a new project.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Validated partial update. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Per-status project count row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectStatusCount {
    pub status: String,
    pub count: i64,
}
