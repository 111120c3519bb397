//! Synced GitHub repository metadata model and DTOs.

use devtrack_core::github;
use devtrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `github_repos` table.
///
/// `github_id` is the external identity and the upsert key; `username` is
/// the GitHub account the repository was fetched for.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubRepo {
    pub id: DbId,
    pub github_id: i64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub clone_url: String,
    pub language: Option<String>,
    pub stargazers_count: i64,
    pub forks_count: i64,
    pub private: bool,
    pub username: String,
    pub github_created_at: Timestamp,
    pub github_updated_at: Timestamp,
    pub project_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GithubRepo {
    /// Attach the read-time derived attributes for serialization.
    pub fn into_view(self, now: Timestamp) -> GithubRepoView {
        let is_recently_updated = github::is_recently_updated(self.github_updated_at, now);
        let days_since_last_update = github::days_since_last_update(self.github_updated_at, now);
        GithubRepoView {
            repo: self,
            is_recently_updated,
            days_since_last_update,
        }
    }
}

/// A synced repository with its derived attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubRepoView {
    #[serde(flatten)]
    pub repo: GithubRepo,
    pub is_recently_updated: bool,
    pub days_since_last_update: i64,
}

/// Input for upserting a repository fetched from the GitHub API (or created
/// through the manual endpoint).
#[derive(Debug, Clone)]
pub struct CreateGithubRepo {
    pub github_id: i64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub clone_url: String,
    pub language: Option<String>,
    pub stargazers_count: i64,
    pub forks_count: i64,
    pub private: bool,
    pub username: String,
    pub github_created_at: Timestamp,
    pub github_updated_at: Timestamp,
}

/// Per-language repository count row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LanguageCount {
    pub language: String,
    pub count: i64,
}

/// Aggregate repository statistics for one project.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubRepoStats {
    pub total_repos: i64,
    pub total_stars: i64,
    pub total_forks: i64,
    pub last_updated: Option<Timestamp>,
}
