//! GitHub repository sync: fetch, persist, reconcile, and serve, with a
//! last-known-good fallback when the upstream API is unavailable.

use std::time::Duration;

use chrono::Utc;
use devtrack_core::error::CoreError;
use devtrack_core::types::{DbId, Timestamp};
use devtrack_core::validation::ValidationErrors;
use devtrack_cache::invalidate;
use devtrack_db::models::github_repo::{CreateGithubRepo, GithubRepoView};
use devtrack_db::models::project::Project;
use devtrack_db::repositories::{GithubRepoRepo, ProjectRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

/// Payload for `GET /api/projects/{id}/github/{username}`.
///
/// `cached` is true when the repositories were served from the cache or
/// from the degraded last-known-good path; `cacheExpiry` is absent in the
/// degraded case.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubSyncPayload {
    pub project: Project,
    pub repositories: Vec<GithubRepoView>,
    pub cached: bool,
    pub cache_expiry: Option<Timestamp>,
}

/// Body for the manual repository input endpoint
/// `POST /api/projects/{id}/github`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGithubRepoRequest {
    pub github_id: Option<i64>,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub html_url: Option<String>,
    pub clone_url: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: Option<i64>,
    pub forks_count: Option<i64>,
    pub private: Option<bool>,
    pub username: Option<String>,
    pub github_created_at: Option<Timestamp>,
    pub github_updated_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Fetch-and-sync orchestration for GitHub repository metadata.
pub struct GithubService;

impl GithubService {
    /// Serve a user's repositories under a project.
    ///
    /// Cache hit: return the stored payload with its remaining TTL. Cache
    /// miss: fetch from the GitHub API, upsert-and-prune the stored rows in
    /// one transaction, populate the cache. Upstream failure: log it and
    /// fall back to whatever is already persisted for this
    /// project + username, marked `cached` with no expiry.
    pub async fn get_user_repositories(
        state: &AppState,
        project_id: DbId,
        username: &str,
    ) -> AppResult<GithubSyncPayload> {
        let project = ProjectRepo::find_by_id(&state.pool, project_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            }))?;

        let key = format!("github:{project_id}:{username}:repos");

        if let Some(hit) = state.cache.get(&key).await {
            let repositories: Vec<GithubRepoView> = serde_json::from_value(hit)?;
            let remaining = state.cache.ttl_remaining(&key).await;
            let cache_expiry =
                (remaining >= 0).then(|| Utc::now() + chrono::Duration::seconds(remaining));
            return Ok(GithubSyncPayload {
                project,
                repositories,
                cached: true,
                cache_expiry,
            });
        }

        match state.github.list_user_repos(username).await {
            Ok(summaries) => {
                let batch: Vec<CreateGithubRepo> = summaries
                    .into_iter()
                    .map(|s| s.into_create(username))
                    .collect();
                let synced =
                    GithubRepoRepo::sync_for_project(&state.pool, project_id, username, &batch)
                        .await?;

                let now = Utc::now();
                let repositories: Vec<GithubRepoView> =
                    synced.into_iter().map(|r| r.into_view(now)).collect();

                let ttl_secs = state.config.github_cache_ttl_secs;
                state
                    .cache
                    .set(
                        &key,
                        serde_json::to_value(&repositories)?,
                        Some(Duration::from_secs(ttl_secs)),
                    )
                    .await;
                // The sync may have changed rows embedded in project reads.
                invalidate::invalidate_project(&state.cache, project_id).await;

                Ok(GithubSyncPayload {
                    project,
                    repositories,
                    cached: false,
                    cache_expiry: Some(now + chrono::Duration::seconds(ttl_secs as i64)),
                })
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    project_id,
                    username,
                    "GitHub fetch failed; serving last known repositories"
                );
                let now = Utc::now();
                let repositories: Vec<GithubRepoView> =
                    GithubRepoRepo::find_by_project_and_username(&state.pool, project_id, username)
                        .await?
                        .into_iter()
                        .map(|r| r.into_view(now))
                        .collect();

                Ok(GithubSyncPayload {
                    project,
                    repositories,
                    cached: true,
                    cache_expiry: None,
                })
            }
        }
    }

    /// Manually register a repository under a project (upsert keyed on
    /// `githubId`, like the fetch path).
    pub async fn create_manual(
        state: &AppState,
        project_id: DbId,
        input: CreateGithubRepoRequest,
    ) -> AppResult<GithubRepoView> {
        let mut errors = ValidationErrors::new();
        if input.github_id.is_none() {
            errors.push("githubId", "is required");
        }
        for (field, value) in [
            ("name", &input.name),
            ("fullName", &input.full_name),
            ("htmlUrl", &input.html_url),
            ("cloneUrl", &input.clone_url),
            ("username", &input.username),
        ] {
            if value.as_deref().map_or(true, |s| s.is_empty()) {
                errors.push(field, "is required");
            }
        }
        if input.stargazers_count.is_some_and(|n| n < 0) {
            errors.push("stargazersCount", "must not be negative");
        }
        if input.forks_count.is_some_and(|n| n < 0) {
            errors.push("forksCount", "must not be negative");
        }
        errors.into_result()?;

        ProjectRepo::find_by_id(&state.pool, project_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            }))?;

        let now = Utc::now();
        let username = input.username.unwrap_or_default();
        let create = CreateGithubRepo {
            github_id: input.github_id.unwrap_or_default(),
            name: input.name.unwrap_or_default(),
            full_name: input.full_name.unwrap_or_default(),
            description: input.description,
            html_url: input.html_url.unwrap_or_default(),
            clone_url: input.clone_url.unwrap_or_default(),
            language: input.language,
            stargazers_count: input.stargazers_count.unwrap_or(0),
            forks_count: input.forks_count.unwrap_or(0),
            private: input.private.unwrap_or(false),
            username: username.clone(),
            github_created_at: input.github_created_at.unwrap_or(now),
            github_updated_at: input.github_updated_at.unwrap_or(now),
        };

        let stored = GithubRepoRepo::upsert(&state.pool, project_id, &create).await?;

        invalidate::invalidate_github(&state.cache, project_id, Some(&username)).await;
        invalidate::invalidate_project(&state.cache, project_id).await;
        Ok(stored.into_view(now))
    }

    /// Clear the synced-repository cache for a project, optionally scoped
    /// to one username.
    pub async fn clear_cache(state: &AppState, project_id: DbId, username: Option<&str>) {
        invalidate::invalidate_github(&state.cache, project_id, username).await;
    }
}
