//! Handlers for the GitHub sync endpoints nested under
//! `/projects/{id}/github`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use devtrack_core::types::DbId;
use devtrack_db::models::github_repo::GithubRepoView;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::services::github::{CreateGithubRepoRequest, GithubSyncPayload};
use crate::services::GithubService;
use crate::state::AppState;

/// Query parameters for `DELETE /api/projects/{id}/github-cache`.
#[derive(Debug, Deserialize)]
pub struct CacheClearParams {
    /// Scope the invalidation to one username; clears every username for
    /// the project when absent.
    pub username: Option<String>,
}

/// GET /api/projects/{id}/github/{username}
pub async fn sync_user_repos(
    State(state): State<AppState>,
    Path((project_id, username)): Path<(DbId, String)>,
) -> AppResult<Json<ApiResponse<GithubSyncPayload>>> {
    let payload = GithubService::get_user_repositories(&state, project_id, &username).await?;
    Ok(ApiResponse::ok("GitHub repositories retrieved", payload))
}

/// POST /api/projects/{id}/github
pub async fn create_manual(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateGithubRepoRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<GithubRepoView>>)> {
    let repo = GithubService::create_manual(&state, project_id, input).await?;
    Ok(ApiResponse::created("GitHub repository stored", repo))
}

/// DELETE /api/projects/{id}/github-cache
pub async fn clear_cache(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<CacheClearParams>,
) -> AppResult<Json<ApiResponse<()>>> {
    GithubService::clear_cache(&state, project_id, params.username.as_deref()).await;
    Ok(ApiResponse::message("GitHub cache cleared"))
}
