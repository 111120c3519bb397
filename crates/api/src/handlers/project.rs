//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use devtrack_core::types::DbId;
use devtrack_db::models::project::{Project, ProjectWithCounts};
use serde::Deserialize;

use crate::error::AppResult;
use crate::query::ProjectListQuery;
use crate::response::ApiResponse;
use crate::services::project::{CreateProjectRequest, ProjectStats, UpdateProjectRequest};
use crate::services::ProjectService;
use crate::state::AppState;

/// Query parameters for `GET /api/projects/{id}`.
#[derive(Debug, Deserialize)]
pub struct IncludeParams {
    /// Eager-load tasks and repositories. Defaults to `true`.
    pub include: Option<bool>,
}

/// Query parameters for `GET /api/projects/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Project>>)> {
    let project = ProjectService::create(&state, input).await?;
    Ok(ApiResponse::created("Project created", project))
}

/// GET /api/projects
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let paged = ProjectService::list(&state, query).await?;
    Ok(ApiResponse::paginated(
        "Projects retrieved",
        paged.items,
        paged.pagination,
    ))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<IncludeParams>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let include = params.include.unwrap_or(true);
    let project = ProjectService::get_by_id(&state, id, include).await?;
    Ok(ApiResponse::ok("Project retrieved", project))
}

/// PUT /api/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let project = ProjectService::update(&state, id, input).await?;
    Ok(ApiResponse::ok("Project updated", project))
}

/// DELETE /api/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    ProjectService::delete(&state, id).await?;
    Ok(ApiResponse::message("Project deleted"))
}

/// GET /api/projects/stats
pub async fn stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProjectStats>>> {
    let stats = ProjectService::stats(&state).await?;
    Ok(ApiResponse::ok("Project statistics retrieved", stats))
}

/// GET /api/projects/search?q=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<ApiResponse<Vec<ProjectWithCounts>>>> {
    let query = params.q.unwrap_or_default();
    let results = ProjectService::search(&state, &query).await?;
    Ok(ApiResponse::ok("Search results retrieved", results))
}
