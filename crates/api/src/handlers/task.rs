//! Handlers for the `/tasks` resource, plus the project-scoped task
//! listing mounted under `/projects/{id}/tasks`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use devtrack_core::types::DbId;
use devtrack_db::models::task::TaskView;
use serde::Deserialize;

use crate::error::AppResult;
use crate::query::{ProjectTasksQuery, TaskListQuery};
use crate::response::ApiResponse;
use crate::services::task::{CreateTaskRequest, TaskStats, UpdateTaskRequest};
use crate::services::TaskService;
use crate::state::AppState;

/// Query parameters for `GET /api/tasks/stats`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsParams {
    pub project_id: Option<DbId>,
}

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<TaskView>>)> {
    let task = TaskService::create(&state, input).await?;
    Ok(ApiResponse::created("Task created", task))
}

/// GET /api/tasks
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let paged = TaskService::list(&state, query).await?;
    Ok(ApiResponse::paginated(
        "Tasks retrieved",
        paged.items,
        paged.pagination,
    ))
}

/// GET /api/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let task = TaskService::get_by_id(&state, id).await?;
    Ok(ApiResponse::ok("Task retrieved", task))
}

/// PUT /api/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTaskRequest>,
) -> AppResult<Json<ApiResponse<TaskView>>> {
    let task = TaskService::update(&state, id, input).await?;
    Ok(ApiResponse::ok("Task updated", task))
}

/// DELETE /api/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    TaskService::delete(&state, id).await?;
    Ok(ApiResponse::message("Task deleted"))
}

/// GET /api/projects/{id}/tasks
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(query): Query<ProjectTasksQuery>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let tasks = TaskService::get_by_project(&state, project_id, query).await?;
    Ok(ApiResponse::ok("Project tasks retrieved", tasks))
}

/// GET /api/tasks/stats
pub async fn stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> AppResult<Json<ApiResponse<TaskStats>>> {
    let stats = TaskService::stats(&state, params.project_id).await?;
    Ok(ApiResponse::ok("Task statistics retrieved", stats))
}

/// PATCH /api/tasks/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<TaskView>>> {
    let task = TaskService::complete(&state, id).await?;
    Ok(ApiResponse::ok("Task completed", task))
}

/// PATCH /api/tasks/{id}/start
pub async fn start(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<TaskView>>> {
    let task = TaskService::start(&state, id).await?;
    Ok(ApiResponse::ok("Task started", task))
}

/// PATCH /api/tasks/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<TaskView>>> {
    let task = TaskService::cancel(&state, id).await?;
    Ok(ApiResponse::ok("Task cancelled", task))
}
