//! Route definitions for the `/projects` resource.
//!
//! Also nests the project-scoped task listing and the GitHub sync
//! endpoints under `/projects/{id}/...`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{github, project, task};
use crate::state::AppState;

/// Routes mounted at `/projects`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/stats", get(project::stats))
        .route("/search", get(project::search))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/tasks", get(task::list_by_project))
        .route("/{id}/github/{username}", get(github::sync_user_repos))
        .route("/{id}/github", post(github::create_manual))
        .route("/{id}/github-cache", delete(github::clear_cache))
}
