pub mod health;
pub mod project;
pub mod task;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                          list, create
/// /projects/stats                    aggregate statistics
/// /projects/search                   free-text search
/// /projects/{id}                     get, update, delete
/// /projects/{id}/tasks               project-scoped task listing
/// /projects/{id}/github/{username}   fetch-and-sync GitHub repositories
/// /projects/{id}/github              manual repository input
/// /projects/{id}/github-cache        invalidate GitHub cache (DELETE)
///
/// /tasks                             list, create
/// /tasks/stats                       aggregate statistics
/// /tasks/{id}                        get, update, delete
/// /tasks/{id}/complete               status overwrite (PATCH)
/// /tasks/{id}/start                  status overwrite (PATCH)
/// /tasks/{id}/cancel                 status overwrite (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/tasks", task::router())
}
