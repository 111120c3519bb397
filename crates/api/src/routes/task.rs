//! Route definitions for the `/tasks` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::task;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(task::list).post(task::create))
        .route("/stats", get(task::stats))
        .route(
            "/{id}",
            get(task::get_by_id).put(task::update).delete(task::delete),
        )
        .route("/{id}/complete", patch(task::complete))
        .route("/{id}/start", patch(task::start))
        .route("/{id}/cancel", patch(task::cancel))
}
