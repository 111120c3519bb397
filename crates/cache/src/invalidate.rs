//! Entity-scoped cache invalidation sweeps.
//!
//! Every mutation path calls one of these after a successful write so reads
//! never serve stale data. Key layout (colon-delimited):
//!
//! ```text
//! project:{id}:{shape}          single-project reads (basic / with-relations)
//! project:{id}:tasks:{filters}  project-scoped task listings
//! projects:{...}                project list and stats caches
//! task:{id}:detail              single-task reads
//! tasks:{...}                   task list and stats caches
//! github:{project_id}:{username}:repos   synced repository payloads
//! ```

use devtrack_core::types::DbId;

use crate::Cache;

/// Clear everything cached for one project, including the generic project
/// listing/stats caches that embed it.
pub async fn invalidate_project(cache: &Cache, project_id: DbId) {
    cache.delete_pattern(&format!("project:{project_id}:*")).await;
    cache.delete_pattern("projects:*").await;
}

/// Clear everything cached for one task. When the owning project is known,
/// its project-scoped task listings are cleared as well.
pub async fn invalidate_task(cache: &Cache, task_id: DbId, project_id: Option<DbId>) {
    cache.delete_pattern(&format!("task:{task_id}:*")).await;
    cache.delete_pattern("tasks:*").await;
    if let Some(pid) = project_id {
        cache.delete_pattern(&format!("project:{pid}:tasks:*")).await;
    }
}

/// Clear synced GitHub repository caches for a project, scoped to one
/// username when given, otherwise for every username under the project.
pub async fn invalidate_github(cache: &Cache, project_id: DbId, username: Option<&str>) {
    match username {
        Some(user) => {
            cache
                .delete_pattern(&format!("github:{project_id}:{user}:*"))
                .await;
        }
        None => {
            cache.delete_pattern(&format!("github:{project_id}:*")).await;
        }
    }
}
