//! Business rules and cache orchestration for the `/tasks` resource.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use devtrack_core::error::CoreError;
use devtrack_core::pagination::{clamp_limit, clamp_page, slice_bounds, Pagination};
use devtrack_core::task::{self as rules, TaskPriority, TaskStatus};
use devtrack_core::types::DbId;
use devtrack_core::validation::ValidationErrors;
use devtrack_cache::invalidate;
use devtrack_db::models::task::{CreateTask, TaskScopeFilter, TaskView, UpdateTask};
use devtrack_db::repositories::{ProjectRepo, TaskRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::query::{ProjectTasksQuery, TaskListQuery};
use crate::services::{key_part, PagedPayload};
use crate::state::AppState;

/// How many recent tasks the stats payload carries.
const RECENT_COUNT: i64 = 5;

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

/// Body for `POST /api/tasks`. Fields are optional so every failing field
/// can be collected into one validation response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<chrono::NaiveDate>,
    pub project_id: Option<DbId>,
}

/// Body for `PUT /api/tasks/{id}`. All fields optional; `projectId` is
/// immutable after creation and therefore absent here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<chrono::NaiveDate>,
}

/// Aggregate payload for `GET /api/tasks/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: i64,
    pub by_status: BTreeMap<String, i64>,
    pub by_priority: BTreeMap<String, i64>,
    pub overdue: i64,
    pub recent: Vec<TaskView>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Business rules for tasks: field validation, the project existence check
/// on create, cache keys, and the filter-priority listing contract.
pub struct TaskService;

impl TaskService {
    /// Create a task after validating every field and verifying the target
    /// project exists, then clear the task listing caches.
    pub async fn create(state: &AppState, input: CreateTaskRequest) -> AppResult<TaskView> {
        let mut errors = ValidationErrors::new();
        match input.title.as_deref() {
            None => errors.push("title", "is required"),
            Some(title) => rules::validate_title(title, &mut errors),
        }
        rules::validate_description(input.description.as_deref(), &mut errors);
        let status = rules::validate_status(input.status.as_deref(), &mut errors).unwrap_or_default();
        let priority =
            rules::validate_priority(input.priority.as_deref(), &mut errors).unwrap_or_default();
        if input.project_id.is_none() {
            errors.push("projectId", "is required");
        }
        errors.into_result()?;

        // The one enforced cross-entity rule: the parent must exist before
        // the insert so a dangling projectId surfaces as 404, not 500.
        let project_id = input.project_id.unwrap_or_default();
        ProjectRepo::find_by_id(&state.pool, project_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            }))?;

        let created = TaskRepo::create(
            &state.pool,
            &CreateTask {
                title: input.title.unwrap_or_default(),
                description: input.description,
                status,
                priority,
                due_date: input.due_date,
                project_id,
            },
        )
        .await?;

        invalidate::invalidate_task(&state.cache, created.id, Some(project_id)).await;
        Ok(created.into_view(Utc::now().date_naive()))
    }

    /// Paginated listing with exactly one active filter dimension, cached
    /// per filters + page + limit.
    ///
    /// Filter priority: overdue, else due-within-N-days, else
    /// project-scoped (with nested status/priority), else status, else
    /// priority, else unfiltered.
    pub async fn list(state: &AppState, query: TaskListQuery) -> AppResult<PagedPayload> {
        let page = clamp_page(query.page);
        let limit = clamp_limit(query.limit);

        let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => Some(TaskStatus::from_str(s)?),
            None => None,
        };
        let priority = match query.priority.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => Some(TaskPriority::from_str(s)?),
            None => None,
        };
        if query.due_within_days.is_some_and(|d| d < 0) {
            return Err(CoreError::validation("dueWithinDays", "must not be negative").into());
        }
        let overdue = query.overdue == Some(true);

        let key = format!(
            "tasks:list:{}:{}:{}:{}:{}:p{page}:l{limit}",
            overdue,
            key_part(&query.due_within_days),
            key_part(&query.project_id),
            key_part(&status.map(|s| s.as_str())),
            key_part(&priority.map(|p| p.as_str())),
        );

        let value = state
            .cache
            .get_or_set(&key, Some(Self::ttl(state)), || async move {
                let today = Utc::now().date_naive();
                let tasks = if overdue {
                    TaskRepo::find_overdue(&state.pool, today).await?
                } else if let Some(days) = query.due_within_days {
                    TaskRepo::find_due_within(&state.pool, today, days).await?
                } else if let Some(project_id) = query.project_id {
                    let filter = TaskScopeFilter {
                        status,
                        priority,
                        overdue_on: None,
                    };
                    TaskRepo::find_by_project(&state.pool, project_id, &filter).await?
                } else if let Some(status) = status {
                    TaskRepo::find_by_status(&state.pool, status.as_str()).await?
                } else if let Some(priority) = priority {
                    TaskRepo::find_by_priority(&state.pool, priority.as_str()).await?
                } else {
                    TaskRepo::find_all(&state.pool).await?
                };

                let total = tasks.len() as i64;
                let (start, end) = slice_bounds(tasks.len(), page, limit);
                let views: Vec<TaskView> = tasks[start..end]
                    .iter()
                    .cloned()
                    .map(|t| t.into_view(today))
                    .collect();
                let payload = PagedPayload {
                    items: serde_json::to_value(views)?,
                    pagination: Pagination::compute(total, page, limit),
                };
                Ok::<_, AppError>(serde_json::to_value(payload)?)
            })
            .await?;

        Ok(serde_json::from_value(value)?)
    }

    /// Single-task read with derived attributes, cached.
    pub async fn get_by_id(state: &AppState, id: DbId) -> AppResult<serde_json::Value> {
        let key = format!("task:{id}:detail");
        state
            .cache
            .get_or_set(&key, Some(Self::ttl(state)), || async move {
                let task = TaskRepo::find_by_id(&state.pool, id).await?.ok_or(AppError::Core(
                    CoreError::NotFound { entity: "Task", id },
                ))?;
                let view = task.into_view(Utc::now().date_naive());
                Ok::<_, AppError>(serde_json::to_value(view)?)
            })
            .await
    }

    /// Partial update, revalidating only the provided fields. `projectId`
    /// never changes, so no existence re-check is needed.
    pub async fn update(
        state: &AppState,
        id: DbId,
        input: UpdateTaskRequest,
    ) -> AppResult<TaskView> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = input.title.as_deref() {
            rules::validate_title(title, &mut errors);
        }
        rules::validate_description(input.description.as_deref(), &mut errors);
        let status = rules::validate_status(input.status.as_deref(), &mut errors);
        let priority = rules::validate_priority(input.priority.as_deref(), &mut errors);
        errors.into_result()?;

        let patch = UpdateTask {
            title: input.title,
            description: input.description,
            status,
            priority,
            due_date: input.due_date,
        };

        let updated = TaskRepo::update(&state.pool, id, &patch)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

        invalidate::invalidate_task(&state.cache, id, Some(updated.project_id)).await;
        Ok(updated.into_view(Utc::now().date_naive()))
    }

    /// Delete a task and clear its caches.
    pub async fn delete(state: &AppState, id: DbId) -> AppResult<()> {
        let task = TaskRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

        TaskRepo::delete(&state.pool, id).await?;
        invalidate::invalidate_task(&state.cache, id, Some(task.project_id)).await;
        Ok(())
    }

    /// A project's tasks with optional sub-filters, cached per
    /// project + filter set. The project must exist.
    pub async fn get_by_project(
        state: &AppState,
        project_id: DbId,
        query: ProjectTasksQuery,
    ) -> AppResult<serde_json::Value> {
        ProjectRepo::find_by_id(&state.pool, project_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            }))?;

        let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => Some(TaskStatus::from_str(s)?),
            None => None,
        };
        let priority = match query.priority.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => Some(TaskPriority::from_str(s)?),
            None => None,
        };
        let overdue = query.overdue == Some(true);

        let key = format!(
            "project:{project_id}:tasks:{}:{}:{overdue}",
            key_part(&status.map(|s| s.as_str())),
            key_part(&priority.map(|p| p.as_str())),
        );

        state
            .cache
            .get_or_set(&key, Some(Self::ttl(state)), || async move {
                let today = Utc::now().date_naive();
                let filter = TaskScopeFilter {
                    status,
                    priority,
                    overdue_on: overdue.then_some(today),
                };
                let views: Vec<TaskView> =
                    TaskRepo::find_by_project(&state.pool, project_id, &filter)
                        .await?
                        .into_iter()
                        .map(|t| t.into_view(today))
                        .collect();
                Ok::<_, AppError>(serde_json::to_value(views)?)
            })
            .await
    }

    /// Cached aggregate: counts by status and priority, the overdue count,
    /// and the most recent tasks, optionally scoped to one project.
    pub async fn stats(state: &AppState, project_id: Option<DbId>) -> AppResult<TaskStats> {
        let key = format!("tasks:stats:{}", key_part(&project_id));
        let value = state
            .cache
            .get_or_set(&key, Some(Self::ttl(state)), || async move {
                let today = Utc::now().date_naive();

                let counted = TaskRepo::count_by_status(&state.pool, project_id).await?;
                let mut by_status = BTreeMap::new();
                let mut total = 0;
                for status in [
                    TaskStatus::Pending,
                    TaskStatus::InProgress,
                    TaskStatus::Completed,
                    TaskStatus::Cancelled,
                ] {
                    let count = counted
                        .iter()
                        .find(|c| c.status == status.as_str())
                        .map(|c| c.count)
                        .unwrap_or(0);
                    total += count;
                    by_status.insert(status.as_str().to_string(), count);
                }

                let counted = TaskRepo::count_by_priority(&state.pool, project_id).await?;
                let mut by_priority = BTreeMap::new();
                for priority in [
                    TaskPriority::Low,
                    TaskPriority::Medium,
                    TaskPriority::High,
                    TaskPriority::Critical,
                ] {
                    let count = counted
                        .iter()
                        .find(|c| c.priority == priority.as_str())
                        .map(|c| c.count)
                        .unwrap_or(0);
                    by_priority.insert(priority.as_str().to_string(), count);
                }

                let overdue = TaskRepo::count_overdue(&state.pool, project_id, today).await?;
                let recent: Vec<TaskView> = TaskRepo::find_recent(&state.pool, project_id, RECENT_COUNT)
                    .await?
                    .into_iter()
                    .map(|t| t.into_view(today))
                    .collect();

                let stats = TaskStats {
                    total,
                    by_status,
                    by_priority,
                    overdue,
                    recent,
                };
                Ok::<_, AppError>(serde_json::to_value(stats)?)
            })
            .await?;

        Ok(serde_json::from_value(value)?)
    }

    /// Mark a task completed. An unchecked status overwrite: any status may
    /// follow any other.
    pub async fn complete(state: &AppState, id: DbId) -> AppResult<TaskView> {
        Self::set_status(state, id, TaskStatus::Completed).await
    }

    /// Mark a task in progress. Unchecked, like [`complete`].
    ///
    /// [`complete`]: Self::complete
    pub async fn start(state: &AppState, id: DbId) -> AppResult<TaskView> {
        Self::set_status(state, id, TaskStatus::InProgress).await
    }

    /// Mark a task cancelled. Unchecked, like [`complete`].
    ///
    /// [`complete`]: Self::complete
    pub async fn cancel(state: &AppState, id: DbId) -> AppResult<TaskView> {
        Self::set_status(state, id, TaskStatus::Cancelled).await
    }

    async fn set_status(state: &AppState, id: DbId, status: TaskStatus) -> AppResult<TaskView> {
        Self::update(
            state,
            id,
            UpdateTaskRequest {
                status: Some(status.as_str().to_string()),
                ..Default::default()
            },
        )
        .await
    }

    fn ttl(state: &AppState) -> Duration {
        Duration::from_secs(state.config.cache_ttl_secs)
    }
}
