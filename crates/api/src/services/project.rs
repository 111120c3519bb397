//! Business rules and cache orchestration for the `/projects` resource.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use devtrack_core::error::CoreError;
use devtrack_core::pagination::{clamp_limit, clamp_page, slice_bounds, Pagination};
use devtrack_core::project::{self as rules, ProjectStatus};
use devtrack_core::types::DbId;
use devtrack_core::validation::ValidationErrors;
use devtrack_cache::invalidate;
use devtrack_db::models::project::{
    CreateProject, Project, ProjectWithCounts, ProjectWithRelations, UpdateProject,
};
use devtrack_db::models::task::{TaskScopeFilter, TaskView};
use devtrack_db::models::github_repo::GithubRepoView;
use devtrack_db::repositories::{GithubRepoRepo, ProjectRepo, TaskRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::query::ProjectListQuery;
use crate::services::{key_part, PagedPayload};
use crate::state::AppState;

/// Minimum length for the free-text search query.
const SEARCH_MIN: usize = 2;

/// How many recent projects the stats payload carries.
const RECENT_COUNT: i64 = 5;

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

/// Body for `POST /api/projects`. Fields are optional so every failing
/// field can be collected into one validation response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}

/// Body for `PUT /api/projects/{id}`. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}

/// Aggregate payload for `GET /api/projects/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total: i64,
    pub by_status: BTreeMap<String, i64>,
    pub recent: Vec<Project>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Business rules for projects: field validation, cache keys, and the
/// single-active-filter listing contract.
pub struct ProjectService;

impl ProjectService {
    /// Create a project after validating every field, then clear the
    /// project listing caches.
    pub async fn create(state: &AppState, input: CreateProjectRequest) -> AppResult<Project> {
        let mut errors = ValidationErrors::new();
        match input.name.as_deref() {
            None => errors.push("name", "is required"),
            Some(name) => rules::validate_name(name, &mut errors),
        }
        rules::validate_description(input.description.as_deref(), &mut errors);
        let status = rules::validate_status(input.status.as_deref(), &mut errors).unwrap_or_default();
        rules::validate_date_range(input.start_date, input.end_date, &mut errors);
        rules::validate_start_not_past(input.start_date, Utc::now().date_naive(), &mut errors);
        errors.into_result()?;

        let created = ProjectRepo::create(
            &state.pool,
            &CreateProject {
                name: input.name.unwrap_or_default(),
                description: input.description,
                status,
                start_date: input.start_date,
                end_date: input.end_date,
            },
        )
        .await?;

        invalidate::invalidate_project(&state.cache, created.id).await;
        Ok(created)
    }

    /// Paginated listing with exactly one active filter dimension, cached
    /// per filters + page + limit.
    ///
    /// Filter priority: free-text search, else status, else date-range
    /// (both bounds required), else unfiltered. The filtered set is fetched
    /// whole and sliced in memory.
    pub async fn list(state: &AppState, query: ProjectListQuery) -> AppResult<PagedPayload> {
        let page = clamp_page(query.page);
        let limit = clamp_limit(query.limit);

        let search = query.search.clone().filter(|s| !s.is_empty());
        let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => Some(ProjectStatus::from_str(s)?),
            None => None,
        };
        let date_range = match (query.start_date, query.end_date) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        };

        let key = format!(
            "projects:list:{}:{}:{}:{}:p{page}:l{limit}",
            key_part(&search),
            key_part(&status.map(|s| s.as_str())),
            key_part(&query.start_date),
            key_part(&query.end_date),
        );

        let value = state
            .cache
            .get_or_set(&key, Some(Self::ttl(state)), || async move {
                let items: Vec<ProjectWithCounts> = if let Some(term) = &search {
                    ProjectRepo::search(&state.pool, term).await?
                } else if let Some(status) = status {
                    ProjectRepo::find_by_status(&state.pool, status.as_str()).await?
                } else if let Some((from, to)) = date_range {
                    ProjectRepo::find_by_date_range(&state.pool, from, to).await?
                } else {
                    ProjectRepo::find_all(&state.pool).await?
                };

                let total = items.len() as i64;
                let (start, end) = slice_bounds(items.len(), page, limit);
                let payload = PagedPayload {
                    items: serde_json::to_value(&items[start..end])?,
                    pagination: Pagination::compute(total, page, limit),
                };
                Ok::<_, AppError>(serde_json::to_value(payload)?)
            })
            .await?;

        Ok(serde_json::from_value(value)?)
    }

    /// Single-project read, cached per shape. With relations, the payload
    /// eager-loads tasks and repositories with their derived attributes.
    pub async fn get_by_id(
        state: &AppState,
        id: DbId,
        include_relations: bool,
    ) -> AppResult<serde_json::Value> {
        let shape = if include_relations { "with-relations" } else { "basic" };
        let key = format!("project:{id}:{shape}");

        state
            .cache
            .get_or_set(&key, Some(Self::ttl(state)), || async move {
                let project = ProjectRepo::find_by_id(&state.pool, id)
                    .await?
                    .ok_or(AppError::Core(CoreError::NotFound {
                        entity: "Project",
                        id,
                    }))?;

                if !include_relations {
                    return Ok(serde_json::to_value(project)?);
                }

                let now = Utc::now();
                let today = now.date_naive();
                let tasks: Vec<TaskView> =
                    TaskRepo::find_by_project(&state.pool, id, &TaskScopeFilter::default())
                        .await?
                        .into_iter()
                        .map(|t| t.into_view(today))
                        .collect();
                let github_repos: Vec<GithubRepoView> =
                    GithubRepoRepo::find_by_project(&state.pool, id)
                        .await?
                        .into_iter()
                        .map(|r| r.into_view(now))
                        .collect();

                let payload = ProjectWithRelations {
                    tasks_count: tasks.len() as i64,
                    github_repos_count: github_repos.len() as i64,
                    project,
                    tasks,
                    github_repos,
                };
                Ok::<_, AppError>(serde_json::to_value(payload)?)
            })
            .await
    }

    /// Partial update with the create-time field rules applied to whatever
    /// was provided. Clears the project caches and returns the freshly
    /// reloaded project with relations.
    pub async fn update(
        state: &AppState,
        id: DbId,
        input: UpdateProjectRequest,
    ) -> AppResult<serde_json::Value> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = input.name.as_deref() {
            rules::validate_name(name, &mut errors);
        }
        rules::validate_description(input.description.as_deref(), &mut errors);
        let status = rules::validate_status(input.status.as_deref(), &mut errors);
        rules::validate_date_range(input.start_date, input.end_date, &mut errors);
        errors.into_result()?;

        let patch = UpdateProject {
            name: input.name,
            description: input.description,
            status,
            start_date: input.start_date,
            end_date: input.end_date,
        };

        ProjectRepo::update(&state.pool, id, &patch)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id,
            }))?;

        invalidate::invalidate_project(&state.cache, id).await;
        Self::get_by_id(state, id, true).await
    }

    /// Delete a project (children cascade at the persistence layer) and
    /// clear every cache that could still mention it or its children.
    pub async fn delete(state: &AppState, id: DbId) -> AppResult<()> {
        ProjectRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id,
            }))?;

        ProjectRepo::delete(&state.pool, id).await?;

        invalidate::invalidate_project(&state.cache, id).await;
        // Cascade-deleted children may still sit in task and repo caches.
        state.cache.delete_pattern("task:*").await;
        state.cache.delete_pattern("tasks:*").await;
        invalidate::invalidate_github(&state.cache, id, None).await;
        Ok(())
    }

    /// Cached aggregate: total count, counts by status, and the most
    /// recently created projects.
    pub async fn stats(state: &AppState) -> AppResult<ProjectStats> {
        let value = state
            .cache
            .get_or_set("projects:stats", Some(Self::ttl(state)), || async move {
                let total = ProjectRepo::count(&state.pool).await?;
                let counted = ProjectRepo::count_by_status(&state.pool).await?;
                let mut by_status = BTreeMap::new();
                for status in [
                    ProjectStatus::Active,
                    ProjectStatus::Inactive,
                    ProjectStatus::Completed,
                ] {
                    let count = counted
                        .iter()
                        .find(|c| c.status == status.as_str())
                        .map(|c| c.count)
                        .unwrap_or(0);
                    by_status.insert(status.as_str().to_string(), count);
                }
                let recent = ProjectRepo::find_recent(&state.pool, RECENT_COUNT).await?;
                let stats = ProjectStats {
                    total,
                    by_status,
                    recent,
                };
                Ok::<_, AppError>(serde_json::to_value(stats)?)
            })
            .await?;

        Ok(serde_json::from_value(value)?)
    }

    /// Free-text search. Uncached: low-frequency, high-variance keys.
    pub async fn search(state: &AppState, query: &str) -> AppResult<Vec<ProjectWithCounts>> {
        if query.chars().count() < SEARCH_MIN {
            return Err(CoreError::validation(
                "q",
                format!("must be at least {SEARCH_MIN} characters long"),
            )
            .into());
        }
        Ok(ProjectRepo::search(&state.pool, query).await?)
    }

    fn ttl(state: &AppState) -> Duration {
        Duration::from_secs(state.config.cache_ttl_secs)
    }
}
