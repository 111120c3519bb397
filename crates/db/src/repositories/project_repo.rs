//! Repository for the `projects` table.

use chrono::{NaiveDate, Utc};
use devtrack_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::project::{
    CreateProject, Project, ProjectStatusCount, ProjectWithCounts, UpdateProject,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, status, start_date, end_date, created_at, updated_at";

/// Child-count subqueries appended to listing reads.
const COUNT_COLUMNS: &str = "\
    (SELECT COUNT(*) FROM tasks t WHERE t.project_id = projects.id) AS tasks_count, \
    (SELECT COUNT(*) FROM github_repos g WHERE g.project_id = projects.id) AS github_repos_count";

/// Provides CRUD and filtered read operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO projects (name, description, status, start_date, end_date, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status.as_str())
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects with child counts, most recently created first.
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<ProjectWithCounts>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {COUNT_COLUMNS} FROM projects ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ProjectWithCounts>(&query)
            .fetch_all(pool)
            .await
    }

    /// List projects in one status, most recently created first.
    pub async fn find_by_status(
        pool: &SqlitePool,
        status: &str,
    ) -> Result<Vec<ProjectWithCounts>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {COUNT_COLUMNS} FROM projects WHERE status = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ProjectWithCounts>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive substring search across name and description.
    pub async fn search(
        pool: &SqlitePool,
        term: &str,
    ) -> Result<Vec<ProjectWithCounts>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {COUNT_COLUMNS} FROM projects
             WHERE lower(name) LIKE '%' || lower($1) || '%'
                OR lower(COALESCE(description, '')) LIKE '%' || lower($1) || '%'
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ProjectWithCounts>(&query)
            .bind(term)
            .fetch_all(pool)
            .await
    }

    /// List projects whose `[start_date, end_date]` interval intersects
    /// `[from, to]`. A missing bound on the project side is treated as open.
    pub async fn find_by_date_range(
        pool: &SqlitePool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ProjectWithCounts>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {COUNT_COLUMNS} FROM projects
             WHERE (start_date IS NOT NULL OR end_date IS NOT NULL)
               AND (start_date IS NULL OR start_date <= $2)
               AND (end_date IS NULL OR end_date >= $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ProjectWithCounts>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// The `n` most recently created projects.
    pub async fn find_recent(pool: &SqlitePool, n: i64) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC LIMIT $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(n)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                updated_at = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Delete a project by ID, cascading to its tasks and repositories.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of projects.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await
    }

    /// Project counts grouped by status.
    pub async fn count_by_status(
        pool: &SqlitePool,
    ) -> Result<Vec<ProjectStatusCount>, sqlx::Error> {
        sqlx::query_as::<_, ProjectStatusCount>(
            "SELECT status, COUNT(*) AS count FROM projects GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }
}
