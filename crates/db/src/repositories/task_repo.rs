//! Repository for the `tasks` table.

use chrono::{Duration, NaiveDate, Utc};
use devtrack_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::task::{
    CreateTask, Task, TaskPriorityCount, TaskScopeFilter, TaskStatusCount, UpdateTask,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, description, status, priority, due_date, project_id, created_at, updated_at";

/// Default listing order: highest priority first, newest first within a
/// priority.
const ORDER_BY_PRIORITY: &str = "\
    ORDER BY CASE priority \
        WHEN 'critical' THEN 4 \
        WHEN 'high' THEN 3 \
        WHEN 'medium' THEN 2 \
        ELSE 1 END DESC, \
    created_at DESC";

/// Statuses that exempt a task from overdue/due-soon queries.
const OPEN_STATUS_CLAUSE: &str = "status NOT IN ('completed', 'cancelled')";

/// Provides CRUD and filtered read operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    ///
    /// The referenced project must exist; the caller checks this first so a
    /// missing project surfaces as NotFound rather than a constraint error.
    pub async fn create(pool: &SqlitePool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO tasks (title, description, status, priority, due_date, project_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.as_str())
            .bind(input.priority.as_str())
            .bind(input.due_date)
            .bind(input.project_id)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find a task by its internal ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all tasks in the default priority order.
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks {ORDER_BY_PRIORITY}");
        sqlx::query_as::<_, Task>(&query).fetch_all(pool).await
    }

    /// List a project's tasks with optional status/priority/overdue
    /// sub-filters, in the default priority order.
    pub async fn find_by_project(
        pool: &SqlitePool,
        project_id: DbId,
        filter: &TaskScopeFilter,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE project_id = $1
               AND ($2 IS NULL OR status = $2)
               AND ($3 IS NULL OR priority = $3)
               AND ($4 IS NULL OR (due_date IS NOT NULL AND due_date < $4 AND {OPEN_STATUS_CLAUSE}))
             {ORDER_BY_PRIORITY}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.priority.map(|p| p.as_str()))
            .bind(filter.overdue_on)
            .fetch_all(pool)
            .await
    }

    /// List tasks in one status.
    pub async fn find_by_status(pool: &SqlitePool, status: &str) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE status = $1 {ORDER_BY_PRIORITY}");
        sqlx::query_as::<_, Task>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// List tasks at one priority.
    pub async fn find_by_priority(
        pool: &SqlitePool,
        priority: &str,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE priority = $1 {ORDER_BY_PRIORITY}");
        sqlx::query_as::<_, Task>(&query)
            .bind(priority)
            .fetch_all(pool)
            .await
    }

    /// List open tasks whose due date is strictly before `today`.
    pub async fn find_overdue(
        pool: &SqlitePool,
        today: NaiveDate,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE due_date IS NOT NULL AND due_date < $1 AND {OPEN_STATUS_CLAUSE}
             {ORDER_BY_PRIORITY}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(today)
            .fetch_all(pool)
            .await
    }

    /// List open tasks due within the next `days` days (inclusive of
    /// today), soonest first.
    pub async fn find_due_within(
        pool: &SqlitePool,
        today: NaiveDate,
        days: i64,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let until = today + Duration::days(days);
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE due_date IS NOT NULL AND due_date >= $1 AND due_date <= $2
               AND {OPEN_STATUS_CLAUSE}
             ORDER BY due_date ASC, created_at DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(today)
            .bind(until)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive substring search across title and description.
    pub async fn search(pool: &SqlitePool, term: &str) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE lower(title) LIKE '%' || lower($1) || '%'
                OR lower(COALESCE(description, '')) LIKE '%' || lower($1) || '%'
             {ORDER_BY_PRIORITY}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(term)
            .fetch_all(pool)
            .await
    }

    /// The `n` most recently created tasks, optionally scoped to a project.
    pub async fn find_recent(
        pool: &SqlitePool,
        project_id: Option<DbId>,
        n: i64,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE ($1 IS NULL OR project_id = $1)
             ORDER BY created_at DESC LIMIT $2"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(n)
            .fetch_all(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied;
    /// `project_id` never changes.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                priority = COALESCE($5, priority),
                due_date = COALESCE($6, due_date),
                updated_at = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.priority.map(|p| p.as_str()))
            .bind(input.due_date)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Delete a task by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of tasks.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await
    }

    /// Task counts grouped by status, optionally scoped to a project.
    pub async fn count_by_status(
        pool: &SqlitePool,
        project_id: Option<DbId>,
    ) -> Result<Vec<TaskStatusCount>, sqlx::Error> {
        sqlx::query_as::<_, TaskStatusCount>(
            "SELECT status, COUNT(*) AS count FROM tasks
             WHERE ($1 IS NULL OR project_id = $1)
             GROUP BY status",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Task counts grouped by priority, optionally scoped to a project.
    pub async fn count_by_priority(
        pool: &SqlitePool,
        project_id: Option<DbId>,
    ) -> Result<Vec<TaskPriorityCount>, sqlx::Error> {
        sqlx::query_as::<_, TaskPriorityCount>(
            "SELECT priority, COUNT(*) AS count FROM tasks
             WHERE ($1 IS NULL OR project_id = $1)
             GROUP BY priority",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Number of open tasks past their due date, optionally scoped to a
    /// project.
    pub async fn count_overdue(
        pool: &SqlitePool,
        project_id: Option<DbId>,
        today: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM tasks
             WHERE due_date IS NOT NULL AND due_date < $2 AND {OPEN_STATUS_CLAUSE}
               AND ($1 IS NULL OR project_id = $1)"
        );
        sqlx::query_scalar(&query)
            .bind(project_id)
            .bind(today)
            .fetch_one(pool)
            .await
    }
}
