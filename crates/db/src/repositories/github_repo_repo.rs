//! Repository for the `github_repos` table.
//!
//! Rows are fetched from the GitHub API and reconciled against what is
//! already stored: an upsert keyed on the external `github_id`, followed by
//! a prune of rows no longer present upstream. The two steps run inside one
//! transaction so a failure never leaves a half-reconciled set.

use chrono::Utc;
use devtrack_core::types::DbId;
use sqlx::{Sqlite, SqlitePool};

use crate::models::github_repo::{CreateGithubRepo, GithubRepo, GithubRepoStats, LanguageCount};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, github_id, name, full_name, description, html_url, clone_url, language, \
    stargazers_count, forks_count, private, username, \
    github_created_at, github_updated_at, project_id, created_at, updated_at";

/// Default listing order: most starred first, most recently pushed first
/// within a star count.
const ORDER_BY_STARS: &str =
    "ORDER BY stargazers_count DESC, github_updated_at DESC";

/// Provides upsert, reconciliation, and read operations for synced GitHub
/// repository metadata.
pub struct GithubRepoRepo;

impl GithubRepoRepo {
    /// Insert or update a repository keyed on `github_id`, returning the
    /// stored row.
    ///
    /// Generic over the executor so it runs both standalone and inside the
    /// reconciliation transaction.
    pub async fn upsert<'e, E>(
        executor: E,
        project_id: DbId,
        input: &CreateGithubRepo,
    ) -> Result<GithubRepo, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO github_repos (
                github_id, name, full_name, description, html_url, clone_url, language,
                stargazers_count, forks_count, private, username,
                github_created_at, github_updated_at, project_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             ON CONFLICT (github_id) DO UPDATE SET
                name = excluded.name,
                full_name = excluded.full_name,
                description = excluded.description,
                html_url = excluded.html_url,
                clone_url = excluded.clone_url,
                language = excluded.language,
                stargazers_count = excluded.stargazers_count,
                forks_count = excluded.forks_count,
                private = excluded.private,
                username = excluded.username,
                github_created_at = excluded.github_created_at,
                github_updated_at = excluded.github_updated_at,
                project_id = excluded.project_id,
                updated_at = excluded.updated_at
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GithubRepo>(&query)
            .bind(input.github_id)
            .bind(&input.name)
            .bind(&input.full_name)
            .bind(&input.description)
            .bind(&input.html_url)
            .bind(&input.clone_url)
            .bind(&input.language)
            .bind(input.stargazers_count)
            .bind(input.forks_count)
            .bind(input.private)
            .bind(&input.username)
            .bind(input.github_created_at)
            .bind(input.github_updated_at)
            .bind(project_id)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await
    }

    /// Remove rows for `project_id` + `username` whose `github_id` is not in
    /// `keep_ids` (repositories deleted or renamed upstream). Returns the
    /// number of rows pruned.
    pub async fn delete_stale<'e, E>(
        executor: E,
        project_id: DbId,
        username: &str,
        keep_ids: &[i64],
    ) -> Result<u64, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let query = if keep_ids.is_empty() {
            "DELETE FROM github_repos WHERE project_id = $1 AND username = $2".to_string()
        } else {
            let placeholders = (0..keep_ids.len())
                .map(|i| format!("${}", i + 3))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "DELETE FROM github_repos
                 WHERE project_id = $1 AND username = $2 AND github_id NOT IN ({placeholders})"
            )
        };
        let mut q = sqlx::query(&query).bind(project_id).bind(username);
        for id in keep_ids {
            q = q.bind(id);
        }
        let result = q.execute(executor).await?;
        Ok(result.rows_affected())
    }

    /// Reconcile the stored set for `project_id` + `username` against a
    /// freshly fetched batch: upsert every entry, then prune rows absent
    /// from the batch. Runs in a single transaction.
    pub async fn sync_for_project(
        pool: &SqlitePool,
        project_id: DbId,
        username: &str,
        batch: &[CreateGithubRepo],
    ) -> Result<Vec<GithubRepo>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut synced = Vec::with_capacity(batch.len());
        for input in batch {
            synced.push(Self::upsert(&mut *tx, project_id, input).await?);
        }
        let keep_ids: Vec<i64> = batch.iter().map(|r| r.github_id).collect();
        Self::delete_stale(&mut *tx, project_id, username, &keep_ids).await?;
        tx.commit().await?;
        Ok(synced)
    }

    /// Find a repository by its external GitHub ID.
    pub async fn find_by_github_id(
        pool: &SqlitePool,
        github_id: i64,
    ) -> Result<Option<GithubRepo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM github_repos WHERE github_id = $1");
        sqlx::query_as::<_, GithubRepo>(&query)
            .bind(github_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a repository by its internal ID.
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<GithubRepo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM github_repos WHERE id = $1");
        sqlx::query_as::<_, GithubRepo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's repositories in the default star order.
    pub async fn find_by_project(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<Vec<GithubRepo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM github_repos WHERE project_id = $1 {ORDER_BY_STARS}"
        );
        sqlx::query_as::<_, GithubRepo>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List the repositories stored for `project_id` + `username` in the
    /// default star order.
    pub async fn find_by_project_and_username(
        pool: &SqlitePool,
        project_id: DbId,
        username: &str,
    ) -> Result<Vec<GithubRepo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM github_repos
             WHERE project_id = $1 AND username = $2
             {ORDER_BY_STARS}"
        );
        sqlx::query_as::<_, GithubRepo>(&query)
            .bind(project_id)
            .bind(username)
            .fetch_all(pool)
            .await
    }

    /// List a project's repositories whose language contains `term`
    /// (case-insensitive).
    pub async fn find_by_language(
        pool: &SqlitePool,
        project_id: DbId,
        term: &str,
    ) -> Result<Vec<GithubRepo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM github_repos
             WHERE project_id = $1
               AND lower(COALESCE(language, '')) LIKE '%' || lower($2) || '%'
             {ORDER_BY_STARS}"
        );
        sqlx::query_as::<_, GithubRepo>(&query)
            .bind(project_id)
            .bind(term)
            .fetch_all(pool)
            .await
    }

    /// List a project's repositories with at least `min_stars` stars.
    pub async fn find_by_min_stars(
        pool: &SqlitePool,
        project_id: DbId,
        min_stars: i64,
    ) -> Result<Vec<GithubRepo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM github_repos
             WHERE project_id = $1 AND stargazers_count >= $2
             {ORDER_BY_STARS}"
        );
        sqlx::query_as::<_, GithubRepo>(&query)
            .bind(project_id)
            .bind(min_stars)
            .fetch_all(pool)
            .await
    }

    /// Delete a repository by internal ID. Returns `true` if a row was
    /// removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM github_repos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Aggregate statistics for a project's stored repositories.
    pub async fn stats_for_project(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<GithubRepoStats, sqlx::Error> {
        sqlx::query_as::<_, GithubRepoStats>(
            "SELECT COUNT(*) AS total_repos,
                    COALESCE(SUM(stargazers_count), 0) AS total_stars,
                    COALESCE(SUM(forks_count), 0) AS total_forks,
                    MAX(github_updated_at) AS last_updated
             FROM github_repos WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }

    /// Repository counts per language for a project, most common first.
    pub async fn language_histogram(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<Vec<LanguageCount>, sqlx::Error> {
        sqlx::query_as::<_, LanguageCount>(
            "SELECT language, COUNT(*) AS count FROM github_repos
             WHERE project_id = $1 AND language IS NOT NULL
             GROUP BY language
             ORDER BY count DESC, language ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
