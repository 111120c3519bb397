//! Integration tests for the GitHub repository store: upsert identity,
//! stale-row reconciliation, and aggregate statistics.

use chrono::{TimeZone, Utc};
use devtrack_core::project::ProjectStatus;
use devtrack_core::types::Timestamp;
use devtrack_db::models::github_repo::CreateGithubRepo;
use devtrack_db::models::project::CreateProject;
use devtrack_db::repositories::{GithubRepoRepo, ProjectRepo};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn at(y: i32, m: u32, d: u32) -> Timestamp {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

async fn seed_project(pool: &SqlitePool, name: &str) -> i64 {
    let input = CreateProject {
        name: name.to_string(),
        description: None,
        status: ProjectStatus::Active,
        start_date: None,
        end_date: None,
    };
    ProjectRepo::create(pool, &input).await.unwrap().id
}

fn new_repo(github_id: i64, name: &str, username: &str) -> CreateGithubRepo {
    CreateGithubRepo {
        github_id,
        name: name.to_string(),
        full_name: format!("{username}/{name}"),
        description: None,
        html_url: format!("https://github.com/{username}/{name}"),
        clone_url: format!("https://github.com/{username}/{name}.git"),
        language: Some("Rust".to_string()),
        stargazers_count: 0,
        forks_count: 0,
        private: false,
        username: username.to_string(),
        github_created_at: at(2024, 1, 1),
        github_updated_at: at(2024, 6, 1),
    }
}

// ---------------------------------------------------------------------------
// Upsert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn upsert_inserts_then_updates_in_place(pool: SqlitePool) {
    let project_id = seed_project(&pool, "P").await;

    let first = GithubRepoRepo::upsert(&pool, project_id, &new_repo(100, "tool", "alice"))
        .await
        .unwrap();
    assert_eq!(first.github_id, 100);
    assert_eq!(first.stargazers_count, 0);

    let mut renamed = new_repo(100, "tool-rs", "alice");
    renamed.stargazers_count = 7;
    let second = GithubRepoRepo::upsert(&pool, project_id, &renamed).await.unwrap();

    // Same external identity, same row.
    assert_eq!(second.id, first.id);
    assert_eq!(second.name, "tool-rs");
    assert_eq!(second.stargazers_count, 7);

    let stored = GithubRepoRepo::find_by_project(&pool, project_id).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn find_by_github_id_round_trips(pool: SqlitePool) {
    let project_id = seed_project(&pool, "P").await;
    GithubRepoRepo::upsert(&pool, project_id, &new_repo(200, "finder", "alice"))
        .await
        .unwrap();

    let found = GithubRepoRepo::find_by_github_id(&pool, 200).await.unwrap().unwrap();
    assert_eq!(found.full_name, "alice/finder");
    assert!(GithubRepoRepo::find_by_github_id(&pool, 999).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn delete_stale_prunes_only_missing_ids(pool: SqlitePool) {
    let project_id = seed_project(&pool, "P").await;
    for (id, name) in [(1, "keep"), (2, "stale"), (3, "also-keep")] {
        GithubRepoRepo::upsert(&pool, project_id, &new_repo(id, name, "alice"))
            .await
            .unwrap();
    }

    let pruned = GithubRepoRepo::delete_stale(&pool, project_id, "alice", &[1, 3])
        .await
        .unwrap();
    assert_eq!(pruned, 1);

    let remaining = GithubRepoRepo::find_by_project_and_username(&pool, project_id, "alice")
        .await
        .unwrap();
    let names: Vec<&str> = remaining.iter().map(|r| r.name.as_str()).collect();
    assert!(names.contains(&"keep"));
    assert!(names.contains(&"also-keep"));
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_stale_with_empty_keep_list_clears_user(pool: SqlitePool) {
    let project_id = seed_project(&pool, "P").await;
    GithubRepoRepo::upsert(&pool, project_id, &new_repo(1, "a", "alice")).await.unwrap();
    GithubRepoRepo::upsert(&pool, project_id, &new_repo(2, "b", "bob")).await.unwrap();

    let pruned = GithubRepoRepo::delete_stale(&pool, project_id, "alice", &[]).await.unwrap();
    assert_eq!(pruned, 1);

    // Other usernames under the project are untouched.
    let bobs = GithubRepoRepo::find_by_project_and_username(&pool, project_id, "bob")
        .await
        .unwrap();
    assert_eq!(bobs.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn sync_upserts_and_prunes_atomically(pool: SqlitePool) {
    let project_id = seed_project(&pool, "P").await;
    GithubRepoRepo::upsert(&pool, project_id, &new_repo(1, "old", "alice")).await.unwrap();

    let batch = vec![new_repo(2, "fresh", "alice"), new_repo(3, "newer", "alice")];
    let synced = GithubRepoRepo::sync_for_project(&pool, project_id, "alice", &batch)
        .await
        .unwrap();
    assert_eq!(synced.len(), 2);

    let stored = GithubRepoRepo::find_by_project_and_username(&pool, project_id, "alice")
        .await
        .unwrap();
    let ids: Vec<i64> = stored.iter().map(|r| r.github_id).collect();
    assert!(!ids.contains(&1));
    assert!(ids.contains(&2));
    assert!(ids.contains(&3));
}

#[sqlx::test(migrations = "./migrations")]
async fn sync_twice_is_idempotent(pool: SqlitePool) {
    let project_id = seed_project(&pool, "P").await;
    let batch = vec![new_repo(10, "one", "alice"), new_repo(11, "two", "alice")];

    GithubRepoRepo::sync_for_project(&pool, project_id, "alice", &batch).await.unwrap();
    GithubRepoRepo::sync_for_project(&pool, project_id, "alice", &batch).await.unwrap();

    let stored = GithubRepoRepo::find_by_project_and_username(&pool, project_id, "alice")
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_project_cascades_to_repos(pool: SqlitePool) {
    let project_id = seed_project(&pool, "P").await;
    GithubRepoRepo::upsert(&pool, project_id, &new_repo(1, "child", "alice")).await.unwrap();

    ProjectRepo::delete(&pool, project_id).await.unwrap();

    assert!(GithubRepoRepo::find_by_github_id(&pool, 1).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Reads and aggregates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn listing_orders_by_stars_then_update_time(pool: SqlitePool) {
    let project_id = seed_project(&pool, "P").await;

    let mut popular = new_repo(1, "popular", "alice");
    popular.stargazers_count = 50;
    GithubRepoRepo::upsert(&pool, project_id, &popular).await.unwrap();

    let mut fresh = new_repo(2, "fresh", "alice");
    fresh.stargazers_count = 5;
    fresh.github_updated_at = at(2024, 6, 10);
    GithubRepoRepo::upsert(&pool, project_id, &fresh).await.unwrap();

    let mut older = new_repo(3, "older", "alice");
    older.stargazers_count = 5;
    older.github_updated_at = at(2024, 5, 1);
    GithubRepoRepo::upsert(&pool, project_id, &older).await.unwrap();

    let stored = GithubRepoRepo::find_by_project_and_username(&pool, project_id, "alice")
        .await
        .unwrap();
    let names: Vec<&str> = stored.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["popular", "fresh", "older"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn language_and_star_filters(pool: SqlitePool) {
    let project_id = seed_project(&pool, "P").await;

    let mut rusty = new_repo(1, "rusty", "alice");
    rusty.stargazers_count = 10;
    GithubRepoRepo::upsert(&pool, project_id, &rusty).await.unwrap();

    let mut scripted = new_repo(2, "scripted", "alice");
    scripted.language = Some("TypeScript".to_string());
    scripted.stargazers_count = 3;
    GithubRepoRepo::upsert(&pool, project_id, &scripted).await.unwrap();

    let rust_repos = GithubRepoRepo::find_by_language(&pool, project_id, "rust").await.unwrap();
    assert_eq!(rust_repos.len(), 1);
    assert_eq!(rust_repos[0].name, "rusty");

    let starred = GithubRepoRepo::find_by_min_stars(&pool, project_id, 5).await.unwrap();
    assert_eq!(starred.len(), 1);
    assert_eq!(starred[0].name, "rusty");
}

#[sqlx::test(migrations = "./migrations")]
async fn stats_aggregate_per_project(pool: SqlitePool) {
    let project_id = seed_project(&pool, "P").await;
    let other_id = seed_project(&pool, "Other").await;

    let mut a = new_repo(1, "a", "alice");
    a.stargazers_count = 10;
    a.forks_count = 2;
    GithubRepoRepo::upsert(&pool, project_id, &a).await.unwrap();

    let mut b = new_repo(2, "b", "alice");
    b.stargazers_count = 5;
    b.forks_count = 1;
    b.language = Some("Go".to_string());
    b.github_updated_at = at(2024, 7, 1);
    GithubRepoRepo::upsert(&pool, project_id, &b).await.unwrap();

    GithubRepoRepo::upsert(&pool, other_id, &new_repo(3, "c", "bob")).await.unwrap();

    let stats = GithubRepoRepo::stats_for_project(&pool, project_id).await.unwrap();
    assert_eq!(stats.total_repos, 2);
    assert_eq!(stats.total_stars, 15);
    assert_eq!(stats.total_forks, 3);
    assert_eq!(stats.last_updated, Some(at(2024, 7, 1)));

    let histogram = GithubRepoRepo::language_histogram(&pool, project_id).await.unwrap();
    assert_eq!(histogram.len(), 2);
    assert!(histogram.iter().any(|l| l.language == "Rust" && l.count == 1));
    assert!(histogram.iter().any(|l| l.language == "Go" && l.count == 1));
}

#[sqlx::test(migrations = "./migrations")]
async fn stats_empty_project_is_zeroed(pool: SqlitePool) {
    let project_id = seed_project(&pool, "Empty").await;
    let stats = GithubRepoRepo::stats_for_project(&pool, project_id).await.unwrap();
    assert_eq!(stats.total_repos, 0);
    assert_eq!(stats.total_stars, 0);
    assert_eq!(stats.total_forks, 0);
    assert_eq!(stats.last_updated, None);
}
