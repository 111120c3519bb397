//! Integration tests for the `/api/projects` endpoints: envelope shape,
//! validation collection, caching, invalidation, and pagination.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, build_test_app, get, send, send_json};
use serde_json::json;
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_returns_201_with_defaults(pool: SqlitePool) {
    let app = build_test_app(pool);
    let response = send_json(
        app,
        Method::POST,
        "/api/projects",
        json!({"name": "Apollo"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Apollo");
    assert_eq!(body["data"]["status"], "active");
    assert!(body["timestamp"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_collects_every_failing_field(pool: SqlitePool) {
    let app = build_test_app(pool);
    let response = send_json(
        app,
        Method::POST,
        "/api/projects",
        json!({
            "name": "x",
            "status": "archived",
            "startDate": "2030-06-01",
            "endDate": "2030-01-01"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    let errors = body["errors"].as_array().unwrap();
    let fields: Vec<&str> = errors.iter().map(|e| e["field"].as_str().unwrap()).collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"status"));
    assert!(fields.contains(&"endDate"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_rejects_past_start_date(pool: SqlitePool) {
    let app = build_test_app(pool);
    let response = send_json(
        app,
        Method::POST,
        "/api/projects",
        json!({"name": "Tardy", "startDate": "2020-01-01"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "startDate");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_without_name_is_rejected(pool: SqlitePool) {
    let app = build_test_app(pool);
    let response = send_json(app, Method::POST, "/api/projects", json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "name");
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn first_read_has_zero_child_counts(pool: SqlitePool) {
    let app = build_test_app(pool);
    let response = send_json(app.clone(), Method::POST, "/api/projects", json!({"name": "Fresh"})).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let body = body_json(get(app, &format!("/api/projects/{id}")).await).await;
    assert_eq!(body["data"]["tasksCount"], 0);
    assert_eq!(body["data"]["githubReposCount"], 0);
    assert_eq!(body["data"]["tasks"], json!([]));
    assert_eq!(body["data"]["githubRepos"], json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_without_relations_omits_children(pool: SqlitePool) {
    let app = build_test_app(pool);
    let response = send_json(app.clone(), Method::POST, "/api/projects", json!({"name": "Plain"})).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let body = body_json(get(app, &format!("/api/projects/{id}?include=false")).await).await;
    assert_eq!(body["data"]["name"], "Plain");
    assert!(body["data"].get("tasks").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_missing_project_is_404(pool: SqlitePool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/projects/9999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

// ---------------------------------------------------------------------------
// Caching and invalidation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn read_within_ttl_is_served_from_cache(pool: SqlitePool) {
    let app = build_test_app(pool.clone());
    let response = send_json(app.clone(), Method::POST, "/api/projects", json!({"name": "Cached"})).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let first = body_json(get(app.clone(), &format!("/api/projects/{id}")).await).await;

    // Mutate behind the API's back: a cached read must not see it.
    sqlx::query("UPDATE projects SET name = 'Sneaky' WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let second = body_json(get(app, &format!("/api/projects/{id}")).await).await;
    assert_eq!(second["data"], first["data"]);
    assert_eq!(second["data"]["name"], "Cached");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_invalidates_the_cache(pool: SqlitePool) {
    let app = build_test_app(pool);
    let response = send_json(app.clone(), Method::POST, "/api/projects", json!({"name": "Before"})).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Warm the cache.
    let _ = get(app.clone(), &format!("/api/projects/{id}")).await;

    let response = send_json(
        app.clone(),
        Method::PUT,
        &format!("/api/projects/{id}"),
        json!({"name": "After", "description": "renamed"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "After");

    let body = body_json(get(app, &format!("/api/projects/{id}")).await).await;
    assert_eq!(body["data"]["name"], "After");
    assert_eq!(body["data"]["description"], "renamed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_missing_project_is_404(pool: SqlitePool) {
    let app = build_test_app(pool);
    let response = send_json(
        app,
        Method::PUT,
        "/api/projects/777",
        json!({"name": "Ghost"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_rejects_invalid_fields(pool: SqlitePool) {
    let app = build_test_app(pool);
    let response = send_json(app.clone(), Method::POST, "/api/projects", json!({"name": "Valid"})).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = send_json(
        app,
        Method::PUT,
        &format!("/api/projects/{id}"),
        json!({"status": "paused"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Listing and pagination
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn list_paginates_and_reports_shape(pool: SqlitePool) {
    let app = build_test_app(pool);
    for i in 0..12 {
        send_json(
            app.clone(),
            Method::POST,
            "/api/projects",
            json!({"name": format!("Project {i}")}),
        )
        .await;
    }

    let body = body_json(get(app.clone(), "/api/projects?page=1&limit=5").await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["pagination"]["total"], 12);
    assert_eq!(body["pagination"]["pages"], 3);
    assert_eq!(body["pagination"]["hasNext"], true);

    let body = body_json(get(app, "/api/projects?page=3&limit=5").await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["hasNext"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn page_past_the_end_is_empty_not_an_error(pool: SqlitePool) {
    let app = build_test_app(pool);
    send_json(app.clone(), Method::POST, "/api/projects", json!({"name": "Lone"})).await;

    let response = get(app, "/api/projects?page=9&limit=10").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["hasNext"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_by_status(pool: SqlitePool) {
    let app = build_test_app(pool);
    send_json(app.clone(), Method::POST, "/api/projects", json!({"name": "Running"})).await;
    send_json(
        app.clone(),
        Method::POST,
        "/api/projects",
        json!({"name": "Shelved", "status": "inactive"}),
    )
    .await;

    let body = body_json(get(app.clone(), "/api/projects?status=inactive").await).await;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Shelved");

    let response = get(app, "/api/projects?status=bogus").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_search_filter_takes_priority(pool: SqlitePool) {
    let app = build_test_app(pool);
    send_json(
        app.clone(),
        Method::POST,
        "/api/projects",
        json!({"name": "Billing revamp", "status": "inactive"}),
    )
    .await;
    send_json(app.clone(), Method::POST, "/api/projects", json!({"name": "Docs"})).await;

    // search wins over the (non-matching) status filter.
    let body = body_json(get(app, "/api/projects?search=billing&status=active").await).await;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Billing revamp");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_then_read_is_404(pool: SqlitePool) {
    let app = build_test_app(pool);
    let response = send_json(app.clone(), Method::POST, "/api/projects", json!({"name": "Doomed"})).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = send(app.clone(), Method::DELETE, &format!("/api/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app.clone(), &format!("/api/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(app, Method::DELETE, &format!("/api/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Stats and search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn stats_zero_fill_statuses_and_list_recent(pool: SqlitePool) {
    let app = build_test_app(pool);
    send_json(app.clone(), Method::POST, "/api/projects", json!({"name": "One"})).await;
    send_json(
        app.clone(),
        Method::POST,
        "/api/projects",
        json!({"name": "Two", "status": "completed"}),
    )
    .await;

    let body = body_json(get(app, "/api/projects/stats").await).await;
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["byStatus"]["active"], 1);
    assert_eq!(body["data"]["byStatus"]["completed"], 1);
    assert_eq!(body["data"]["byStatus"]["inactive"], 0);
    assert_eq!(body["data"]["recent"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn search_requires_two_characters(pool: SqlitePool) {
    let app = build_test_app(pool);

    let response = get(app.clone(), "/api/projects/search?q=a").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    send_json(app.clone(), Method::POST, "/api/projects", json!({"name": "Searchable"})).await;
    let body = body_json(get(app, "/api/projects/search?q=search").await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// General HTTP behaviour
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_ok_and_uptime(pool: SqlitePool) {
    let app = build_test_app(pool);
    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db_healthy"], true);
    assert!(body["version"].is_string());
    assert!(body["uptime_secs"].is_u64());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_is_404(pool: SqlitePool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/nothing-here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn responses_carry_a_request_id(pool: SqlitePool) {
    let app = build_test_app(pool);
    let response = get(app, "/health").await;
    assert!(response.headers().get("x-request-id").is_some());
}
