use std::sync::Arc;
use std::time::Instant;

use devtrack_cache::Cache;
use devtrack_github::GithubClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`). The cache is an explicit injected dependency rather than a
/// process-wide global so tests can build their own instance.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: devtrack_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// In-memory TTL cache for service read paths.
    pub cache: Arc<Cache>,
    /// GitHub API client.
    pub github: Arc<GithubClient>,
    /// Process start time, reported as uptime by the health check.
    pub started_at: Instant,
}
