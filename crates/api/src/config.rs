/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Default cache TTL in seconds for service read paths (default: `300`).
    pub cache_ttl_secs: u64,
    /// Interval between expired-entry cache sweeps (default: `60`).
    pub cache_sweep_interval_secs: u64,
    /// GitHub API base URL (default: the public API).
    pub github_api_url: String,
    /// GitHub request timeout in seconds (default: `5`).
    pub github_timeout_secs: u64,
    /// TTL in seconds for synced GitHub repository payloads (default: `600`).
    pub github_cache_ttl_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                  |
    /// |----------------------------|--------------------------|
    /// | `HOST`                     | `0.0.0.0`                |
    /// | `PORT`                     | `3000`                   |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                     |
    /// | `CACHE_TTL_SECS`           | `300`                    |
    /// | `CACHE_SWEEP_INTERVAL_SECS`| `60`                     |
    /// | `GITHUB_API_URL`           | `https://api.github.com` |
    /// | `GITHUB_TIMEOUT_SECS`      | `5`                      |
    /// | `GITHUB_CACHE_TTL_SECS`    | `600`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let cache_ttl_secs: u64 = std::env::var("CACHE_TTL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("CACHE_TTL_SECS must be a valid u64");

        let cache_sweep_interval_secs: u64 = std::env::var("CACHE_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("CACHE_SWEEP_INTERVAL_SECS must be a valid u64");

        let github_api_url = std::env::var("GITHUB_API_URL")
            .unwrap_or_else(|_| devtrack_github::DEFAULT_API_URL.into());

        let github_timeout_secs: u64 = std::env::var("GITHUB_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("GITHUB_TIMEOUT_SECS must be a valid u64");

        let github_cache_ttl_secs: u64 = std::env::var("GITHUB_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("GITHUB_CACHE_TTL_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            cache_ttl_secs,
            cache_sweep_interval_secs,
            github_api_url,
            github_timeout_secs,
            github_cache_ttl_secs,
        }
    }
}
