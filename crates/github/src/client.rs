//! REST client for the GitHub users API, using [`reqwest`].

use std::time::Duration;

use devtrack_core::types::Timestamp;
use devtrack_db::models::github_repo::CreateGithubRepo;
use serde::Deserialize;

/// Public GitHub API base URL. Overridable for tests and proxies.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Fixed page size: only the most recently updated repositories are synced.
pub const FETCH_PAGE_SIZE: u8 = 5;

/// HTTP client for the GitHub REST API.
pub struct GithubClient {
    client: reqwest::Client,
    api_url: String,
}

/// One repository as returned by `GET /users/{username}/repos`.
///
/// Field names mirror the GitHub wire format; [`into_create`] maps them to
/// the internal storage shape.
///
/// [`into_create`]: GithubRepoSummary::into_create
#[derive(Debug, Clone, Deserialize)]
pub struct GithubRepoSummary {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub clone_url: String,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: i64,
    #[serde(default)]
    pub forks_count: i64,
    #[serde(default)]
    pub private: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GithubRepoSummary {
    /// Map the wire shape to the internal storage shape for `username`.
    pub fn into_create(self, username: &str) -> CreateGithubRepo {
        CreateGithubRepo {
            github_id: self.id,
            name: self.name,
            full_name: self.full_name,
            description: self.description,
            html_url: self.html_url,
            clone_url: self.clone_url,
            language: self.language,
            stargazers_count: self.stargazers_count,
            forks_count: self.forks_count,
            private: self.private,
            username: username.to_string(),
            github_created_at: self.created_at,
            github_updated_at: self.updated_at,
        }
    }
}

/// Errors from the GitHub REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("GitHub request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The requested user does not exist (HTTP 404).
    #[error("GitHub user '{0}' not found")]
    UserNotFound(String),

    /// The unauthenticated rate limit was exhausted (HTTP 403).
    #[error("GitHub API rate limit exceeded")]
    RateLimited,

    /// Credentials were rejected (HTTP 401).
    #[error("GitHub API authentication failed")]
    AuthenticationFailed,

    /// Any other non-2xx response, with the body passed through.
    #[error("GitHub API error ({status}): {body}")]
    Api { status: u16, body: String },
}

impl GithubClient {
    /// Create a client for `api_url` with a fixed per-request timeout.
    ///
    /// GitHub rejects requests without a `User-Agent`, so one is always set.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, GithubError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("devtrack/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    /// Fetch the [`FETCH_PAGE_SIZE`] most recently updated public
    /// repositories for `username`. Single attempt, no retry.
    pub async fn list_user_repos(
        &self,
        username: &str,
    ) -> Result<Vec<GithubRepoSummary>, GithubError> {
        tracing::debug!(username, "Fetching repositories from GitHub");
        let per_page = FETCH_PAGE_SIZE.to_string();
        let response = self
            .client
            .get(format!("{}/users/{username}/repos", self.api_url))
            .query(&[
                ("sort", "updated"),
                ("per_page", per_page.as_str()),
                ("type", "public"),
            ])
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(classify_status(status.as_u16(), username, body));
        }

        Ok(response.json::<Vec<GithubRepoSummary>>().await?)
    }
}

/// Map a non-2xx GitHub response to the error taxonomy.
fn classify_status(status: u16, username: &str, body: String) -> GithubError {
    match status {
        404 => GithubError::UserNotFound(username.to_string()),
        403 => GithubError::RateLimited,
        401 => GithubError::AuthenticationFailed,
        _ => GithubError::Api { status, body },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
