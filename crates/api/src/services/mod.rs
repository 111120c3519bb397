//! Business-rule layer: field validation, cross-entity existence checks,
//! and cache orchestration on top of the repositories.
//!
//! Services cache fully serialized payloads (`serde_json::Value`) keyed by
//! the colon-delimited scheme described in `devtrack_cache::invalidate`, so
//! a cache hit reproduces the earlier response byte for byte.

use devtrack_core::pagination::Pagination;
use serde::{Deserialize, Serialize};

pub mod github;
pub mod project;
pub mod task;

pub use github::GithubService;
pub use project::ProjectService;
pub use task::TaskService;

/// A page of items plus its pagination block, as cached and returned by the
/// list services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedPayload {
    pub items: serde_json::Value,
    pub pagination: Pagination,
}

/// Cache-key fragment for an optional filter value (`-` when absent).
pub(crate) fn key_part<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}
