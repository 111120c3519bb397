//! Client for the public GitHub REST API.
//!
//! A single synchronous fetch per call: no pagination beyond the fixed page
//! size, no retry or backoff. The service layer's fall-back to last-known
//! persisted data is the only resilience mechanism on top of this.

pub mod client;

pub use client::{GithubClient, GithubError, GithubRepoSummary, DEFAULT_API_URL, FETCH_PAGE_SIZE};
