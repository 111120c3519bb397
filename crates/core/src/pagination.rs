//! Pagination math shared by every paginated listing.
//!
//! List services fetch the full filtered set and slice it in memory, so the
//! page/limit arithmetic lives here rather than in SQL.

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: i64 = 10;

/// Maximum page size for list endpoints.
pub const MAX_LIMIT: i64 = 100;

/// Pagination envelope block returned alongside list data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
}

impl Pagination {
    /// Compute the pagination block for `total` items at `page`/`limit`.
    ///
    /// `pages` is zero when the set is empty; `has_next` is false on and
    /// past the last page.
    pub fn compute(total: i64, page: i64, limit: i64) -> Self {
        let pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            page,
            limit,
            total,
            pages,
            has_next: page < pages,
        }
    }
}

/// Clamp a requested page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Clamp a requested page size to `1..=`[`MAX_LIMIT`], defaulting to
/// [`DEFAULT_LIMIT`].
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Slice bounds (`start..end`) for the in-memory page, clamped to `total`.
///
/// A page past the end yields an empty `start..start` range.
pub fn slice_bounds(total: usize, page: i64, limit: i64) -> (usize, usize) {
    let start = ((page - 1) * limit) as usize;
    let start = start.min(total);
    let end = (start + limit as usize).min(total);
    (start, end)
}
