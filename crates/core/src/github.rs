//! Derived attributes for synced GitHub repository metadata.

use crate::types::Timestamp;

/// Window for the `isRecentlyUpdated` flag.
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Whether the repository was pushed to upstream within the last
/// [`RECENT_WINDOW_DAYS`] days.
pub fn is_recently_updated(github_updated_at: Timestamp, now: Timestamp) -> bool {
    (now - github_updated_at).num_days() < RECENT_WINDOW_DAYS
}

/// Whole days since the repository was last updated upstream.
pub fn days_since_last_update(github_updated_at: Timestamp, now: Timestamp) -> i64 {
    (now - github_updated_at).num_days().max(0)
}
