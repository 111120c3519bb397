//! Task status/priority enums, validation rules, and read-time derived
//! attributes (`isOverdue`, `daysUntilDue`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::project::DESCRIPTION_MAX;
use crate::validation::ValidationErrors;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum task title length.
pub const TITLE_MIN: usize = 2;

/// Maximum task title length.
pub const TITLE_MAX: usize = 255;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Task lifecycle status. Stored in the database as its wire string.
///
/// Transitions are unguarded: `complete`/`start`/`cancel` are plain status
/// overwrites and any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

/// All valid task status strings.
const VALID_STATUS_STRINGS: &[&str] = &["pending", "in_progress", "completed", "cancelled"];

/// Statuses that exempt a task from being overdue.
pub const TERMINAL_STATUSES: [TaskStatus; 2] = [TaskStatus::Completed, TaskStatus::Cancelled];

impl TaskStatus {
    /// Return the status as its database/wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a status from a string slice.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(CoreError::validation(
                "status",
                format!(
                    "Invalid status '{s}'. Must be one of: {}",
                    VALID_STATUS_STRINGS.join(", ")
                ),
            )),
        }
    }

    /// Whether this status exempts the task from overdue computation.
    pub fn is_terminal(&self) -> bool {
        TERMINAL_STATUSES.contains(self)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Task priority. Stored in the database as its wire string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

/// All valid task priority strings.
const VALID_PRIORITY_STRINGS: &[&str] = &["low", "medium", "high", "critical"];

impl TaskPriority {
    /// Return the priority as its database/wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Parse a priority from a string slice.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(CoreError::validation(
                "priority",
                format!(
                    "Invalid priority '{s}'. Must be one of: {}",
                    VALID_PRIORITY_STRINGS.join(", ")
                ),
            )),
        }
    }

    /// Sort rank for listing: higher priorities sort first.
    pub fn rank(&self) -> i64 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a task title: required, [`TITLE_MIN`]..=[`TITLE_MAX`] characters.
pub fn validate_title(title: &str, errors: &mut ValidationErrors) {
    let len = title.chars().count();
    if len < TITLE_MIN {
        errors.push(
            "title",
            format!("must be at least {TITLE_MIN} characters long"),
        );
    } else if len > TITLE_MAX {
        errors.push("title", format!("must be at most {TITLE_MAX} characters long"));
    }
}

/// Validate an optional task description against [`DESCRIPTION_MAX`].
pub fn validate_description(description: Option<&str>, errors: &mut ValidationErrors) {
    if let Some(desc) = description {
        if desc.chars().count() > DESCRIPTION_MAX {
            errors.push(
                "description",
                format!("must be at most {DESCRIPTION_MAX} characters long"),
            );
        }
    }
}

/// Validate an optional status string, returning the parsed value when valid.
pub fn validate_status(status: Option<&str>, errors: &mut ValidationErrors) -> Option<TaskStatus> {
    match status {
        None => None,
        Some(s) => match TaskStatus::from_str(s) {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                errors.push(
                    "status",
                    format!(
                        "Invalid status '{s}'. Must be one of: {}",
                        VALID_STATUS_STRINGS.join(", ")
                    ),
                );
                None
            }
        },
    }
}

/// Validate an optional priority string, returning the parsed value when valid.
pub fn validate_priority(
    priority: Option<&str>,
    errors: &mut ValidationErrors,
) -> Option<TaskPriority> {
    match priority {
        None => None,
        Some(s) => match TaskPriority::from_str(s) {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                errors.push(
                    "priority",
                    format!(
                        "Invalid priority '{s}'. Must be one of: {}",
                        VALID_PRIORITY_STRINGS.join(", ")
                    ),
                );
                None
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Derived attributes
// ---------------------------------------------------------------------------

/// A task is overdue when its due date is strictly before today and its
/// status is neither completed nor cancelled.
pub fn is_overdue(due_date: Option<NaiveDate>, status: TaskStatus, today: NaiveDate) -> bool {
    match due_date {
        Some(due) => due < today && !status.is_terminal(),
        None => false,
    }
}

/// Whole days from `today` until the due date. Negative when past due,
/// `None` when the task has no due date.
pub fn days_until_due(due_date: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    due_date.map(|due| (due - today).num_days())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // -- enums -------------------------------------------------------------

    #[test]
    fn status_round_trips() {
        for s in ["pending", "in_progress", "completed", "cancelled"] {
            assert_eq!(TaskStatus::from_str(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn status_invalid_rejected() {
        assert!(TaskStatus::from_str("done").is_err());
        assert!(TaskStatus::from_str("").is_err());
    }

    #[test]
    fn status_defaults_to_pending() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }

    #[test]
    fn terminal_statuses() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
    }

    #[test]
    fn priority_round_trips() {
        for s in ["low", "medium", "high", "critical"] {
            assert_eq!(TaskPriority::from_str(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn priority_rank_orders_critical_highest() {
        assert!(TaskPriority::Critical.rank() > TaskPriority::High.rank());
        assert!(TaskPriority::High.rank() > TaskPriority::Medium.rank());
        assert!(TaskPriority::Medium.rank() > TaskPriority::Low.rank());
    }

    // -- validation --------------------------------------------------------

    #[test]
    fn title_bounds() {
        let mut errors = ValidationErrors::new();
        validate_title("ok", &mut errors);
        validate_title(&"t".repeat(TITLE_MAX), &mut errors);
        assert!(errors.is_empty());

        validate_title("x", &mut errors);
        validate_title(&"t".repeat(TITLE_MAX + 1), &mut errors);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn invalid_status_and_priority_collected_together() {
        let mut errors = ValidationErrors::new();
        validate_status(Some("nope"), &mut errors);
        validate_priority(Some("urgent"), &mut errors);
        assert_eq!(errors.len(), 2);
    }

    // -- is_overdue --------------------------------------------------------

    #[test]
    fn overdue_when_past_due_and_open() {
        let today = date(2024, 6, 15);
        assert!(is_overdue(Some(date(2024, 6, 14)), TaskStatus::Pending, today));
        assert!(is_overdue(
            Some(date(2024, 6, 1)),
            TaskStatus::InProgress,
            today
        ));
    }

    #[test]
    fn not_overdue_when_due_today_or_later() {
        let today = date(2024, 6, 15);
        assert!(!is_overdue(Some(today), TaskStatus::Pending, today));
        assert!(!is_overdue(
            Some(date(2024, 6, 16)),
            TaskStatus::Pending,
            today
        ));
    }

    #[test]
    fn not_overdue_when_terminal() {
        let today = date(2024, 6, 15);
        assert!(!is_overdue(
            Some(date(2024, 6, 1)),
            TaskStatus::Completed,
            today
        ));
        assert!(!is_overdue(
            Some(date(2024, 6, 1)),
            TaskStatus::Cancelled,
            today
        ));
    }

    #[test]
    fn not_overdue_without_due_date() {
        assert!(!is_overdue(None, TaskStatus::Pending, date(2024, 6, 15)));
    }

    // -- days_until_due ----------------------------------------------------

    #[test]
    fn days_until_due_future() {
        let today = date(2024, 6, 15);
        assert_eq!(days_until_due(Some(date(2024, 6, 20)), today), Some(5));
    }

    #[test]
    fn days_until_due_today_is_zero() {
        let today = date(2024, 6, 15);
        assert_eq!(days_until_due(Some(today), today), Some(0));
    }

    #[test]
    fn days_until_due_past_is_negative() {
        let today = date(2024, 6, 15);
        assert_eq!(days_until_due(Some(date(2024, 6, 12)), today), Some(-3));
    }

    #[test]
    fn days_until_due_absent() {
        assert_eq!(days_until_due(None, date(2024, 6, 15)), None);
    }
}
