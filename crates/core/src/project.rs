//! Project lifecycle status and field validation rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::validation::ValidationErrors;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum project name length.
pub const NAME_MIN: usize = 2;

/// Maximum project name length.
pub const NAME_MAX: usize = 255;

/// Maximum description length (shared by projects and tasks).
pub const DESCRIPTION_MAX: usize = 5000;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Project lifecycle status. Stored in the database as its wire string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Inactive,
    Completed,
}

/// All valid project status strings.
const VALID_STATUS_STRINGS: &[&str] = &["active", "inactive", "completed"];

impl ProjectStatus {
    /// Return the status as its database/wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Completed => "completed",
        }
    }

    /// Parse a status from a string slice.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "completed" => Ok(Self::Completed),
            _ => Err(CoreError::validation(
                "status",
                format!(
                    "Invalid status '{s}'. Must be one of: {}",
                    VALID_STATUS_STRINGS.join(", ")
                ),
            )),
        }
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Active
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a project name: required, [`NAME_MIN`]..=[`NAME_MAX`] characters.
pub fn validate_name(name: &str, errors: &mut ValidationErrors) {
    let len = name.chars().count();
    if len < NAME_MIN {
        errors.push(
            "name",
            format!("must be at least {NAME_MIN} characters long"),
        );
    } else if len > NAME_MAX {
        errors.push("name", format!("must be at most {NAME_MAX} characters long"));
    }
}

/// Validate an optional description against [`DESCRIPTION_MAX`].
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
pub fn validate_status(
    status: Option<&str>,
    errors: &mut ValidationErrors,
) -> Option<ProjectStatus> {
    match status {
        None => None,
        Some(s) => match ProjectStatus::from_str(s) {
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

/// Validate that `start_date <= end_date` when both are present.
pub fn validate_date_range(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    errors: &mut ValidationErrors,
) {
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            errors.push("endDate", "must be on or after startDate");
        }
    }
}

/// Validate that a new project's start date is not in the past.
///
/// Applies to creation only; updates may move dates freely as long as the
/// range ordering holds.
pub fn validate_start_not_past(
    start_date: Option<NaiveDate>,
    today: NaiveDate,
    errors: &mut ValidationErrors,
) {
    if let Some(start) = start_date {
        if start < today {
            errors.push("startDate", "must not be in the past");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
