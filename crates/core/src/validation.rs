//! Field-level validation error accumulation.
//!
//! Services validate every field of a request before rejecting it, so a
//! single 400 response reports all failing fields at once instead of only
//! the first one. `validate_*` functions push into a shared
//! [`ValidationErrors`] accumulator and the caller converts a non-empty
//! accumulator into [`CoreError::Validation`].

use serde::Serialize;

use crate::error::CoreError;

/// A single failing field with a human-readable message.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Accumulator for field validation failures.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consume the accumulator into the collected field errors.
    pub fn into_fields(self) -> Vec<FieldError> {
        self.errors
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.errors
    }

    /// `Ok(())` when nothing failed, otherwise a [`CoreError::Validation`]
    /// carrying every collected field error.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self))
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}
