//! Domain rules for the devtrack platform.
//!
//! Pure types and functions shared by the database, cache, and API layers:
//! the error taxonomy, status/priority enums, field validation rules,
//! read-time derived attributes, and pagination math. No I/O lives here.

pub mod error;
pub mod github;
pub mod pagination;
pub mod project;
pub mod task;
pub mod types;
pub mod validation;
