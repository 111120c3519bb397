//! Shared response envelope for API handlers.
//!
//! Every `/api` response uses the same JSON shape:
//!
//! ```json
//! { "success": true, "message": "...", "data": ..., "pagination": {...},
//!   "timestamp": "2024-06-15T12:00:00.000Z" }
//! ```
//!
//! Error responses carry `success: false` plus an optional `errors` array of
//! `{field, message}` entries; those are built by the [`AppError`]
//! `IntoResponse` impl.
//!
//! [`AppError`]: crate::error::AppError

use axum::http::StatusCode;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use devtrack_core::pagination::Pagination;
use serde::Serialize;

/// Standard success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    pub timestamp: String,
}

/// RFC 3339 timestamp with millisecond precision, as carried by every
/// envelope.
pub fn envelope_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 envelope with data.
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
            pagination: None,
            timestamp: envelope_timestamp(),
        })
    }

    /// 200 envelope with data and a pagination block.
    pub fn paginated(message: impl Into<String>, data: T, pagination: Pagination) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
            pagination: Some(pagination),
            timestamp: envelope_timestamp(),
        })
    }

    /// 201 envelope with the created entity.
    pub fn created(message: impl Into<String>, data: T) -> (StatusCode, Json<Self>) {
        (
            StatusCode::CREATED,
            Json(Self {
                success: true,
                message: message.into(),
                data: Some(data),
                pagination: None,
                timestamp: envelope_timestamp(),
            }),
        )
    }
}

impl ApiResponse<()> {
    /// 200 envelope with a message only (deletes, cache clears).
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: None,
            pagination: None,
            timestamp: envelope_timestamp(),
        })
    }
}
