//! HTTP error mapping
//!
//! Every failure response shares the storefront's `success: false` JSON
//! envelope. Client mistakes carry their message verbatim; internal failures
//! are logged with the cause and answered with generic text only.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Request failure as surfaced to HTTP clients
#[derive(Debug)]
pub enum ApiError {
    /// Caller mistake; the message goes back on the wire
    BadRequest(String),

    /// Store or engine failure; the cause stays in the logs
    Internal(storepulse_core::Error),
}

impl From<storepulse_core::Error> for ApiError {
    fn from(err: storepulse_core::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "message": message })),
            )
                .into_response(),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "server error",
                        "error": "internal error",
                    })),
                )
                    .into_response()
            }
        }
    }
}
