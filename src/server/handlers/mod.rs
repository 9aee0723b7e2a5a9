//! HTTP handlers for the server.

pub mod combine;

use axum::{Json, http::StatusCode};

use crate::error::CollageError;

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<serde_json::Value>);

/// Status for an engine error: caller mistakes are 400, unreadable images
/// 422, everything else 500.
pub fn status_for(error: &CollageError) -> StatusCode {
    match error {
        e if e.is_input_error() => StatusCode::BAD_REQUEST,
        CollageError::ImageLoad { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn api_error(error: CollageError) -> ApiError {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!(error = %error, "combine failed");
    } else {
        tracing::warn!(error = %error, "combine rejected");
    }
    (
        status,
        Json(serde_json::json!({"success": false, "error": error.to_string()})),
    )
}
