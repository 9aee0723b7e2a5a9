//! Collage API handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, api_error};
use crate::options::{CombineItem, CombineOptions, Layout};
use crate::render::encode::EncodedImage;
use crate::server::state::AppState;

/// Request body for both combine endpoints.
#[derive(Debug, Deserialize)]
pub struct CombineRequest {
    pub items: Vec<CombineItem>,
    #[serde(default)]
    pub options: CombineOptions,
}

/// Response from the JSON combine endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombineResponse {
    pub data_uri: String,
    pub width: u32,
    pub height: u32,
    pub mime: &'static str,
}

/// GET /api/layouts - List layout names.
pub async fn layouts() -> Json<Vec<&'static str>> {
    Json(Layout::ALL.iter().map(|l| l.name()).collect())
}

/// POST /api/combine - Combine images, respond with a data URI.
pub async fn combine(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CombineRequest>, JsonRejection>,
) -> Result<Json<CombineResponse>, ApiError> {
    let encoded = run(&state, body).await?;
    Ok(Json(CombineResponse {
        data_uri: encoded.to_data_uri(),
        width: encoded.width,
        height: encoded.height,
        mime: encoded.mime(),
    }))
}

/// POST /api/combine/raw - Combine images, respond with the image bytes.
pub async fn combine_raw(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CombineRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let encoded = run(&state, body).await?;
    Ok(([(header::CONTENT_TYPE, encoded.mime())], encoded.bytes))
}

async fn run(
    state: &AppState,
    body: Result<Json<CombineRequest>, JsonRejection>,
) -> Result<EncodedImage, ApiError> {
    // Unknown layouts and malformed colors fail here, so report them as 400.
    let Json(req) = body.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"success": false, "error": e.body_text()})),
        )
    })?;
    tracing::info!(
        items = req.items.len(),
        layout = req.options.layout.name(),
        "combine request"
    );
    state
        .compositor
        .combine(&req.items, &req.options)
        .await
        .map_err(api_error)
}
