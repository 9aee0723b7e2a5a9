//! # HTTP Server for Collage Rendering
//!
//! Exposes the compositor over a small JSON API.
//!
//! | Route | Method | Response |
//! |-------|--------|----------|
//! | `/api/layouts` | GET | `["grid", "horizontal", "vertical"]` |
//! | `/api/combine` | POST | `{ dataUri, width, height, mime }` |
//! | `/api/combine/raw` | POST | encoded image bytes |
//!
//! Both combine routes take `{ "items": [{ "source", "label" }], "options": {...} }`.
//! Local file paths are refused; sources must be URLs or data URIs.
//!
//! ## Usage
//!
//! ```bash
//! collage serve --listen 0.0.0.0:8080 --font-dir ./fonts
//! ```

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::CollageError;

/// Largest accepted request body; data URIs make requests large.
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Build the API router around shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/layouts", get(handlers::combine::layouts))
        .route("/api/combine", post(handlers::combine::combine))
        .route("/api/combine/raw", post(handlers::combine::combine_raw))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use collage::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), collage::CollageError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     ..ServerConfig::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), CollageError> {
    let app_state = Arc::new(AppState::new(config.clone())?);
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            CollageError::Transport(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;
    tracing::info!(addr = %config.listen_addr, "collage server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| CollageError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}
