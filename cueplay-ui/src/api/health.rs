//! Health check endpoint

use axum::{routing::get, Json, Router};
use cueplay_common::api::HealthResponse;

use crate::AppState;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok("cueplay-ui", env!("CARGO_PKG_VERSION")))
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
