//! Health check endpoint.

use axum::{Json, Router, routing::get};
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Liveness message including the current UTC time.
    pub message: String,
}

/// GET /health - Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: format!(
            "Hello, the Notably web server is alive. The current time is {}",
            Utc::now().to_rfc3339()
        ),
    })
}

/// Build health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
