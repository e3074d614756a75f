//! Health check and readiness endpoints.

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde_json::json;

use super::AppState;

/// Build the health routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
}

/// GET /health - liveness probe with uptime.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "uptimeSecs": state.start_time.elapsed().as_secs(),
    }))
}

/// GET /ready - readiness probe.
async fn ready() -> impl IntoResponse {
    Json(json!({ "ready": true }))
}
