use crate::infrastructure::config::Config;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;

/// GET /health - liveness
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /health/ready - readiness: the provider must be configured
pub async fn health_ready(
    State(config): State<Arc<Config>>,
) -> (StatusCode, Json<serde_json::Value>) {
    if config.gemini_api_key.trim().is_empty() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "reason": "speech provider is not configured" })),
        );
    }
    (StatusCode::OK, Json(json!({ "status": "ready" })))
}
