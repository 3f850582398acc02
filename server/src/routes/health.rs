//! Health check endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub model_loaded: bool,
}

/// GET /health - Health check endpoint
///
/// Reports "ok" even without a model: the dashboard itself still serves.
pub async fn health_check(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: smart_irrigation::VERSION.to_string(),
        model_loaded: state.model.is_ready(),
    })
}
