//! HTTP routes

pub mod api;
pub mod dashboard;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

/// Build the application router
pub fn router(state: SharedState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))

        // Dashboard page
        .route("/", get(dashboard::index))
        .route("/predict", post(dashboard::predict))

        // JSON API
        .route("/api/predict", post(api::predict))
        .route("/api/model", get(api::model_status))

        // Add state
        .with_state(state)

        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
