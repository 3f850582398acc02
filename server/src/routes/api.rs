//! JSON API - predictions and model status

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use smart_irrigation::{
    Classifier, IrrigationError, Label, ModelHandle, SensorVector, SprinklerStatus,
};

use crate::state::SharedState;

/// Request body for POST /api/predict
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Exactly 20 readings in [0, 1]
    pub sensors: Vec<f64>,
}

/// Prediction result
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub labels: Vec<Label>,
    pub statuses: Vec<SprinklerStatus>,
    pub on_count: usize,
    pub off_count: usize,
    pub total: usize,
    pub progress: f64,
    pub inference_time_ms: f64,
}

/// Model status
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelStatusResponse {
    pub status: String,
    pub description: Option<String>,
    pub input_width: Option<usize>,
    pub output_width: Option<usize>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: IrrigationError) -> ApiError {
    let status = match &err {
        IrrigationError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        IrrigationError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("API request failed: {}", err);
    } else {
        warn!("API request rejected: {}", err);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// POST /api/predict - Predict sprinkler states for one sensor vector
pub async fn predict(
    State(state): State<SharedState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let sensors = SensorVector::new(&req.sensors).map_err(api_error)?;
    let outcome = state.predictor().predict(&sensors).map_err(api_error)?;

    Ok(Json(PredictionResponse {
        total: outcome.total(),
        progress: outcome.progress(),
        on_count: outcome.on_count,
        off_count: outcome.off_count,
        inference_time_ms: outcome.inference_time_ms,
        statuses: outcome.statuses,
        labels: outcome.labels,
    }))
}

/// GET /api/model - Whether the model is loaded, and its shape
pub async fn model_status(State(state): State<SharedState>) -> Json<ModelStatusResponse> {
    let response = match &state.model {
        ModelHandle::Ready(classifier) => ModelStatusResponse {
            status: "ready".to_string(),
            description: Some(classifier.describe()),
            input_width: Some(classifier.input_width()),
            output_width: Some(classifier.output_width()),
            reason: None,
        },
        ModelHandle::Unavailable { reason, .. } => ModelStatusResponse {
            status: "unavailable".to_string(),
            description: None,
            input_width: None,
            output_width: None,
            reason: Some(reason.clone()),
        },
    };

    Json(response)
}
