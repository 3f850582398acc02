//! Dashboard page endpoints
//!
//! `GET /` renders an idle session with default sliders. `POST /predict`
//! receives the slider form, runs one prediction and renders the result with
//! the submitted slider positions kept.

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    Form,
};
use tracing::{error, warn};

use smart_irrigation::dashboard::PageView;
use smart_irrigation::{Dashboard, IrrigationError, SensorPanel};

use crate::state::SharedState;

type PageResult = Result<(StatusCode, Html<String>), (StatusCode, String)>;

/// Render a session, turning template failures into a plain 500
fn render_page(
    state: &SharedState,
    dashboard: &Dashboard,
    notice: Option<String>,
    status: StatusCode,
) -> PageResult {
    let mut view = PageView::new(&state.config, &state.background, dashboard, &state.model);
    if let Some(notice) = notice {
        view = view.with_notice(notice);
    }

    state
        .renderer
        .render(&view)
        .map(|html| (status, Html(html)))
        .map_err(|e| {
            error!("Failed to render dashboard: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to render dashboard".to_string(),
            )
        })
}

/// GET / - Idle dashboard
pub async fn index(State(state): State<SharedState>) -> PageResult {
    render_page(&state, &Dashboard::new(), None, StatusCode::OK)
}

/// POST /predict - Predict from the submitted sliders
pub async fn predict(
    State(state): State<SharedState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> PageResult {
    let (panel, rejected) =
        SensorPanel::from_form_partial(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    if !rejected.is_empty() {
        warn!("Rejected sensor fields: {:?}", rejected);
        // Fields that parsed keep their submitted positions.
        return render_page(
            &state,
            &Dashboard::with_panel(panel),
            Some(format!(
                "Invalid sensor values for {}; those sliders were reset to their default.",
                rejected.join(", ")
            )),
            StatusCode::UNPROCESSABLE_ENTITY,
        );
    }

    let mut dashboard = Dashboard::with_panel(panel);
    match dashboard.trigger_predict(&state.predictor()) {
        Ok(()) => render_page(&state, &dashboard, None, StatusCode::OK),
        Err(e @ IrrigationError::ModelUnavailable(_)) => {
            warn!("Prediction aborted: {}", e);
            render_page(
                &state,
                &dashboard,
                Some("Prediction unavailable: the model could not be loaded.".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            )
        }
        Err(e) => {
            error!("Prediction failed: {}", e);
            render_page(
                &state,
                &dashboard,
                Some(format!("Prediction failed: {}", e)),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    }
}
