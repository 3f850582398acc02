//! Dashboard module
//!
//! One dashboard session is a sensor panel plus the last prediction, if any.
//! It has two states: `Idle` before the first prediction and `Predicted`
//! afterwards. Every successful trigger overwrites the previous result; a
//! failed trigger leaves the state untouched.
//!
//! - `background`: optional background image embedded as a data URI
//! - `render`: HTML rendering of a session

pub mod background;
pub mod render;

pub use background::Background;
pub use render::{PageRenderer, PageView};

use serde::Serialize;

use crate::inference::{PredictionOutcome, Predictor};
use crate::sensor::SensorPanel;
use crate::utils::error::Result;

/// Where a session is in its lifecycle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "outcome", rename_all = "lowercase")]
pub enum DashboardState {
    Idle,
    Predicted(PredictionOutcome),
}

impl DashboardState {
    pub fn outcome(&self) -> Option<&PredictionOutcome> {
        match self {
            DashboardState::Idle => None,
            DashboardState::Predicted(outcome) => Some(outcome),
        }
    }
}

/// A single user's dashboard session
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    panel: SensorPanel,
    state: DashboardState,
}

impl Default for DashboardState {
    fn default() -> Self {
        DashboardState::Idle
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session from an already populated panel
    pub fn with_panel(panel: SensorPanel) -> Self {
        Self {
            panel,
            state: DashboardState::Idle,
        }
    }

    pub fn panel(&self) -> &SensorPanel {
        &self.panel
    }

    /// Slider edits never touch the prediction state
    pub fn panel_mut(&mut self) -> &mut SensorPanel {
        &mut self.panel
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// The explicit "Predict Sprinklers" action.
    ///
    /// Collects the panel, runs one prediction and moves to `Predicted`. On
    /// error the previous state is kept and the error is returned.
    pub fn trigger_predict(&mut self, predictor: &Predictor<'_>) -> Result<()> {
        let outcome = predictor.predict(&self.panel.collect())?;
        self.state = DashboardState::Predicted(outcome);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classifier, Label, ModelHandle};
    use crate::utils::error::IrrigationError;
    use crate::SENSOR_COUNT;
    use ndarray::{Array2, ArrayView2};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// ON for every sensor reading above 0.5
    struct ThresholdClassifier {
        calls: Arc<AtomicUsize>,
    }

    impl Classifier for ThresholdClassifier {
        fn input_width(&self) -> usize {
            SENSOR_COUNT
        }

        fn output_width(&self) -> usize {
            SENSOR_COUNT
        }

        fn predict(&self, batch: ArrayView2<'_, f64>) -> Result<Array2<Label>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(batch.mapv(|v| if v > 0.5 { 1.0 } else { 0.0 }))
        }
    }

    #[test]
    fn test_starts_idle() {
        let dashboard = Dashboard::new();
        assert_eq!(dashboard.state(), &DashboardState::Idle);
        assert!(dashboard.state().outcome().is_none());
    }

    #[test]
    fn test_predict_transitions_and_overwrites() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = ModelHandle::ready(ThresholdClassifier {
            calls: calls.clone(),
        });
        let predictor = Predictor::new(&handle);
        let mut dashboard = Dashboard::new();

        dashboard.trigger_predict(&predictor).unwrap();
        assert_eq!(dashboard.state().outcome().unwrap().on_count, 0);

        dashboard.panel_mut().set(4, 0.9).unwrap();
        dashboard.panel_mut().set(5, 0.6).unwrap();
        // Editing sliders does not change the shown result until the next trigger.
        assert_eq!(dashboard.state().outcome().unwrap().on_count, 0);

        dashboard.trigger_predict(&predictor).unwrap();
        assert_eq!(dashboard.state().outcome().unwrap().on_count, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_predict_keeps_state() {
        let handle = ModelHandle::Unavailable {
            path: "missing.json".into(),
            reason: "not found".to_string(),
        };
        let predictor = Predictor::new(&handle);
        let mut dashboard = Dashboard::new();

        let err = dashboard.trigger_predict(&predictor).unwrap_err();
        assert!(matches!(err, IrrigationError::ModelUnavailable(_)));
        assert_eq!(dashboard.state(), &DashboardState::Idle);

        // The collector keeps working without a model.
        dashboard.panel_mut().set(0, 0.2).unwrap();
        assert_eq!(dashboard.panel().get(0), Some(0.2));
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_value(DashboardState::Idle).unwrap();
        assert_eq!(json["state"], "idle");
    }
}
