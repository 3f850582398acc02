//! Sprinkler Predictor
//!
//! Runs a single inference per request: the sensor vector is reshaped into a
//! one-row batch, handed to the classifier once, and the first row of the
//! result is interpreted as one ON/OFF decision per sprinkler.

use std::time::Instant;

use chrono::{DateTime, Utc};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::SLOW_INFERENCE_MS;
use crate::model::{Label, ModelHandle, ON_LABEL};
use crate::sensor::SensorVector;
use crate::utils::error::{IrrigationError, Result};

/// Display status of one sprinkler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SprinklerStatus {
    On,
    Off,
}

impl SprinklerStatus {
    /// ON only when the label equals [`ON_LABEL`] exactly; every other value
    /// (0, 0.5, 2, ...) is OFF.
    pub fn from_label(label: Label) -> Self {
        if label == ON_LABEL {
            SprinklerStatus::On
        } else {
            SprinklerStatus::Off
        }
    }

    pub fn is_on(self) -> bool {
        self == SprinklerStatus::On
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SprinklerStatus::On => "ON",
            SprinklerStatus::Off => "OFF",
        }
    }
}

impl std::fmt::Display for SprinklerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rendered status indicator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chip {
    pub index: usize,
    pub label: String,
    pub status: SprinklerStatus,
    pub on: bool,
}

/// Result of one prediction request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    /// Raw labels, one per sprinkler, in model output order
    pub labels: Vec<Label>,
    pub statuses: Vec<SprinklerStatus>,
    pub on_count: usize,
    pub off_count: usize,
    pub inference_time_ms: f64,
    pub predicted_at: DateTime<Utc>,
}

impl PredictionOutcome {
    /// Interpret a predicted row
    pub fn from_labels(labels: Vec<Label>, inference_time_ms: f64) -> Self {
        let statuses: Vec<SprinklerStatus> =
            labels.iter().map(|&l| SprinklerStatus::from_label(l)).collect();
        let on_count = statuses.iter().filter(|s| s.is_on()).count();
        let off_count = labels.len() - on_count;

        Self {
            labels,
            statuses,
            on_count,
            off_count,
            inference_time_ms,
            predicted_at: Utc::now(),
        }
    }

    /// Number of sprinklers the model decided on
    pub fn total(&self) -> usize {
        self.labels.len()
    }

    /// Fraction of sprinklers ON, 0.0 when there are none
    pub fn progress(&self) -> f64 {
        if self.labels.is_empty() {
            0.0
        } else {
            self.on_count as f64 / self.labels.len() as f64
        }
    }

    pub fn chips(&self) -> Vec<Chip> {
        self.statuses
            .iter()
            .enumerate()
            .map(|(index, &status)| Chip {
                index,
                label: format!("Sprinkler {}", index),
                status,
                on: status.is_on(),
            })
            .collect()
    }

    /// Chips dealt round-robin over `columns` columns (chip `i` lands in
    /// column `i % columns`)
    pub fn chip_columns(&self, columns: usize) -> Vec<Vec<Chip>> {
        let columns = columns.max(1);
        let mut out = vec![Vec::new(); columns];
        for chip in self.chips() {
            out[chip.index % columns].push(chip);
        }
        out
    }

    pub fn raw_labels(&self) -> &[Label] {
        &self.labels
    }

    /// `ON: a / n | OFF: b / n`
    pub fn summary(&self) -> String {
        let n = self.total();
        format!("ON: {} / {} | OFF: {} / {}", self.on_count, n, self.off_count, n)
    }
}

/// Prediction service over a shared model handle
pub struct Predictor<'a> {
    model: &'a ModelHandle,
}

impl<'a> Predictor<'a> {
    pub fn new(model: &'a ModelHandle) -> Self {
        Self { model }
    }

    /// Whether a prediction could be attempted at all
    pub fn is_available(&self) -> bool {
        self.model.is_ready()
    }

    /// Predict the sprinkler states for one sensor vector.
    ///
    /// Aborts with `ModelUnavailable` before touching the model if it failed to
    /// load. Makes exactly one classifier call otherwise.
    pub fn predict(&self, sensors: &SensorVector) -> Result<PredictionOutcome> {
        let classifier = self.model.classifier()?;

        if sensors.len() != classifier.input_width() {
            return Err(IrrigationError::InvalidInput(format!(
                "model expects {} sensor values, got {}",
                classifier.input_width(),
                sensors.len()
            )));
        }

        let batch = ArrayView2::from_shape((1, sensors.len()), sensors.as_slice())
            .map_err(|e| IrrigationError::InvalidInput(e.to_string()))?;

        let start = Instant::now();
        let predicted = classifier.predict(batch)?;
        let inference_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        let expected = classifier.output_width();
        if predicted.nrows() != 1 || predicted.ncols() != expected {
            return Err(IrrigationError::Inference(format!(
                "expected a 1x{} prediction, got {}x{}",
                expected,
                predicted.nrows(),
                predicted.ncols()
            )));
        }

        let labels = predicted.row(0).to_vec();
        debug!("Raw prediction: {:?}", labels);

        let outcome = PredictionOutcome::from_labels(labels, inference_time_ms);

        if inference_time_ms > SLOW_INFERENCE_MS {
            warn!("Slow inference: {:.1}ms", inference_time_ms);
        }
        info!(
            "Prediction: {} ({:.3}ms)",
            outcome.summary(),
            outcome.inference_time_ms
        );

        Ok(outcome)
    }
}
