//! Inference module for sprinkler prediction
//!
//! This module provides:
//! - The prediction service that turns one sensor vector into one batch call
//! - ON/OFF interpretation of the predicted labels
//! - Derived views for rendering (counts, progress, chips)

pub mod predictor;

// Re-export main types for convenience
pub use predictor::{Chip, PredictionOutcome, Predictor, SprinklerStatus};

/// Inference slower than this is logged as a warning (milliseconds)
pub const SLOW_INFERENCE_MS: f64 = 250.0;
