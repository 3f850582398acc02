//! # Smart Irrigation
//!
//! Sprinkler control dashboard backed by a pre-trained multi-output classifier.
//! Twenty scaled sensor readings go in, one ON/OFF decision per parcel comes out.
//!
//! ## Modules
//!
//! - `sensor`: the slider panel that collects the 20 readings
//! - `model`: classifier trait, forest artifact evaluator and the shared model handle
//! - `inference`: the prediction service and its ON/OFF interpretation
//! - `dashboard`: Idle/Predicted state machine, HTML rendering and background asset
//! - `config`: dashboard configuration
//! - `utils`: logging, errors and formatting helpers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use smart_irrigation::{load_model, Predictor, SensorPanel};
//!
//! let model = load_model("Farm_Irrigation_System.json");
//! let predictor = Predictor::new(&model);
//!
//! let mut panel = SensorPanel::new();
//! panel.set(3, 0.82)?;
//! let outcome = predictor.predict(&panel.collect())?;
//! println!("{}", outcome.summary());
//! ```

pub mod config;
pub mod dashboard;
pub mod inference;
pub mod model;
pub mod sensor;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::DashboardConfig;
pub use dashboard::{Background, Dashboard, DashboardState, PageRenderer};
pub use inference::{Chip, PredictionOutcome, Predictor, SprinklerStatus};
pub use model::{load_model, Classifier, ForestModel, Label, ModelHandle, ON_LABEL};
pub use sensor::{SensorControl, SensorPanel, SensorVector};
pub use utils::error::{IrrigationError, Result};

// Classifier implementations outside this crate need the same ndarray version.
pub use ndarray;

/// Number of sensor readings the dashboard collects
pub const SENSOR_COUNT: usize = 20;

/// Lower bound of a scaled sensor reading
pub const SENSOR_MIN: f64 = 0.0;

/// Upper bound of a scaled sensor reading
pub const SENSOR_MAX: f64 = 1.0;

/// Slider granularity
pub const SENSOR_STEP: f64 = 0.01;

/// Initial value of every slider
pub const SENSOR_DEFAULT: f64 = 0.5;

/// Model artifact looked up next to the working directory by default
pub const DEFAULT_MODEL_FILE: &str = "Farm_Irrigation_System.json";

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
