//! Dashboard Configuration Module
//!
//! Page chrome and file locations. Values come from an optional JSON file and
//! are then overridden by command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils::error::{IrrigationError, Result};
use crate::DEFAULT_MODEL_FILE;

/// Configuration for the dashboard page and its collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Browser title and main heading
    pub page_title: String,

    /// Path to the forest model artifact
    pub model_path: PathBuf,

    /// Optional background image
    pub background_path: Option<PathBuf>,

    /// Project link shown in the footer
    pub repository_url: String,

    /// Footer credit
    pub author: String,

    /// Columns used for both the slider grid and the chip grid
    pub columns: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_title: "Smart Sprinkler System".to_string(),
            model_path: PathBuf::from(DEFAULT_MODEL_FILE),
            background_path: None,
            repository_url: "https://github.com/Jayita2004/Smart_Irrigation".to_string(),
            author: "Jayita".to_string(),
            columns: 4,
        }
    }
}

impl DashboardConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.columns > 12 {
            return Err(IrrigationError::Config(
                "columns must be between 1 and 12".to_string(),
            ));
        }

        if self.page_title.trim().is_empty() {
            return Err(IrrigationError::Config(
                "page_title must not be empty".to_string(),
            ));
        }

        if self.model_path.as_os_str().is_empty() {
            return Err(IrrigationError::Config(
                "model_path must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// File name of the model, for display
    pub fn model_file_name(&self) -> String {
        self.model_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.model_path.display().to_string())
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: DashboardConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}
