//! Application state for the irrigation server
//!
//! Holds the read-only collaborators every request needs: configuration,
//! the model handle, the compiled page template and the background.

use std::sync::Arc;
use std::time::Instant;

use smart_irrigation::{Background, DashboardConfig, ModelHandle, PageRenderer, Predictor};

/// Shared application state
pub struct AppState {
    /// Dashboard configuration
    pub config: DashboardConfig,
    /// Model handle, loaded once at startup
    pub model: ModelHandle,
    /// Compiled dashboard template
    pub renderer: PageRenderer,
    /// Background, read once at startup
    pub background: Background,
    /// Server start time
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: DashboardConfig, model: ModelHandle) -> smart_irrigation::Result<Self> {
        let background = Background::load(config.background_path.as_deref());
        Ok(Self {
            config,
            model,
            renderer: PageRenderer::new()?,
            background,
            started_at: Instant::now(),
        })
    }

    /// Prediction service over the shared handle
    pub fn predictor(&self) -> Predictor<'_> {
        Predictor::new(&self.model)
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;
