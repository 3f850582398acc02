//! Utilities module for logging, errors, and formatting helpers
//!
//! This module provides:
//! - Structured logging with tracing
//! - Error handling types
//! - Small formatting helpers shared by the CLI and the renderer

pub mod error;
pub mod logging;

// Re-export main types for convenience
pub use error::{IrrigationError, Result, ResultExt};
pub use logging::{init_logging, LogConfig, LogLevel};

/// Format a percentage with a text progress bar
pub fn format_progress_bar(progress: f64, width: usize) -> String {
    let progress = progress.clamp(0.0, 1.0);
    let filled = (progress * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    format!(
        "[{}{}] {:.1}%",
        "█".repeat(filled),
        "░".repeat(empty),
        progress * 100.0
    )
}

/// Format a duration given in milliseconds
pub fn format_latency(ms: f64) -> String {
    if ms < 1.0 {
        format!("{:.0}µs", ms * 1000.0)
    } else if ms < 1000.0 {
        format!("{:.2}ms", ms)
    } else {
        format!("{:.2}s", ms / 1000.0)
    }
}
