//! Error Handling Module
//!
//! Defines custom error types for the smart irrigation library.
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for smart irrigation operations
#[derive(Error, Debug)]
pub enum IrrigationError {
    /// The model artifact is missing, unreadable or corrupt
    #[error("Failed to load model at '{path}': {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    /// A prediction was requested but no model is loaded
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// The classifier produced an unusable result
    #[error("Inference error: {0}")]
    Inference(String),

    /// Invalid input (sensor values, form fields)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Template rendering failed
    #[error("Render error: {0}")]
    Render(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for IrrigationError {
    fn from(err: serde_json::Error) -> Self {
        IrrigationError::Serialization(err.to_string())
    }
}

impl From<minijinja::Error> for IrrigationError {
    fn from(err: minijinja::Error) -> Self {
        IrrigationError::Render(err.to_string())
    }
}

/// Convenience Result type for smart irrigation operations
pub type Result<T> = std::result::Result<T, IrrigationError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, msg: &str) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| IrrigationError::InvalidInput(format!("{}: {}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| IrrigationError::InvalidInput(format!("{}: {}", f(), e)))
    }
}

impl<T> ResultExt<T> for Option<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| IrrigationError::InvalidInput(msg.to_string()))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.ok_or_else(|| IrrigationError::InvalidInput(f()))
    }
}
