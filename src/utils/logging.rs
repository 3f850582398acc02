//! Logging setup shared by the `smart_irrigation` CLI and the dashboard server.
//!
//! The CLI keeps stderr quiet unless `--verbose` is passed, so predictions
//! printed to stdout stay readable. The server logs at a configurable level
//! without colours, with module targets so model loading and request handling
//! can be told apart.

use std::fmt;
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use super::error::{IrrigationError, Result};

/// Subscriber settings
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub level: LogLevel,
    /// Print the module path of each event
    pub include_target: bool,
    pub ansi_colors: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::server()
    }
}

impl LogConfig {
    /// Interactive CLI: errors only, or debug with targets when `verbose`
    pub fn cli(verbose: bool) -> Self {
        if verbose {
            Self {
                level: LogLevel::Debug,
                include_target: true,
                ansi_colors: true,
            }
        } else {
            Self {
                level: LogLevel::Error,
                include_target: false,
                ansi_colors: true,
            }
        }
    }

    /// Long-running server writing to a log collector
    pub fn server() -> Self {
        Self {
            level: LogLevel::Info,
            include_target: true,
            ansi_colors: false,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = IrrigationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(IrrigationError::Config(format!(
                "unknown log level '{}' (expected trace, debug, info, warn or error)",
                other
            ))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level.to_tracing_level())
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| IrrigationError::Config(format!("logging already initialised: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!(" INFO ".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("Warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);

        let err = "loud".parse::<LogLevel>().unwrap_err();
        assert!(matches!(err, IrrigationError::Config(_)));
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_level_round_trips_through_display() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
        assert_eq!(LogLevel::Trace.to_tracing_level(), Level::TRACE);
    }

    #[test]
    fn test_cli_is_quiet_unless_verbose() {
        assert_eq!(LogConfig::cli(false).level, LogLevel::Error);

        let verbose = LogConfig::cli(true);
        assert_eq!(verbose.level, LogLevel::Debug);
        assert!(verbose.include_target);
    }

    #[test]
    fn test_server_preset() {
        let config = LogConfig::server().with_level(LogLevel::Warn);
        assert_eq!(config.level, LogLevel::Warn);
        assert!(!config.ansi_colors);
        assert_eq!(LogConfig::default(), LogConfig::server());
    }
}
