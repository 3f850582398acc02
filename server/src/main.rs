//! Smart Irrigation Server
//!
//! Serves the sprinkler dashboard over HTTP. The model is loaded once at
//! startup; if that fails the page still serves, shows the load error and
//! refuses predictions.

mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use smart_irrigation::utils::logging::{init_logging, LogConfig, LogLevel};
use smart_irrigation::{model, DashboardConfig};

use crate::state::AppState;

/// Smart Irrigation dashboard server
#[derive(Parser, Debug)]
#[command(name = "smart-irrigation-server")]
#[command(version)]
#[command(about = "HTTP dashboard for sprinkler ON/OFF prediction")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "8501")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Dashboard configuration file (JSON)
    #[arg(long, env = "IRRIGATION_CONFIG")]
    config: Option<PathBuf>,

    /// Model artifact, overrides the configuration file
    #[arg(long, env = "IRRIGATION_MODEL")]
    model: Option<PathBuf>,

    /// Background image, overrides the configuration file
    #[arg(long, env = "IRRIGATION_BACKGROUND")]
    background: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "IRRIGATION_LOG", default_value = "info")]
    log_level: LogLevel,
}

/// Merge the configuration file with command-line overrides
fn build_config(cli: &Cli) -> smart_irrigation::Result<DashboardConfig> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };

    if let Some(model) = &cli.model {
        config.model_path = model.clone();
    }

    if let Some(background) = &cli.background {
        config.background_path = Some(background.clone());
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&LogConfig::server().with_level(cli.log_level))?;

    // Build configuration
    let config = build_config(&cli)?;

    info!("Smart Irrigation Server v{}", smart_irrigation::VERSION);
    info!("Configuration:");
    info!("  Model:      {:?}", config.model_path);
    info!("  Background: {:?}", config.background_path);
    info!("  Columns:    {}", config.columns);

    // Load once for the whole process
    let model = model::shared(&config.model_path).clone();
    if !model.is_ready() {
        warn!("Starting without a model; predictions are disabled");
    }

    // Create shared state
    let state = Arc::new(AppState::new(config, model)?);
    if !state.background.is_image() {
        info!("Using gradient background");
    }

    let app = routes::router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["smart-irrigation-server"]);
        assert_eq!(cli.port, 8501);
        assert_eq!(cli.log_level, LogLevel::Info);

        let config = build_config(&cli).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dashboard.json");
        std::fs::write(
            &path,
            r#"{ "page_title": "North Field", "model_path": "from_file.json" }"#,
        )
        .unwrap();

        let cli = Cli::parse_from([
            "smart-irrigation-server",
            "--config",
            path.to_str().unwrap(),
            "--model",
            "from_flag.json",
        ]);
        let config = build_config(&cli).unwrap();

        assert_eq!(config.page_title, "North Field");
        assert_eq!(config.model_path, PathBuf::from("from_flag.json"));
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let result = Cli::try_parse_from(["smart-irrigation-server", "--log-level", "loud"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_config_file_is_an_error() {
        let cli = Cli::parse_from([
            "smart-irrigation-server",
            "--config",
            "/no/such/dashboard.json",
        ]);
        assert!(build_config(&cli).is_err());
    }
}
