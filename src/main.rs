//! Smart Irrigation CLI
//!
//! Offline access to the sprinkler classifier: one-shot predictions, model
//! inspection and rendering the dashboard page to a file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use smart_irrigation::dashboard::PageView;
use smart_irrigation::utils::{format_latency, format_progress_bar};
use smart_irrigation::utils::logging::{init_logging, LogConfig};
use smart_irrigation::{
    load_model, Background, Classifier, Dashboard, DashboardConfig, ForestModel, ModelHandle,
    PageRenderer, PredictionOutcome, Predictor, SensorPanel, DEFAULT_MODEL_FILE,
};

/// Smart Irrigation: sprinkler ON/OFF prediction from scaled sensor readings
#[derive(Parser, Debug)]
#[command(name = "smart_irrigation")]
#[command(version)]
#[command(about = "Predict which sprinklers should run from 20 scaled sensor readings", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one prediction
    Predict {
        /// Path to the model artifact
        #[arg(short, long, env = "IRRIGATION_MODEL", default_value = DEFAULT_MODEL_FILE)]
        model: PathBuf,

        /// Comma-separated sensor values; missing trailing values stay at 0.5
        #[arg(short, long, value_delimiter = ',')]
        sensors: Vec<f64>,

        /// Print the result as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Show the structure of a model artifact
    Inspect {
        /// Path to the model artifact
        #[arg(short, long, env = "IRRIGATION_MODEL", default_value = DEFAULT_MODEL_FILE)]
        model: PathBuf,
    },

    /// Render the dashboard page with a prediction to HTML
    Render {
        /// Path to the model artifact
        #[arg(short, long, env = "IRRIGATION_MODEL", default_value = DEFAULT_MODEL_FILE)]
        model: PathBuf,

        /// Comma-separated sensor values; missing trailing values stay at 0.5
        #[arg(short, long, value_delimiter = ',')]
        sensors: Vec<f64>,

        /// Optional dashboard configuration file
        #[arg(short, long, env = "IRRIGATION_CONFIG")]
        config: Option<PathBuf>,

        /// Optional background image
        #[arg(short, long, env = "IRRIGATION_BACKGROUND")]
        background: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&LogConfig::cli(cli.verbose))?;

    match cli.command {
        Commands::Predict {
            model,
            sensors,
            json,
        } => cmd_predict(&model, &sensors, json),
        Commands::Inspect { model } => cmd_inspect(&model),
        Commands::Render {
            model,
            sensors,
            config,
            background,
            output,
        } => cmd_render(&model, &sensors, config, background, output),
    }
}

/// Fill a panel from positional values
fn panel_from(values: &[f64]) -> Result<SensorPanel> {
    let mut panel = SensorPanel::new();
    for (i, &v) in values.iter().enumerate() {
        panel
            .set(i, v)
            .with_context(|| format!("invalid value for sensor {}", i))?;
    }
    Ok(panel)
}

fn require_model(path: &Path) -> Result<ModelHandle> {
    let handle = load_model(path);
    if let Some(err) = handle.load_error() {
        return Err(anyhow::anyhow!(err));
    }
    Ok(handle)
}

fn cmd_predict(model: &Path, sensors: &[f64], json: bool) -> Result<()> {
    let handle = require_model(model)?;
    let panel = panel_from(sensors)?;

    let outcome = Predictor::new(&handle).predict(&panel.collect())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

fn print_outcome(outcome: &PredictionOutcome) {
    println!("{}", "Prediction Results".bold());
    println!("  {}", format_progress_bar(outcome.progress(), 20));
    println!("  {}", outcome.summary());
    println!("  Inference: {}", format_latency(outcome.inference_time_ms));
    println!();

    for chip in outcome.chips() {
        let status = if chip.on {
            chip.status.as_str().green().bold()
        } else {
            chip.status.as_str().red().bold()
        };
        println!("  {:<13} {}", chip.label, status);
    }
}

fn cmd_inspect(model: &Path) -> Result<()> {
    let forest = ForestModel::load(model)
        .with_context(|| format!("could not load {}", model.display()))?;

    println!("{}", model.display().to_string().bold());
    println!("  inputs:  {}", forest.input_width());
    println!("  outputs: {}", forest.output_width());
    println!("  trees:   {}", forest.tree_count());
    println!("  nodes:   {}", forest.node_count());

    for (i, output) in forest.outputs.iter().enumerate() {
        println!(
            "  Sprinkler {:<3} {} trees, classes {:?}",
            i,
            output.trees.len(),
            output.classes
        );
    }
    Ok(())
}

fn cmd_render(
    model: &Path,
    sensors: &[f64],
    config: Option<PathBuf>,
    background: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut dashboard_config = match config {
        Some(path) => DashboardConfig::load(&path)?,
        None => DashboardConfig::default(),
    };
    dashboard_config.model_path = model.to_path_buf();
    if background.is_some() {
        dashboard_config.background_path = background;
    }

    let handle = load_model(&dashboard_config.model_path);
    let bg = Background::load(dashboard_config.background_path.as_deref());

    let mut dashboard = Dashboard::with_panel(panel_from(sensors)?);
    let notice = dashboard
        .trigger_predict(&Predictor::new(&handle))
        .err()
        .map(|e| e.to_string());

    let mut view = PageView::new(&dashboard_config, &bg, &dashboard, &handle);
    if let Some(notice) = notice {
        view = view.with_notice(notice);
    }
    let html = PageRenderer::new()?.render(&view)?;

    match output {
        Some(path) => {
            std::fs::write(&path, html)?;
            info!("Wrote dashboard to {:?}", path);
            println!("Wrote {}", path.display());
        }
        None => println!("{}", html),
    }
    Ok(())
}
