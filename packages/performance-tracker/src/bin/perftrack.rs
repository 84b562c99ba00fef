//! perftrack - command line front end for the performance tracker.
//!
//! Reads return series from a JSON file and prints JSON results wrapped in an
//! `ApiResponse` envelope. Logs go to stderr (`RUST_LOG` controls the level).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use performance_tracker::{
    series::prepare_series, ApiResponse, PerformanceTracker, Period, TrackerConfig,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "perftrack")]
#[command(about = "Portfolio performance and risk metrics from return series")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to PERFTRACK_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute every metric
    Metrics {
        #[command(flatten)]
        input: InputArgs,
        /// Sampling period (daily or weekly)
        #[arg(short, long)]
        period: Option<String>,
        /// Annual risk-free rate in percent
        #[arg(short = 'r', long)]
        risk_free: Option<f64>,
        /// VaR tail probability (0.05 = 95% confidence)
        #[arg(short, long)]
        alpha_var: Option<f64>,
    },
    /// Print cumulative return curves for charting
    Curves {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print the effective configuration
    Config,
}

#[derive(clap::Args)]
struct InputArgs {
    /// JSON file with `returns` and optional `benchmark` or `assets`
    #[arg(short, long)]
    input: PathBuf,
    /// Treat the series in the input file as prices instead of returns
    #[arg(long)]
    prices: bool,
}

/// Input file layout. `assets` builds an equal-weighted benchmark when no
/// explicit `benchmark` is given.
#[derive(Debug, Deserialize)]
struct SeriesFile {
    returns: Vec<f64>,
    #[serde(default)]
    benchmark: Option<Vec<f64>>,
    #[serde(default)]
    assets: Option<Vec<Vec<f64>>>,
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let outcome = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Metrics {
            input,
            period,
            risk_free,
            alpha_var,
        } => handle_metrics(&input, config, period, risk_free, alpha_var),
        Commands::Curves { input } => handle_curves(&input, config),
        Commands::Config => Ok(serde_json::to_value(config)?),
    });

    let response = match outcome {
        Ok(data) => ApiResponse::ok(data),
        Err(e) => {
            tracing::error!("{:#}", e);
            ApiResponse::err(format!("{:#}", e))
        }
    };

    match serde_json::to_string_pretty(&response) {
        Ok(output) => println!("{}", output),
        Err(e) => eprintln!("Failed to encode response: {}", e),
    }

    if !response.ok {
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<TrackerConfig> {
    let config = match path {
        Some(path) => TrackerConfig::load_from_path(path),
        None => TrackerConfig::load(),
    };
    config.context("Failed to load configuration")
}

fn read_series(args: &InputArgs) -> Result<(Vec<f64>, Option<Vec<f64>>)> {
    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let file: SeriesFile = serde_json::from_str(&content)
        .with_context(|| format!("Invalid series file {}", args.input.display()))?;

    let (returns, benchmark) =
        prepare_series(file.returns, file.benchmark, file.assets, args.prices)?;

    tracing::debug!(
        observations = returns.len(),
        has_benchmark = benchmark.is_some(),
        "Loaded series from {}",
        args.input.display()
    );

    Ok((returns, benchmark))
}

fn handle_metrics(
    input: &InputArgs,
    mut config: TrackerConfig,
    period: Option<String>,
    risk_free: Option<f64>,
    alpha_var: Option<f64>,
) -> Result<Value> {
    if let Some(period) = period {
        config.period = period.parse::<Period>()?;
    }
    if let Some(risk_free) = risk_free {
        config.annual_risk_free = risk_free;
    }
    if let Some(alpha_var) = alpha_var {
        config.alpha_var = alpha_var;
    }

    let (returns, benchmark) = read_series(input)?;
    let tracker = PerformanceTracker::new(returns, benchmark, config)?;

    Ok(json!({
        "config": tracker.config(),
        "observations": tracker.returns().len(),
        "metrics": tracker.compute_all(),
    }))
}

fn handle_curves(input: &InputArgs, config: TrackerConfig) -> Result<Value> {
    let (returns, benchmark) = read_series(input)?;
    let tracker = PerformanceTracker::new(returns, benchmark, config)?;
    Ok(serde_json::to_value(tracker.cumulative_returns())?)
}
