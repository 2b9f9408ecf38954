//! Command-line host for the crop dashboard queries.
//!
//! Every command prints pretty JSON on stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crop_forecast::{CropPredictor, DashboardConfig};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "crop-dashboard",
    version,
    about = "Crop prices, linear forecasts and market movers"
)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding crop_prices.csv and market_data.json
    /// (overrides CROP_INSIGHT_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Current price and reference data for a crop
    Crop { name: String },

    /// Linear price forecast for a crop
    Forecast {
        name: String,
        /// Periods to forecast (defaults to the configured value)
        #[arg(short, long)]
        periods: Option<usize>,
    },

    /// Fitted trend line for a crop
    Trend { name: String },

    /// Largest price increases
    Gainers {
        /// Positional lag (defaults to the configured value)
        #[arg(short, long)]
        days: Option<usize>,
    },

    /// Largest price decreases
    Losers {
        /// Positional lag (defaults to the configured value)
        #[arg(short, long)]
        days: Option<usize>,
    },

    /// Market trends and news
    Insights,

    /// Price, reference data and forecast for every crop in the table
    Predictions {
        #[arg(short, long)]
        periods: Option<usize>,
    },

    /// Main producing states for a crop
    Regions { name: String },

    /// Main export destinations for a crop
    Exports { name: String },

    /// Crops listed on the dashboard
    Commodities,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => DashboardConfig::default(),
    }
    .apply_env_overrides();
    if let Some(dir) = &args.data_dir {
        config = config.with_data_dir(dir);
    }
    debug!(?config, "resolved configuration");

    let periods_default = config.forecast.periods;
    let days_default = config.ranking.days;
    let predictor = CropPredictor::new(config);

    match args.command {
        Command::Crop { name } => print_json(&predictor.get_crop_data(&name)),
        Command::Forecast { name, periods } => {
            print_json(&predictor.get_forecast(&name, periods.unwrap_or(periods_default)))
        }
        Command::Trend { name } => print_json(&predictor.get_trend(&name)),
        Command::Gainers { days } => {
            print_json(&predictor.get_top_gainers(days.unwrap_or(days_default)))
        }
        Command::Losers { days } => {
            print_json(&predictor.get_top_losers(days.unwrap_or(days_default)))
        }
        Command::Insights => print_json(&predictor.get_market_insights()),
        Command::Predictions { periods } => {
            print_json(&predictor.crop_cards(periods.unwrap_or(periods_default)))
        }
        Command::Regions { name } => print_json(&predictor.get_production_regions(&name)),
        Command::Exports { name } => print_json(&predictor.get_export_markets(&name)),
        Command::Commodities => print_json(&CropPredictor::commodities()),
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
