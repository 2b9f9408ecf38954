//! # Crop Forecast
//!
//! Price loading, linear trend forecasting and market mover rankings for an
//! agricultural commodity dashboard.
//!
//! ## Features
//!
//! - Crop price table loading with encoding detection (UTF-8 first, then a
//!   guessed encoding) and graceful fallback to an empty table
//! - Market notes loading (UTF-8 with or without BOM, or UTF-16)
//! - Per-crop linear trend forecasts labelled with calendar months
//! - Top gainers / top losers over a positional lag
//! - Static production-region and export-market lookups
//!
//! ## Ordering
//!
//! Each crop's series is taken in file order unless the loader is told to
//! sort by the `Date` column ([`RowOrder::ByDate`]). Forecast indices are
//! the positions 0, 1, 2, ... of the observations, whatever the calendar
//! gaps between them.
//!
//! ## Quick Start
//!
//! ```no_run
//! use crop_forecast::{CropPredictor, DashboardConfig};
//!
//! let predictor = CropPredictor::new(DashboardConfig::default());
//!
//! for point in predictor.get_forecast("Wheat", 6) {
//!     println!("{}: {:.2} ({:?}%)", point.month, point.price, point.change);
//! }
//!
//! let gainers = predictor.get_top_gainers(7);
//! println!("{} gainers", gainers.len());
//! ```

pub mod config;
pub mod data;
pub mod encoding;
pub mod error;
pub mod lookup;
pub mod models;
pub mod predictor;
pub mod ranking;

// Re-export commonly used types
pub use crate::config::DashboardConfig;
pub use crate::data::{DataLoader, MarketNotes, Month, PriceObservation, PriceTable, RowOrder};
pub use crate::error::{ForecastError, Result};
pub use crate::models::linear_trend::LinearTrend;
pub use crate::models::{forecast_crop, ForecastModel, ForecastPoint, ForecastResult};
pub use crate::predictor::{CropCard, CropPredictor, CropSummary, TrendSummary};
pub use crate::ranking::{rank, Direction, RankingRecord};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
