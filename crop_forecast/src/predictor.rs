//! Query surface for the dashboard
//!
//! [`CropPredictor`] owns the loaded price table as an immutable snapshot.
//! Queries take a reference-counted handle to the current snapshot and
//! compute on it. [`CropPredictor::reload`] builds the new table and notes
//! off to the side and swaps both under one lock, so readers never observe
//! a partially loaded table or a table paired with stale notes.

use crate::config::DashboardConfig;
use crate::data::{DataLoader, MarketNotes, Month, PriceTable};
use crate::lookup;
use crate::models::linear_trend::{LinearTrend, TrainedLinearTrend};
use crate::models::{forecast_crop, ForecastModel, ForecastPoint};
use crate::ranking::{rank, Direction, RankingRecord};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Summary of one crop for the commodity page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropSummary {
    /// Crop name as requested
    pub name: String,
    /// Last observed price
    pub current_price: f64,
    /// Main producing states
    pub production_regions: Vec<String>,
    /// Main export destinations
    pub export_markets: Vec<String>,
}

/// Everything the predictions page shows for one crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropCard {
    /// Crop name as written in the table
    pub name: String,
    /// Last observed price
    pub current_price: Option<f64>,
    /// Main producing states
    pub regions: Vec<String>,
    /// Main export destinations
    pub exports: Vec<String>,
    /// Price forecast
    pub forecast: Vec<ForecastPoint>,
}

/// Fitted trend parameters for one crop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    /// Crop name as requested
    pub name: String,
    /// Observations the line was fitted on
    pub observations: usize,
    /// Price change per period
    pub slope: f64,
    /// Fitted price at the first observation
    pub intercept: f64,
    /// Fit quality; absent for constant prices
    pub r_squared: Option<f64>,
}

/// Data-access object behind every dashboard query
#[derive(Debug)]
pub struct CropPredictor {
    config: DashboardConfig,
    model: LinearTrend,
    data: RwLock<DataSnapshot>,
}

/// Price table and market notes loaded together
#[derive(Debug, Clone)]
struct DataSnapshot {
    table: Arc<PriceTable>,
    notes: Arc<MarketNotes>,
}

impl CropPredictor {
    /// Load the price table and market notes named in `config`.
    ///
    /// Missing or unreadable files leave the predictor with empty data.
    pub fn new(config: DashboardConfig) -> Self {
        let table = load_table(&config);
        let notes = DataLoader::load_market_notes(&config.data.market_notes_path);
        Self::from_parts(config, table, notes)
    }

    /// Build a predictor over data that is already in memory
    pub fn from_parts(config: DashboardConfig, table: PriceTable, notes: MarketNotes) -> Self {
        Self {
            config,
            model: LinearTrend::new(),
            data: RwLock::new(DataSnapshot {
                table: Arc::new(table),
                notes: Arc::new(notes),
            }),
        }
    }

    /// Build a predictor over a table with default settings and no notes
    pub fn with_table(table: PriceTable) -> Self {
        Self::from_parts(DashboardConfig::default(), table, MarketNotes::default())
    }

    /// The active configuration
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Current price table snapshot
    pub fn snapshot(&self) -> Arc<PriceTable> {
        Arc::clone(&self.data().table)
    }

    fn notes(&self) -> Arc<MarketNotes> {
        Arc::clone(&self.data().notes)
    }

    fn data(&self) -> DataSnapshot {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-read both data files and swap them in together.
    ///
    /// Snapshots taken before the reload keep the old data.
    pub fn reload(&self) {
        let table = Arc::new(load_table(&self.config));
        let notes = Arc::new(DataLoader::load_market_notes(
            &self.config.data.market_notes_path,
        ));

        info!(rows = table.len(), "swapping in reloaded price table");
        *self.data.write().unwrap_or_else(PoisonError::into_inner) =
            DataSnapshot { table, notes };
    }

    /// Current price and reference data for a crop; `None` if it is not in the table
    pub fn get_crop_data(&self, name: &str) -> Option<CropSummary> {
        let current_price = self.snapshot().latest_price(name)?;

        Some(CropSummary {
            name: name.to_string(),
            current_price,
            production_regions: self.get_production_regions(name),
            export_markets: self.get_export_markets(name),
        })
    }

    /// Forecast `periods` prices, labelled from the current month
    pub fn get_forecast(&self, name: &str, periods: usize) -> Vec<ForecastPoint> {
        self.get_forecast_from(name, periods, Month::current())
    }

    /// Forecast `periods` prices, labelled from `start`
    pub fn get_forecast_from(&self, name: &str, periods: usize, start: Month) -> Vec<ForecastPoint> {
        let table = self.snapshot();
        match forecast_crop(&self.model, &table, name, periods, start) {
            Ok(points) => {
                if points.is_empty() {
                    debug!(crop = name, "no observations, empty forecast");
                }
                points
            }
            Err(e) => {
                warn!(crop = name, error = %e, "forecast failed");
                Vec::new()
            }
        }
    }

    /// Fitted trend for a crop; `None` if it is not in the table
    pub fn get_trend(&self, name: &str) -> Option<TrendSummary> {
        let prices = self.snapshot().prices(name);
        if prices.is_empty() {
            return None;
        }

        let trained: TrainedLinearTrend = match self.model.train(&prices) {
            Ok(trained) => trained,
            Err(e) => {
                warn!(crop = name, error = %e, "trend fit failed");
                return None;
            }
        };

        Some(TrendSummary {
            name: name.to_string(),
            observations: prices.len(),
            slope: trained.slope(),
            intercept: trained.intercept(),
            r_squared: trained.r_squared(),
        })
    }

    /// Largest increases over `days` positions
    pub fn get_top_gainers(&self, days: usize) -> Vec<RankingRecord> {
        rank(
            &self.snapshot(),
            Direction::Gainers,
            days,
            self.config.ranking.limit,
        )
    }

    /// Largest decreases over `days` positions
    pub fn get_top_losers(&self, days: usize) -> Vec<RankingRecord> {
        rank(
            &self.snapshot(),
            Direction::Losers,
            days,
            self.config.ranking.limit,
        )
    }

    /// Trends, news and freshness stamp from the market notes file
    pub fn get_market_insights(&self) -> MarketNotes {
        self.notes().as_ref().clone()
    }

    /// Main producing states for a crop
    pub fn get_production_regions(&self, name: &str) -> Vec<String> {
        lookup::production_regions(name)
            .iter()
            .map(|r| r.to_string())
            .collect()
    }

    /// Main export destinations for a crop
    pub fn get_export_markets(&self, name: &str) -> Vec<String> {
        lookup::export_markets(name)
            .iter()
            .map(|m| m.to_string())
            .collect()
    }

    /// Distinct crops in the table, in order of first appearance
    pub fn crops(&self) -> Vec<String> {
        self.snapshot().crops()
    }

    /// Crops listed on the dashboard regardless of the loaded data
    pub fn commodities() -> Vec<String> {
        lookup::COMMODITIES.iter().map(|c| c.to_string()).collect()
    }

    /// One card per crop in the table, all computed on the same snapshot
    pub fn crop_cards(&self, periods: usize) -> Vec<CropCard> {
        let table = self.snapshot();
        let start = Month::current();

        table
            .crops()
            .into_iter()
            .map(|name| {
                let forecast = forecast_crop(&self.model, &table, &name, periods, start)
                    .unwrap_or_else(|e| {
                        warn!(crop = %name, error = %e, "forecast failed");
                        Vec::new()
                    });

                CropCard {
                    current_price: table.latest_price(&name),
                    regions: self.get_production_regions(&name),
                    exports: self.get_export_markets(&name),
                    forecast,
                    name,
                }
            })
            .collect()
    }
}

fn load_table(config: &DashboardConfig) -> PriceTable {
    DataLoader::load_prices(&config.data.prices_path, config.data.order)
}
