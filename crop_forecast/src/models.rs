//! Forecasting models for crop price series

use crate::data::{Month, PriceTable};
use crate::error::{ForecastError, Result};
use crop_math::{percent_change, round_to};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Default number of periods to forecast
pub const DEFAULT_PERIODS: usize = 6;

/// Longest forecast accepted, a century of monthly periods
pub const MAX_PERIODS: usize = 1200;

/// Forecast result containing predicted values
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    /// Forecasted values
    values: Vec<f64>,
    /// Number of periods forecasted
    horizons: usize,
    /// Last observed price, the base for the first period's change
    last_observed: f64,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizons: usize, last_observed: f64) -> Result<Self> {
        if values.len() != horizons {
            return Err(ForecastError::ValidationError(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }

        Ok(Self {
            values,
            horizons,
            last_observed,
        })
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.horizons
    }

    /// Get the last observed value
    pub fn last_observed(&self) -> f64 {
        self.last_observed
    }

    /// Label each value with a month starting at `start` and chain percent changes.
    ///
    /// The first change is against the last observed price, each later one
    /// against the previous unrounded prediction.
    pub fn to_points(&self, start: Month) -> Vec<ForecastPoint> {
        let mut previous = self.last_observed;

        self.values
            .iter()
            .enumerate()
            .map(|(i, &price)| {
                let change = percent_change(previous, price).map(|c| round_to(c, 2));
                previous = price;
                ForecastPoint {
                    month: start.advance(i),
                    price: round_to(price, 2),
                    change,
                }
            })
            .collect()
    }
}

/// A single future price with its calendar label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Month the prediction is labelled with
    pub month: Month,
    /// Predicted price, rounded to 2 places
    pub price: f64,
    /// Percent change from the prior point, rounded to 2 places.
    /// `None` when the prior price is zero.
    pub change: Option<f64>,
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizons: usize) -> Result<ForecastResult>;

    /// In-sample predictions for the training series
    fn predict(&self) -> Vec<f64>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a price series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on prices in chronological order
    fn train(&self, prices: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Forecast a crop's price with `model`, labelling periods from `start`.
///
/// Returns an empty forecast when the crop has no observations, and an
/// error when `periods` exceeds [`MAX_PERIODS`].
pub fn forecast_crop<M: ForecastModel>(
    model: &M,
    table: &PriceTable,
    crop: &str,
    periods: usize,
    start: Month,
) -> Result<Vec<ForecastPoint>> {
    if periods > MAX_PERIODS {
        return Err(ForecastError::ValidationError(format!(
            "periods must be at most {}, got {}",
            MAX_PERIODS, periods
        )));
    }

    let prices = table.prices(crop);
    if prices.is_empty() {
        return Ok(Vec::new());
    }

    let trained = model.train(&prices)?;
    let result = trained.forecast(periods)?;
    Ok(result.to_points(start))
}

pub mod linear_trend;
