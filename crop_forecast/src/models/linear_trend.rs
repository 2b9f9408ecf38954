//! Linear trend model
//!
//! Fits an ordinary least-squares line of price against the observation's
//! position in its series and extends it into the future. Positions are
//! sequential integers regardless of how much calendar time separates the
//! observations.

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use crop_math::LinearRegression;
use serde::Serialize;

/// Linear trend forecasting model
#[derive(Debug, Clone, Default)]
pub struct LinearTrend;

impl LinearTrend {
    /// Create a new linear trend model
    pub fn new() -> Self {
        Self
    }
}

impl ForecastModel for LinearTrend {
    type Trained = TrainedLinearTrend;

    fn train(&self, prices: &[f64]) -> Result<Self::Trained> {
        if prices.is_empty() {
            return Err(ForecastError::DataError(
                "Cannot train on an empty price series".to_string(),
            ));
        }

        let regression = LinearRegression::fit(prices)?;
        let r_squared = regression.r_squared(prices)?;

        Ok(TrainedLinearTrend {
            regression,
            r_squared,
            last_observed: prices[prices.len() - 1],
        })
    }

    fn name(&self) -> &str {
        "Linear Trend"
    }
}

/// Trained linear trend model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainedLinearTrend {
    regression: LinearRegression,
    r_squared: Option<f64>,
    last_observed: f64,
}

impl TrainedLinearTrend {
    /// Fitted price change per period
    pub fn slope(&self) -> f64 {
        self.regression.slope()
    }

    /// Fitted price at index 0
    pub fn intercept(&self) -> f64 {
        self.regression.intercept()
    }

    /// Fit quality; `None` when the training prices were constant
    pub fn r_squared(&self) -> Option<f64> {
        self.r_squared
    }

    /// The underlying regression line
    pub fn regression(&self) -> &LinearRegression {
        &self.regression
    }
}

impl TrainedForecastModel for TrainedLinearTrend {
    fn forecast(&self, horizons: usize) -> Result<ForecastResult> {
        ForecastResult::new(
            self.regression.forecast(horizons)?,
            horizons,
            self.last_observed,
        )
    }

    fn predict(&self) -> Vec<f64> {
        self.regression.fitted_values()
    }

    fn name(&self) -> &str {
        "Linear Trend"
    }
}
