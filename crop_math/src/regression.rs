//! Linear trend fitting for price forecasting
//!
//! The trend is an ordinary least-squares line fitted against the position
//! of each observation (0, 1, 2, ...), not against calendar time.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Denominators below this are treated as zero variance in x
const VARIANCE_EPSILON: f64 = 1e-10;

/// Least-squares line `price = slope * index + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    slope: f64,
    intercept: f64,
    observations: usize,
}

impl LinearRegression {
    /// Fit a trend line to `values`, using each value's position as its x coordinate.
    ///
    /// A single observation has no x variance; the fit is then a flat line
    /// through that observation (slope 0, intercept equal to the value).
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit a trend to an empty series".to_string(),
            ));
        }

        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(format!(
                "Series contains a non-finite value: {}",
                bad
            )));
        }

        let n = values.len() as f64;

        // Calculate means
        let x_mean = (n - 1.0) / 2.0;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (i, &y) in values.iter().enumerate() {
            let dx = i as f64 - x_mean;
            numerator += dx * (y - y_mean);
            denominator += dx * dx;
        }

        let slope = if denominator.abs() < VARIANCE_EPSILON {
            0.0
        } else {
            numerator / denominator
        };

        Ok(Self {
            slope,
            intercept: y_mean - slope * x_mean,
            observations: values.len(),
        })
    }

    /// Evaluate the line at `index`
    pub fn predict(&self, index: f64) -> f64 {
        self.slope * index + self.intercept
    }

    /// Project `periods` values past the end of the fitted series,
    /// at indices `n..n + periods`
    pub fn forecast(&self, periods: usize) -> Result<Vec<f64>> {
        let end = self.observations.checked_add(periods).ok_or_else(|| {
            MathError::InvalidInput(format!("Cannot forecast {} periods", periods))
        })?;

        Ok((self.observations..end)
            .map(|i| self.predict(i as f64))
            .collect())
    }

    /// In-sample values of the line at indices `0..n`
    pub fn fitted_values(&self) -> Vec<f64> {
        (0..self.observations)
            .map(|i| self.predict(i as f64))
            .collect()
    }

    /// Get the slope (price change per period)
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Get the intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of observations the line was fitted on
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Coefficient of determination of the fit against `values`.
    ///
    /// `values` must be the series the line was fitted on. Returns `None`
    /// when the series has no variance, where R² is undefined.
    pub fn r_squared(&self, values: &[f64]) -> Result<Option<f64>> {
        if values.len() != self.observations {
            return Err(MathError::InvalidInput(format!(
                "Expected {} values, got {}",
                self.observations,
                values.len()
            )));
        }

        let y_mean = values.iter().sum::<f64>() / values.len() as f64;

        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;

        for (i, &y) in values.iter().enumerate() {
            let y_pred = self.predict(i as f64);
            ss_total += (y - y_mean).powi(2);
            ss_residual += (y - y_pred).powi(2);
        }

        if ss_total.abs() < VARIANCE_EPSILON {
            return Ok(None);
        }

        Ok(Some(1.0 - ss_residual / ss_total))
    }
}
