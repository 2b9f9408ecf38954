//! # Crop Math
//!
//! Numeric building blocks for crop price analysis.
//! This crate provides the least-squares trend fit used for price
//! forecasting, and the percent-change arithmetic used for ranking.

use thiserror::Error;

pub mod change;
pub mod regression;

pub use change::{lagged_percent_changes, percent_change, round_to};
pub use regression::LinearRegression;

/// Errors that can occur in price series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for crop math operations
pub type Result<T> = std::result::Result<T, MathError>;
