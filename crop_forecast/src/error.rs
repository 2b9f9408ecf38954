//! Error types for the crop_forecast crate

use crop_math::MathError;
use thiserror::Error;

/// Custom error types for the crop_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A value in the price table could not be used
    #[error("Data error: {0}")]
    DataError(String),

    /// The price table does not have the expected columns
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// File bytes could not be decoded as text
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Invalid or unreadable configuration
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the CSV reader
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON parsing
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error from trend fitting or change calculations
    #[error("Math error: {0}")]
    MathError(#[from] MathError),
}

impl ForecastError {
    /// Whether this error means the file was simply not there
    pub fn is_not_found(&self) -> bool {
        matches!(self, ForecastError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}
