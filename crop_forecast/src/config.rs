//! TOML configuration for the dashboard back end

use crate::data::RowOrder;
use crate::error::{ForecastError, Result};
use crate::models::{DEFAULT_PERIODS, MAX_PERIODS};
use crate::ranking::{DEFAULT_LAG_DAYS, DEFAULT_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that re-roots both data files
pub const DATA_DIR_ENV: &str = "CROP_INSIGHT_DATA_DIR";

const PRICES_FILE: &str = "crop_prices.csv";
const NOTES_FILE: &str = "market_data.json";

/// Complete dashboard configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Input files
    pub data: DataConfig,
    /// Forecast defaults
    pub forecast: ForecastConfig,
    /// Gainers / losers defaults
    pub ranking: RankingConfig,
}

/// Input file locations and row ordering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Price table path
    pub prices_path: PathBuf,
    /// Market notes path
    pub market_notes_path: PathBuf,
    /// How rows are sequenced within a crop's series
    pub order: RowOrder,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            prices_path: Path::new("data").join(PRICES_FILE),
            market_notes_path: Path::new("data").join(NOTES_FILE),
            order: RowOrder::File,
        }
    }
}

/// Forecast defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Periods forecast when the caller does not say
    pub periods: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            periods: DEFAULT_PERIODS,
        }
    }
}

/// Gainers / losers defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Positional lag for the change
    pub days: usize,
    /// Records returned per list
    pub limit: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            days: DEFAULT_LAG_DAYS,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.forecast.periods == 0 {
            return Err(ForecastError::ConfigError(
                "forecast.periods must be at least 1".to_string(),
            ));
        }

        if self.forecast.periods > MAX_PERIODS {
            return Err(ForecastError::ConfigError(format!(
                "forecast.periods must be at most {}",
                MAX_PERIODS
            )));
        }

        if self.ranking.limit == 0 {
            return Err(ForecastError::ConfigError(
                "ranking.limit must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Point both data files into `dir`, keeping their file names
    pub fn with_data_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        let dir = dir.as_ref();
        let prices = file_name_or(&self.data.prices_path, PRICES_FILE);
        let notes = file_name_or(&self.data.market_notes_path, NOTES_FILE);
        self.data.prices_path = dir.join(prices);
        self.data.market_notes_path = dir.join(notes);
        self
    }

    /// Apply [`DATA_DIR_ENV`] if it is set
    pub fn apply_env_overrides(self) -> Self {
        match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => self.with_data_dir(PathBuf::from(dir)),
            _ => self,
        }
    }
}

fn file_name_or(path: &Path, default: &str) -> PathBuf {
    path.file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
