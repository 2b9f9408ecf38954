//! Top gainers and top losers
//!
//! Every row is compared with the row `days` positions earlier in the same
//! crop's series. The lag is positional, not a calendar window.

use crate::data::PriceTable;
use crop_math::{percent_change, round_to};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Default positional lag
pub const DEFAULT_LAG_DAYS: usize = 7;

/// Default number of records returned
pub const DEFAULT_LIMIT: usize = 5;

/// Which end of the change distribution to rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Largest increases first
    Gainers,
    /// Largest decreases first
    Losers,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Gainers => write!(f, "gainers"),
            Direction::Losers => write!(f, "losers"),
        }
    }
}

/// A ranked price move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRecord {
    /// Crop name
    pub name: String,
    /// Price of the row the change was measured at
    pub price: f64,
    /// Percent change over the lag, rounded to 3 places
    pub change: f64,
}

impl RankingRecord {
    fn new(name: &str, price: f64, change: f64) -> Self {
        Self {
            name: name.to_string(),
            price,
            change,
        }
    }
}

/// Rank price moves in `table`.
///
/// An empty table, or one without `Crop` and `Price` columns, yields the
/// fixed [`fallback`] list so the dashboard never shows an empty panel.
pub fn rank(table: &PriceTable, direction: Direction, days: usize, limit: usize) -> Vec<RankingRecord> {
    if table.is_empty() || !table.has_required_columns() {
        debug!(%direction, "no price data, using fallback ranking");
        return fallback(direction);
    }

    let mut history: HashMap<&str, Vec<f64>> = HashMap::new();
    let mut moves = Vec::new();

    for obs in table.observations() {
        let prices = history.entry(obs.crop.as_str()).or_default();

        let prior = if days == 0 {
            Some(obs.price)
        } else {
            prices.len().checked_sub(days).map(|i| prices[i])
        };

        if let Some(change) = prior.and_then(|p| percent_change(p, obs.price)) {
            moves.push(RankingRecord::new(&obs.crop, obs.price, change));
        }

        prices.push(obs.price);
    }

    // Stable sort: ties keep table order
    match direction {
        Direction::Gainers => moves.sort_by(|a, b| b.change.total_cmp(&a.change)),
        Direction::Losers => moves.sort_by(|a, b| a.change.total_cmp(&b.change)),
    }

    moves.truncate(limit);
    for record in &mut moves {
        record.change = round_to(record.change, 3);
    }

    moves
}

/// Static ranking shown when no price data is available
pub fn fallback(direction: Direction) -> Vec<RankingRecord> {
    match direction {
        Direction::Gainers => vec![
            RankingRecord::new("Gram", 3920.4, 3.4),
            RankingRecord::new("Sunflower", 3877.6, 2.9),
            RankingRecord::new("Jute", 2871.79, 2.5),
            RankingRecord::new("Rape", 3200.0, 2.1),
            RankingRecord::new("Bajra", 1561.68, 1.9),
        ],
        Direction::Losers => vec![
            RankingRecord::new("Wheat", 2040.0, -2.8),
            RankingRecord::new("Cotton", 6380.5, -2.5),
            RankingRecord::new("Soybean", 4530.3, -2.2),
            RankingRecord::new("Maize", 1890.0, -1.8),
            RankingRecord::new("Mustard", 5450.75, -1.5),
        ],
    }
}
