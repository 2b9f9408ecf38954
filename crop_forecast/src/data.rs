//! Crop price table and market notes loading

use crate::encoding::{decode_notes, decode_table};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{error, info, warn};

/// Column names of an empty table
pub const CANONICAL_COLUMNS: [&str; 3] = ["Crop", "Price", "Date"];

/// Calendar month label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// The fixed twelve-month cycle, starting at January
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// The current month on the local clock
    pub fn current() -> Self {
        Self::ALL[Local::now().month0() as usize]
    }

    /// The month `offset` steps later, wrapping around the year
    pub fn advance(self, offset: usize) -> Self {
        Self::ALL[(self as usize + offset % 12) % 12]
    }

    /// Three-letter label
    pub fn label(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Month {
    type Err = ForecastError;

    /// Accepts three-letter or full month names, in any case
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        Month::ALL
            .iter()
            .copied()
            .find(|m| lower == m.label().to_lowercase() || lower == full_name(*m))
            .ok_or_else(|| ForecastError::DataError(format!("Unknown month: '{}'", s)))
    }
}

fn full_name(month: Month) -> &'static str {
    match month {
        Month::Jan => "january",
        Month::Feb => "february",
        Month::Mar => "march",
        Month::Apr => "april",
        Month::May => "may",
        Month::Jun => "june",
        Month::Jul => "july",
        Month::Aug => "august",
        Month::Sep => "september",
        Month::Oct => "october",
        Month::Nov => "november",
        Month::Dec => "december",
    }
}

/// One row of the price table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Crop name as written in the file
    pub crop: String,
    /// Month label, when the file has a `Month` column
    pub month: Option<Month>,
    /// Observed price
    pub price: f64,
    /// Observation date, when the file has a `Date` column
    pub date: Option<NaiveDate>,
}

impl PriceObservation {
    /// Create an observation without month or date
    pub fn new(crop: impl Into<String>, price: f64) -> Self {
        Self {
            crop: crop.into(),
            month: None,
            price,
            date: None,
        }
    }

    /// Set the month label
    pub fn with_month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    /// Set the observation date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Case-insensitive crop name comparison
    pub fn is_crop(&self, name: &str) -> bool {
        self.crop.to_lowercase() == name.to_lowercase()
    }
}

/// How rows are sequenced within each crop's series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    /// Keep file order; the file must already be chronological
    #[default]
    File,
    /// Stable sort by the `Date` column
    ByDate,
}

/// Read-only crop price table
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    observations: Vec<PriceObservation>,
    columns: Vec<String>,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl PriceTable {
    /// An empty table with the canonical columns
    pub fn empty() -> Self {
        Self {
            observations: Vec::new(),
            columns: CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Create a table from observations, in the given order
    pub fn from_observations(observations: Vec<PriceObservation>) -> Self {
        let mut columns: Vec<String> = vec!["Crop".to_string(), "Price".to_string()];
        if observations.iter().any(|o| o.month.is_some()) {
            columns.push("Month".to_string());
        }
        if observations.iter().any(|o| o.date.is_some()) {
            columns.push("Date".to_string());
        }

        Self {
            observations,
            columns,
        }
    }

    /// All observations in table order
    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }

    /// Column names present in the source
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether a column is present (case-insensitive)
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.eq_ignore_ascii_case(name))
    }

    /// Whether the `Crop` and `Price` columns are both present
    pub fn has_required_columns(&self) -> bool {
        self.has_column("Crop") && self.has_column("Price")
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Observations for one crop (case-insensitive), in table order
    pub fn series(&self, crop: &str) -> Vec<&PriceObservation> {
        self.observations.iter().filter(|o| o.is_crop(crop)).collect()
    }

    /// Prices for one crop (case-insensitive), in table order
    pub fn prices(&self, crop: &str) -> Vec<f64> {
        self.series(crop).iter().map(|o| o.price).collect()
    }

    /// Most recent price for a crop
    pub fn latest_price(&self, crop: &str) -> Option<f64> {
        self.series(crop).last().map(|o| o.price)
    }

    /// Distinct crop names in order of first appearance
    pub fn crops(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.observations
            .iter()
            .filter(|o| seen.insert(o.crop.as_str()))
            .map(|o| o.crop.clone())
            .collect()
    }

    /// Apply a row ordering, returning a new table
    pub fn ordered(self, order: RowOrder) -> Result<Self> {
        match order {
            RowOrder::File => Ok(self),
            RowOrder::ByDate => self.sorted_by_date(),
        }
    }

    /// Stable sort by date. Every observation must carry a date.
    pub fn sorted_by_date(&self) -> Result<Self> {
        if let Some(pos) = self.observations.iter().position(|o| o.date.is_none()) {
            return Err(ForecastError::DataError(format!(
                "Cannot order by date: row {} ({}) has no date",
                pos + 1,
                self.observations[pos].crop
            )));
        }

        let mut observations = self.observations.clone();
        observations.sort_by_key(|o| o.date);

        Ok(Self {
            observations,
            columns: self.columns.clone(),
        })
    }
}

/// Market commentary read from the notes file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketNotes {
    /// Trend notes
    #[serde(default)]
    pub trends: Vec<serde_json::Value>,
    /// News items
    #[serde(default)]
    pub news: Vec<serde_json::Value>,
    /// When the notes were last refreshed
    #[serde(default)]
    pub last_updated: String,
}

impl MarketNotes {
    /// Check if the notes carry no content
    pub fn is_empty(&self) -> bool {
        self.trends.is_empty() && self.news.is_empty() && self.last_updated.is_empty()
    }
}

/// Data loader for price tables and market notes
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Read a price table, failing with a descriptive error on any problem
    pub fn read_prices<P: AsRef<Path>>(path: P) -> Result<PriceTable> {
        let bytes = std::fs::read(path)?;
        let text = decode_table(&bytes)?;
        Self::prices_from_str(&text)
    }

    /// Read a price table, degrading to an empty table if it is missing or unreadable
    pub fn load_prices<P: AsRef<Path>>(path: P, order: RowOrder) -> PriceTable {
        let path = path.as_ref();
        match Self::read_prices(path).and_then(|table| table.ordered(order)) {
            Ok(table) => {
                info!(
                    path = %path.display(),
                    rows = table.len(),
                    crops = table.crops().len(),
                    "loaded price table"
                );
                table
            }
            Err(e) if e.is_not_found() => {
                error!(path = %path.display(), "CSV file not found");
                PriceTable::empty()
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "error reading CSV");
                PriceTable::empty()
            }
        }
    }

    /// Parse a price table from decoded text
    pub fn prices_from_str(text: &str) -> Result<PriceTable> {
        // Rows may stop short of trailing optional columns
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let columns = ColumnMap::from_headers(&headers)?;

        let mut observations = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            observations.push(columns.observation(&record, line)?);
        }

        Ok(PriceTable {
            observations,
            columns: headers.iter().map(normalize_header).collect(),
        })
    }

    /// Read the market notes file, failing on any problem
    pub fn read_market_notes<P: AsRef<Path>>(path: P) -> Result<MarketNotes> {
        let bytes = std::fs::read(path)?;
        let text = decode_notes(&bytes)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Read the market notes file, degrading to empty notes on any problem
    pub fn load_market_notes<P: AsRef<Path>>(path: P) -> MarketNotes {
        let path = path.as_ref();
        match Self::read_market_notes(path) {
            Ok(notes) => notes,
            Err(e) if e.is_not_found() => {
                warn!(path = %path.display(), "JSON file not found");
                MarketNotes::default()
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "error reading JSON");
                MarketNotes::default()
            }
        }
    }
}

/// Positions of the known columns in a header row
#[derive(Debug)]
struct ColumnMap {
    crop: usize,
    price: usize,
    month: Option<usize>,
    date: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (normalize_header(name).to_lowercase(), i))
            .collect();

        let missing: Vec<&str> = ["Crop", "Price"]
            .into_iter()
            .filter(|c| !index.contains_key(&c.to_lowercase()))
            .collect();

        if !missing.is_empty() {
            let found: Vec<String> = headers.iter().map(normalize_header).collect();
            return Err(ForecastError::SchemaError(format!(
                "Missing required column(s) {}; found [{}]",
                missing.join(", "),
                found.join(", ")
            )));
        }

        Ok(Self {
            crop: index["crop"],
            price: index["price"],
            month: index.get("month").copied(),
            date: index.get("date").copied(),
        })
    }

    fn observation(&self, record: &csv::StringRecord, line: u64) -> Result<PriceObservation> {
        let field = |i: usize| record.get(i).unwrap_or("");

        let crop = field(self.crop);
        if crop.is_empty() {
            return Err(ForecastError::DataError(format!(
                "Line {}: empty Crop value",
                line
            )));
        }

        let raw_price = field(self.price);
        let price: f64 = raw_price.parse().map_err(|_| {
            ForecastError::DataError(format!(
                "Line {}: Price '{}' is not a number",
                line, raw_price
            ))
        })?;
        if !price.is_finite() || price < 0.0 {
            return Err(ForecastError::DataError(format!(
                "Line {}: Price must be a non-negative number, got {}",
                line, raw_price
            )));
        }

        let month = match self.month.map(field).filter(|m| !m.is_empty()) {
            Some(raw) => Some(raw.parse::<Month>().map_err(|e| {
                ForecastError::DataError(format!("Line {}: {}", line, e))
            })?),
            None => None,
        };

        let date = match self.date.map(field).filter(|d| !d.is_empty()) {
            Some(raw) => Some(parse_date(raw).ok_or_else(|| {
                ForecastError::DataError(format!("Line {}: unrecognised Date '{}'", line, raw))
            })?),
            None => None,
        };

        Ok(PriceObservation {
            crop: crop.to_string(),
            month,
            price,
            date,
        })
    }
}

fn normalize_header(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_string()
}

/// Parse the date formats seen in exported price sheets
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_cycle() {
        assert_eq!(Month::Nov.advance(0), Month::Nov);
        assert_eq!(Month::Nov.advance(2), Month::Jan);
        assert_eq!(Month::Jan.advance(24), Month::Jan);
        assert_eq!(Month::Dec.advance(usize::MAX), Month::Mar);
    }

    #[test]
    fn test_month_parsing() {
        assert_eq!("jan".parse::<Month>().unwrap(), Month::Jan);
        assert_eq!("SEP".parse::<Month>().unwrap(), Month::Sep);
        assert_eq!("September".parse::<Month>().unwrap(), Month::Sep);
        assert!("Ju".parse::<Month>().is_err());
        assert!("Smarch".parse::<Month>().is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15);
        assert_eq!(parse_date("2024-03-15"), expected);
        assert_eq!(parse_date("2024/03/15"), expected);
        assert_eq!(parse_date("2024-03-15 08:30:00"), expected);
        assert_eq!(parse_date("2024-03-15T08:30:00+05:30"), expected);
        assert_eq!(parse_date("15 March"), None);
    }

    #[test]
    fn test_header_with_bom_and_case() {
        let table = DataLoader::prices_from_str("\u{feff}crop , PRICE\nWheat,2000\n").unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.has_required_columns());
    }

    #[test]
    fn test_empty_table_has_canonical_columns() {
        let table = PriceTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.columns(), &["Crop", "Price", "Date"]);
    }

    #[test]
    fn test_crops_keep_first_appearance_order() {
        let table = PriceTable::from_observations(vec![
            PriceObservation::new("Rice", 1.0),
            PriceObservation::new("Wheat", 1.0),
            PriceObservation::new("Rice", 2.0),
        ]);
        assert_eq!(table.crops(), vec!["Rice", "Wheat"]);
    }
}
