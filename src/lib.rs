//! # Crop Insight
//!
//! `crop_insight` bundles the workspace crates behind one dependency:
//! [`forecast`] for price tables, forecasts and rankings, and [`math`] for
//! the underlying trend fit.
//!
//! ## Example
//!
//! ```
//! use crop_insight::forecast::{CropPredictor, Month, PriceObservation, PriceTable};
//!
//! let table = PriceTable::from_observations(vec![
//!     PriceObservation::new("Wheat", 100.0),
//!     PriceObservation::new("Wheat", 110.0),
//!     PriceObservation::new("Wheat", 120.0),
//! ]);
//! let predictor = CropPredictor::with_table(table);
//!
//! let forecast = predictor.get_forecast_from("Wheat", 2, Month::Jan);
//! assert_eq!(forecast[0].price, 130.0);
//! assert_eq!(forecast[1].price, 140.0);
//! ```

pub use crop_forecast as forecast;
pub use crop_math as math;

/// Crate versions, for diagnostics output
pub fn versions() -> Vec<(&'static str, &'static str)> {
    vec![
        (env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        (crop_forecast::NAME, crop_forecast::VERSION),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions() {
        let versions = versions();
        assert_eq!(versions[0].0, "crop_insight");
        assert_eq!(versions[1].0, "crop_forecast");
    }

    #[test]
    fn test_math_reexport() {
        let fit = math::LinearRegression::fit(&[1.0, 2.0, 3.0]).unwrap();
        assert!((fit.slope() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_forecast_reexport() {
        let predictor = forecast::CropPredictor::with_table(forecast::PriceTable::empty());
        assert!(predictor.crops().is_empty());
        assert_eq!(predictor.get_top_gainers(7).len(), 5);
    }
}
