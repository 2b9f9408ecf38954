//! Static crop reference data

/// Crops listed on the dashboard
pub const COMMODITIES: [&str; 9] = [
    "Wheat",
    "Rice",
    "Cotton",
    "Soybean",
    "Maize",
    "Coffee",
    "Groundnut",
    "Mustard",
    "Sunflower",
];

const DEFAULT_REGIONS: &[&str] = &["Multiple regions"];
const DEFAULT_MARKETS: &[&str] = &["Global markets"];

/// Main producing states for a crop
pub fn production_regions(crop: &str) -> &'static [&'static str] {
    match crop.to_lowercase().as_str() {
        "wheat" => &["Punjab", "Haryana", "Uttar Pradesh"],
        "rice" => &["West Bengal", "Punjab", "Andhra Pradesh"],
        "cotton" => &["Maharashtra", "Gujarat", "Punjab"],
        "maize" => &["Karnataka", "Andhra Pradesh", "Bihar"],
        "soybean" => &["Madhya Pradesh", "Maharashtra", "Rajasthan"],
        "mustard" => &["Rajasthan", "Uttar Pradesh", "Haryana"],
        "sunflower" => &["Karnataka", "Andhra Pradesh", "Maharashtra"],
        "groundnut" => &["Gujarat", "Andhra Pradesh", "Tamil Nadu"],
        "coffee" => &["Karnataka", "Kerala", "Tamil Nadu"],
        _ => DEFAULT_REGIONS,
    }
}

/// Main export destinations for a crop
pub fn export_markets(crop: &str) -> &'static [&'static str] {
    match crop.to_lowercase().as_str() {
        "wheat" => &["Bangladesh", "Nepal", "UAE"],
        "rice" => &["Iran", "Iraq", "Saudi Arabia"],
        "cotton" => &["China", "Bangladesh", "Vietnam"],
        "maize" => &["Malaysia", "Indonesia", "Vietnam"],
        "soybean" => &["China", "Japan", "Vietnam"],
        "mustard" => &["Bangladesh", "Nepal", "Pakistan"],
        "sunflower" => &["Turkey", "Egypt", "Iran"],
        "groundnut" => &["Indonesia", "Vietnam", "Philippines"],
        "coffee" => &["Italy", "Germany", "Russia"],
        _ => DEFAULT_MARKETS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(production_regions("WHEAT"), production_regions("wheat"));
        assert_eq!(export_markets("Coffee"), &["Italy", "Germany", "Russia"]);
    }

    #[test]
    fn test_unknown_crop_defaults() {
        assert_eq!(production_regions("Quinoa"), &["Multiple regions"]);
        assert_eq!(export_markets("Quinoa"), &["Global markets"]);
    }

    #[test]
    fn test_every_commodity_has_entries() {
        for crop in COMMODITIES {
            assert_ne!(production_regions(crop), DEFAULT_REGIONS);
            assert_ne!(export_markets(crop), DEFAULT_MARKETS);
        }
    }
}
