//! Percent-change arithmetic for price series

/// Percent change from `previous` to `current`.
///
/// Returns `None` when `previous` is zero, since the change is undefined.
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }

    let change = (current - previous) / previous * 100.0;
    change.is_finite().then_some(change)
}

/// Percent change of every value against the value `lag` positions earlier.
///
/// The first `lag` entries have no predecessor and are `None`, as is any
/// entry whose predecessor is zero.
pub fn lagged_percent_changes(values: &[f64], lag: usize) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, &current)| {
            i.checked_sub(lag)
                .and_then(|prior| percent_change(values[prior], current))
        })
        .collect()
}

/// Round half away from zero to `places` decimal places
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
