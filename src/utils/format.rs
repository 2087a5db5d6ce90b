//! Display formatting helpers.

use crate::utils::time::Millis;

/// Format a timestamp for display as day, abbreviated month, year
/// (e.g. "05 Aug 2026"). Falls back to a neutral placeholder for
/// out-of-range values.
pub fn format_date(ms: Millis) -> String {
    match ms.to_datetime() {
        Some(dt) => dt.format("%d %b %Y").to_string(),
        None => "-".to_string(),
    }
}

/// Format an optional reading with its unit, "-" when absent.
pub fn format_reading(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.1} {}", v, unit),
        None => "-".to_string(),
    }
}
