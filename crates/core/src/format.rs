//! Presentation formatting for derived hours.
//!
//! Formatting is one-way: nothing produced here is parsed back into a
//! computation.

/// Two decimals with trailing zeros (and a dangling dot) stripped.
///
/// `2.50` renders as `2.5`, `3.00` as `3`, and a negative zero as `0`.
pub fn format_hours(hours: f64) -> String {
    let fixed = format!("{:.2}", hours);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}
