//! Amount normalization and cents rounding.

use crate::cell::CellValue;

/// Parse a statement amount cell into a number.
///
/// Never fails: anything unreadable or non-finite is 0. Finite numbers pass
/// through untouched, rounding happens where amounts are accumulated.
pub fn normalize_amount(value: &CellValue) -> f64 {
    match value {
        CellValue::Empty | CellValue::Date(_) => 0.0,
        CellValue::Number(n) if n.is_finite() => *n,
        CellValue::Number(_) => 0.0,
        CellValue::Text(s) => parse_amount_text(s),
    }
}

/// `"1 234,56"` -> `1234.56`. Only the first comma is treated as a decimal mark.
pub fn parse_amount_text(s: &str) -> f64 {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return 0.0;
    }
    let normalized = compact.replacen(',', ".", 1);
    match normalized.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Round to two decimals, half-up on the shifted cents. Non-finite input is 0.
pub fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    ((value + f64::EPSILON) * 100.0).round() / 100.0
}

/// Treat an unset category amount as zero.
pub fn or_zero(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}
