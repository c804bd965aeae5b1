// Utility helpers for numeric coercion and rounding.
//
// This module centralizes the "dirty" cell handling so the rest of the
// pipeline can assume clean, typed values.
use crate::types::Cell;
use num_format::{Locale, ToFormattedString};

/// Coerce a raw cell into `f64` while being forgiving about the formatting
/// found in ad-platform exports (thousands separators, blanks, stray text).
///
/// - Finite numeric cells pass through unchanged.
/// - Text is trimmed and has every `','` stripped before parsing.
/// - Anything that does not yield a finite number (empty, alphabetic,
///   `"nan"`, `"inf"`, overflowing exponents like `"1e999"`) coerces to
///   `0.0`. This is the pipeline's data-cleaning policy, not an error
///   path. The output is always finite.
pub fn coerce_number(cell: &Cell) -> f64 {
    match cell {
        Cell::Number(n) if n.is_finite() => *n,
        Cell::Number(_) | Cell::Empty => 0.0,
        Cell::Text(s) => {
            let cleaned = s.trim().replace(',', "");
            match cleaned.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => 0.0,
            }
        }
    }
}

/// Round to `decimals` fractional digits (report rate fields use 2, the
/// daily-clicks average uses 1).
pub fn round_to(n: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (n * factor).round() / factor
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values, used for
    // counts and totals in console messages (e.g., `12,340 impressions`).
    n.to_formatted_string(&Locale::en)
}
