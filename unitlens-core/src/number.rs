//! Numeric helpers for converted values
//!
//! Conversions run on plain `f64`. Nothing here panics: parse failures and
//! divisions by zero surface as NaN or infinity, and the formatter renders
//! those as literal sentinel text (`NaN`, `Infinity`, `-Infinity`).

use thiserror::Error;

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),
}

/// Sentinel text for a value that is not a number
pub const NAN_TEXT: &str = "NaN";
/// Sentinel text for positive infinity
pub const INFINITY_TEXT: &str = "Infinity";
/// Sentinel text for negative infinity
pub const NEG_INFINITY_TEXT: &str = "-Infinity";

/// Parse a decimal literal such as `"12"`, `"12.5"` or `"12."`.
///
/// Spelled-out forms (`inf`, `infinity`, `nan`) and anything that overflows
/// to a non-finite value are rejected.
pub fn parse_number(s: &str) -> Result<f64, NumberError> {
    let trimmed = s.trim();
    let is_decimal = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if trimmed.is_empty() || !is_decimal {
        return Err(NumberError::ParseError(s.to_string()));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| NumberError::ParseError(s.to_string()))
}

/// Parse a decimal literal, yielding NaN when it is malformed
pub fn parse_or_nan(s: &str) -> f64 {
    parse_number(s).unwrap_or(f64::NAN)
}

/// Round half-up to `places` decimal places: `round(value * 10^places) / 10^places`
/// where ties go toward positive infinity. Non-finite input passes through.
pub fn round_half_up(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(places as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    (scaled + 0.5).floor() / scale
}

/// Render a value the way an editor would print it: shortest round-trip
/// digits, no trailing `.0`, exponent form only for very large or very
/// small magnitudes, and sentinel text for non-finite values.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return NAN_TEXT.to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { INFINITY_TEXT } else { NEG_INFINITY_TEXT }.to_string();
    }
    if value == 0.0 {
        // also folds -0 into 0
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", value);
        // `1e21` → `1e+21`
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }

    format!("{}", value)
}
