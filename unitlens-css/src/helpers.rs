//! Shared pieces of the px/rem converters

use regex::Regex;
use unitlens_core::{format_number, parse_or_nan, round_half_up, RichText};
use unitlens_plugin::{ConfigDefault, ConvertContext};

/// Section both directions read, so one ratio drives both
pub const NAMESPACE: &str = "unitConversionHints.remToPx";

pub const BASE_FONT_SIZE: &str = "baseFontSize";

pub const DEFAULT_BASE_FONT_SIZE: f64 = 16.0;

pub static DEFAULTS: [ConfigDefault; 1] = [ConfigDefault::number(
    BASE_FONT_SIZE,
    DEFAULT_BASE_FONT_SIZE,
    "Root font size in px used to convert between px and rem",
)];

/// Quoted numeric literal with the given unit suffix, e.g. `"12.5px"`.
/// Group 1 is the numeric part.
pub fn quoted_literal(unit: &str) -> Regex {
    Regex::new(&format!(r#""([0-9]+\.?[0-9]*){}""#, regex::escape(unit)))
        .expect("literal pattern is valid")
}

pub fn base_font_size(ctx: &ConvertContext) -> f64 {
    ctx.number(BASE_FONT_SIZE)
}

/// Apply `op` to the extracted number and the base, round to two places
/// and append the unit. Bad input flows through as NaN or infinity.
pub fn scale(extracted: &str, ctx: &ConvertContext, unit: &str, op: fn(f64, f64) -> f64) -> String {
    let value = parse_or_nan(extracted);
    let result = round_half_up(op(value, base_font_size(ctx)), 2);
    format!("{}{}", format_number(result), unit)
}

pub fn hint(converted: &str) -> String {
    format!(" // {}", converted)
}

pub fn tooltip(matched: &str, converted: &str, ctx: &ConvertContext) -> RichText {
    let literal = matched.replace('"', "");
    RichText::new()
        .append_markdown(format!("**{}** = **{}**", literal, converted))
        .append_text(format!(
            "\n\n(Base font size: {}px)",
            format_number(base_font_size(ctx))
        ))
}
