//! Plugin traits

use crate::ConvertContext;
use regex::Regex;
use serde::Serialize;
use unitlens_core::RichText;

/// Default value of a converter setting
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Number(f64),
    Bool(bool),
}

/// Metadata about one configurable setting
#[derive(Debug, Clone, Serialize)]
pub struct ConfigDefault {
    pub key: &'static str,
    pub value: DefaultValue,
    pub description: &'static str,
}

impl ConfigDefault {
    pub const fn number(key: &'static str, value: f64, description: &'static str) -> Self {
        Self { key, value: DefaultValue::Number(value), description }
    }

    pub const fn bool(key: &'static str, value: bool, description: &'static str) -> Self {
        Self { key, value: DefaultValue::Bool(value), description }
    }
}

/// Metadata for a converter plugin
#[derive(Debug, Clone, Serialize)]
pub struct ConverterMeta {
    /// Stable identifier, unique within a registry
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Unit suffix recognized in the document
    pub from_unit: &'static str,
    /// Unit suffix of the converted value
    pub to_unit: &'static str,
    /// Configuration section this converter reads. Converters that invert
    /// the same ratio share one.
    pub namespace: &'static str,
    pub defaults: &'static [ConfigDefault],
    pub examples: &'static [&'static str],
}

/// A unit-pair converter.
///
/// The first capture group of [`pattern`](ConverterPlugin::pattern) is the
/// numeric text handed to [`convert`](ConverterPlugin::convert) as
/// `extracted`; patterns without groups hand over the whole match.
/// Implementations must not panic for any text the pattern accepts.
pub trait ConverterPlugin: Send + Sync {
    fn meta(&self) -> ConverterMeta;
    fn pattern(&self) -> &Regex;
    fn convert(&self, matched: &str, extracted: &str, ctx: &ConvertContext) -> String;
    fn format_hint(&self, matched: &str, converted: &str) -> String;
    fn format_tooltip(&self, matched: &str, converted: &str, ctx: &ConvertContext) -> RichText;
}
