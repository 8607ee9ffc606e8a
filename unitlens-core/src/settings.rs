//! Settings snapshot and namespaced configuration lookup
//!
//! A snapshot is a JSON object. A namespace such as
//! `unitConversionHints.remToPx` can be supplied three ways, merged in this
//! order (later wins):
//!
//! 1. nested objects: `{"unitConversionHints": {"remToPx": {"baseFontSize": 16}}}`
//! 2. a flat namespace key: `{"unitConversionHints.remToPx": {"baseFontSize": 16}}`
//! 3. flat setting keys: `{"unitConversionHints.remToPx.baseFontSize": 16}`

use crate::number::parse_or_nan;
use crate::UnitLensError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Supplies one namespace's key/value mapping, freshly per call
pub trait ConfigSource {
    fn namespace(&self, name: &str) -> ConfigSection;
}

/// Key/value mapping of a single namespace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigSection {
    values: Map<String, JsonValue>,
}

impl ConfigSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    /// Numeric view of a setting.
    ///
    /// `None` when the key is absent or null. Numeric strings are coerced;
    /// any other present value is not a number and yields NaN rather than
    /// an error, so a broken setting degrades the display instead of the host.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).map(|value| match value {
            JsonValue::Number(n) => n.as_f64().unwrap_or(f64::NAN),
            JsonValue::String(s) => parse_or_nan(s),
            _ => f64::NAN,
        })
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(JsonValue::as_bool)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn merge(&mut self, other: &Map<String, JsonValue>) {
        for (k, v) in other {
            self.values.insert(k.clone(), v.clone());
        }
    }
}

/// Read-only settings snapshot keyed by namespace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    root: Map<String, JsonValue>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(value: JsonValue) -> Result<Self, UnitLensError> {
        match value {
            JsonValue::Object(root) => Ok(Self { root }),
            JsonValue::Null => Ok(Self::new()),
            other => Err(UnitLensError::settings_error(format!(
                "expected an object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, UnitLensError> {
        let value: JsonValue = serde_json::from_str(text)
            .map_err(|e| UnitLensError::settings_error(e.to_string()))?;
        Self::from_json(value)
    }

    /// Builder: set one key inside a namespace
    pub fn with(mut self, namespace: &str, key: &str, value: impl Into<JsonValue>) -> Self {
        let entry = self
            .root
            .entry(namespace.to_string())
            .or_insert_with(|| JsonValue::Object(Map::new()));
        if !entry.is_object() {
            *entry = JsonValue::Object(Map::new());
        }
        if let JsonValue::Object(map) = entry {
            map.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn section(&self, namespace: &str) -> ConfigSection {
        let mut section = ConfigSection::new();

        if let Some(JsonValue::Object(nested)) = self.nested(namespace) {
            section.merge(nested);
        }

        if let Some(JsonValue::Object(flat)) = self.root.get(namespace) {
            section.merge(flat);
        }

        let prefix = format!("{}.", namespace);
        for (key, value) in &self.root {
            if let Some(rest) = key.strip_prefix(&prefix) {
                if !rest.is_empty() && !rest.contains('.') {
                    section.values.insert(rest.to_string(), value.clone());
                }
            }
        }

        section
    }

    /// Walk `a.b.c` through nested objects. Single-segment names are left
    /// to the flat lookup so they are not merged twice.
    fn nested(&self, namespace: &str) -> Option<&JsonValue> {
        let mut parts = namespace.split('.');
        let first = parts.next()?;
        let mut rest = parts.peekable();
        rest.peek()?;

        let mut current = self.root.get(first)?;
        for part in rest {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }
}

impl ConfigSource for Settings {
    fn namespace(&self, name: &str) -> ConfigSection {
        self.section(name)
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
