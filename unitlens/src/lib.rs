//! unitlens - px/rem conversion hints for JSON-like documents
//!
//! Pure functions over one document's text: scan for literals, then pick
//! what to show on the active line or under the cursor. No state survives a
//! call except the immutable converter registry; configuration is passed in
//! on every call.

mod gate;
mod scan;
mod select;

pub use gate::{DocumentGate, DocumentHandler, JsonHandler};
pub use scan::{find_matches, Occurrence};
pub use select::{active_line_hints, insertion_column, tooltip_at, InlineHint, Tooltip};

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use unitlens_core::{ConfigSource, LineIndex, Position, RichText, UnitLensError};
use unitlens_plugin::{ConvertContext, ConverterRegistry};

/// Result of converting one bare literal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub converter: &'static str,
    pub matched: String,
    pub converted: String,
    pub hint: String,
    pub tooltip: RichText,
}

/// Main unitlens engine
pub struct UnitLens {
    registry: Arc<ConverterRegistry>,
    gate: DocumentGate,
}

impl UnitLens {
    pub fn new(registry: ConverterRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            gate: DocumentGate::default(),
        }
    }

    pub fn with_standard_converters() -> Self {
        Self::new(unitlens_css::standard_registry())
    }

    pub fn with_gate(mut self, gate: DocumentGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    pub fn gate(&self) -> &DocumentGate {
        &self.gate
    }

    pub fn supports(&self, language_id: &str) -> bool {
        self.gate.allows(language_id)
    }

    pub fn scan(&self, text: &str) -> Vec<Occurrence> {
        let index = LineIndex::new(text);
        let occurrences = find_matches(&index, self.registry.converters());
        debug!(count = occurrences.len(), bytes = text.len(), "scanned document");
        occurrences
    }

    /// Inline hints for `line`. A line past the end of the document has no
    /// hints.
    pub fn active_line_hints(&self, text: &str, line: u32, config: &dyn ConfigSource) -> Vec<InlineHint> {
        let index = LineIndex::new(text);
        let Some(line_text) = index.line_text(line) else {
            debug!(line, lines = index.line_count(), "active line out of range");
            return Vec::new();
        };

        let occurrences = find_matches(&index, self.registry.converters());
        let hints = active_line_hints(&occurrences, line, line_text, config);
        debug!(line, hints = hints.len(), "computed active line hints");
        hints
    }

    pub fn tooltip(&self, text: &str, position: Position, config: &dyn ConfigSource) -> Option<Tooltip> {
        let occurrences = self.scan(text);
        let tooltip = tooltip_at(&occurrences, position, config);
        debug!(
            line = position.line,
            character = position.character,
            hit = tooltip.is_some(),
            "tooltip query"
        );
        tooltip
    }

    /// Convert one literal with a named converter.
    ///
    /// Accepts the literal as it appears in a document (`"16px"`), without
    /// quotes (`16px`) or as a bare number (`16`).
    pub fn convert_literal(
        &self,
        converter_id: &str,
        value: &str,
        config: &dyn ConfigSource,
    ) -> Result<Conversion, UnitLensError> {
        let converter = self.registry.lookup(converter_id)?;
        let meta = converter.meta();
        let pattern = converter.pattern();

        let bare = value.trim().trim_matches('"');
        let candidates = [format!("\"{}\"", bare), format!("\"{}{}\"", bare, meta.from_unit)];

        let caps = candidates
            .iter()
            .find_map(|literal| {
                pattern.captures(literal).filter(|caps| {
                    caps.get(0)
                        .is_some_and(|m| m.start() == 0 && m.end() == literal.len())
                })
            })
            .ok_or_else(|| {
                UnitLensError::invalid_param(
                    "value",
                    format!("'{}' is not a {} literal for {}", value, meta.from_unit, meta.id),
                )
            })?;

        let matched = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let extracted = caps
            .get(1)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(matched);

        let ctx = ConvertContext::resolve(&meta, config);
        let converted = converter.convert(matched, extracted, &ctx);

        Ok(Conversion {
            converter: meta.id,
            matched: matched.to_string(),
            hint: converter.format_hint(matched, &converted),
            tooltip: converter.format_tooltip(matched, &converted, &ctx),
            converted,
        })
    }
}

impl Default for UnitLens {
    fn default() -> Self {
        Self::with_standard_converters()
    }
}
