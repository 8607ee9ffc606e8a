//! Document scanner: every recognized literal, in document order

use std::fmt;
use std::sync::Arc;
use unitlens_core::{Span, TextSource};
use unitlens_plugin::ConverterPlugin;

/// One recognized literal. Built per scan and dropped once the current
/// hint or tooltip is rendered.
#[derive(Clone)]
pub struct Occurrence {
    pub span: Span,
    pub converter: Arc<dyn ConverterPlugin>,
    /// Full matched text, quotes included
    pub matched_text: String,
    /// Numeric part handed to the converter
    pub extracted_value: String,
}

impl Occurrence {
    pub fn converter_id(&self) -> &'static str {
        self.converter.meta().id
    }
}

impl fmt::Debug for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Occurrence")
            .field("span", &self.span)
            .field("converter", &self.converter_id())
            .field("matched_text", &self.matched_text)
            .field("extracted_value", &self.extracted_value)
            .finish()
    }
}

/// Scan `source` with each converter in order, then sort by start position.
///
/// Each converter's pass starts from offset 0 with a fresh iterator, so no
/// match state carries between converters or calls. The sort is stable:
/// converters matching at the same start keep registry order, which is what
/// first-match-wins consumers rely on. Overlaps are not deduplicated.
pub fn find_matches(source: &dyn TextSource, converters: &[Arc<dyn ConverterPlugin>]) -> Vec<Occurrence> {
    let text = source.text();
    let mut occurrences = Vec::new();
    if text.is_empty() {
        return occurrences;
    }

    for converter in converters {
        // the regex iterator steps past empty matches, so this terminates
        for caps in converter.pattern().captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.is_empty() {
                continue;
            }

            let extracted = caps
                .get(1)
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty())
                .unwrap_or(whole.as_str());

            occurrences.push(Occurrence {
                span: Span::new(
                    source.offset_to_position(whole.start()),
                    source.offset_to_position(whole.end()),
                ),
                converter: Arc::clone(converter),
                matched_text: whole.as_str().to_string(),
                extracted_value: extracted.to_string(),
            });
        }
    }

    occurrences.sort_by_key(|o| o.span.start);
    occurrences
}
