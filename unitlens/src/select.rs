//! Presentation selector: which conversions are shown, and where

use crate::Occurrence;
use serde::Serialize;
use unitlens_core::{ConfigSource, Position, RichText, Span};
use unitlens_plugin::ConvertContext;

const COMMA: u16 = b',' as u16;
const SPACE: u16 = b' ' as u16;
const TAB: u16 = b'\t' as u16;

/// Trailing annotation for one literal on the active line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineHint {
    pub position: Position,
    pub text: String,
    pub converter: &'static str,
}

/// Tooltip content anchored to the literal it describes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub contents: RichText,
    pub range: Span,
    pub converter: &'static str,
}

/// One hint per occurrence starting on `line`, in occurrence order.
///
/// Overlapping converters each get their own hint. An empty result means the
/// host should clear whatever it showed for this view before.
pub fn active_line_hints(
    occurrences: &[Occurrence],
    line: u32,
    line_text: &str,
    config: &dyn ConfigSource,
) -> Vec<InlineHint> {
    occurrences
        .iter()
        .filter(|o| o.span.start.line == line)
        .map(|o| {
            let meta = o.converter.meta();
            let ctx = ConvertContext::resolve(&meta, config);
            let converted = o.converter.convert(&o.matched_text, &o.extracted_value, &ctx);
            let text = o.converter.format_hint(&o.matched_text, &converted);

            InlineHint {
                position: Position::new(line, insertion_column(line_text, o.span.end.character)),
                text,
                converter: meta.id,
            }
        })
        .collect()
}

/// Column at which a hint for a literal ending at `end_column` is inserted.
///
/// Skips spaces and tabs after the literal; a comma moves the hint just past
/// it, anything else leaves it at the literal's end. Columns are UTF-16 units.
pub fn insertion_column(line_text: &str, end_column: u32) -> u32 {
    for (i, unit) in line_text.encode_utf16().enumerate().skip(end_column as usize) {
        match unit {
            COMMA => return i as u32 + 1,
            SPACE | TAB => continue,
            _ => break,
        }
    }
    end_column
}

/// Tooltip for the first occurrence whose span contains `position`
pub fn tooltip_at(
    occurrences: &[Occurrence],
    position: Position,
    config: &dyn ConfigSource,
) -> Option<Tooltip> {
    let o = occurrences.iter().find(|o| o.span.contains(position))?;

    let meta = o.converter.meta();
    let ctx = ConvertContext::resolve(&meta, config);
    let converted = o.converter.convert(&o.matched_text, &o.extracted_value, &ctx);

    Some(Tooltip {
        contents: o.converter.format_tooltip(&o.matched_text, &converted, &ctx),
        range: o.span,
        converter: meta.id,
    })
}
