//! rem → px

use crate::helpers::{self, DEFAULTS, NAMESPACE};
use regex::Regex;
use std::sync::OnceLock;
use unitlens_plugin::prelude::*;

pub struct RemToPx;

static REM_TO_PX_EXAMPLES: [&str; 2] = [
    "\"1rem\" → 16px",
    "\"1.25rem\" → 20px",
];

impl ConverterPlugin for RemToPx {
    fn meta(&self) -> ConverterMeta {
        ConverterMeta {
            id: "remToPx",
            name: "REM to PX",
            description: "Show quoted rem lengths in px, multiplying by the base font size",
            from_unit: "rem",
            to_unit: "px",
            namespace: NAMESPACE,
            defaults: &DEFAULTS,
            examples: &REM_TO_PX_EXAMPLES,
        }
    }

    fn pattern(&self) -> &Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| helpers::quoted_literal("rem"))
    }

    fn convert(&self, _matched: &str, extracted: &str, ctx: &ConvertContext) -> String {
        helpers::scale(extracted, ctx, "px", |rem, base| rem * base)
    }

    fn format_hint(&self, _matched: &str, converted: &str) -> String {
        helpers::hint(converted)
    }

    fn format_tooltip(&self, matched: &str, converted: &str, ctx: &ConvertContext) -> RichText {
        helpers::tooltip(matched, converted, ctx)
    }
}
