//! px → rem

use crate::helpers::{self, DEFAULTS, NAMESPACE};
use regex::Regex;
use std::sync::OnceLock;
use unitlens_plugin::prelude::*;

pub struct PxToRem;

static PX_TO_REM_EXAMPLES: [&str; 3] = [
    "\"16px\" → 1rem",
    "\"24px\" → 1.5rem",
    "\"10px\" → 0.63rem",
];

impl ConverterPlugin for PxToRem {
    fn meta(&self) -> ConverterMeta {
        ConverterMeta {
            id: "pxToRem",
            name: "PX to REM",
            description: "Show quoted px lengths in rem, dividing by the base font size",
            from_unit: "px",
            to_unit: "rem",
            namespace: NAMESPACE,
            defaults: &DEFAULTS,
            examples: &PX_TO_REM_EXAMPLES,
        }
    }

    fn pattern(&self) -> &Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| helpers::quoted_literal("px"))
    }

    fn convert(&self, _matched: &str, extracted: &str, ctx: &ConvertContext) -> String {
        helpers::scale(extracted, ctx, "rem", |px, base| px / base)
    }

    fn format_hint(&self, _matched: &str, converted: &str) -> String {
        helpers::hint(converted)
    }

    fn format_tooltip(&self, matched: &str, converted: &str, ctx: &ConvertContext) -> RichText {
        helpers::tooltip(matched, converted, ctx)
    }
}
