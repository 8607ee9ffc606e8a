//! unitlens CSS - px and rem converters
//!
//! Both directions read `baseFontSize` from the shared
//! `unitConversionHints.remToPx` section, so a single setting keeps them
//! consistent.
//!
//! Converters:
//! - `remToPx`: `"1.25rem"` → `20px`
//! - `pxToRem`: `"20px"` → `1.25rem`

mod helpers;
mod px_to_rem;
mod rem_to_px;

pub use helpers::{BASE_FONT_SIZE, DEFAULT_BASE_FONT_SIZE, NAMESPACE};
pub use px_to_rem::PxToRem;
pub use rem_to_px::RemToPx;

use unitlens_plugin::ConverterRegistry;

/// Load the px/rem converters into registry
pub fn load_css_units(registry: ConverterRegistry) -> ConverterRegistry {
    registry
        .with_converter(RemToPx)
        .with_converter(PxToRem)
}

/// Registry with every built-in converter
pub fn standard_registry() -> ConverterRegistry {
    load_css_units(ConverterRegistry::new())
}
