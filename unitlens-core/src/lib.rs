//! unitlens Core - Fundamental types
//!
//! This crate provides the core types used throughout unitlens:
//! - `Position`, `Span`, `LineIndex`: document coordinates
//! - number helpers: parsing, half-up rounding, sentinel-aware formatting
//! - `RichText`: tooltip content
//! - `Settings`, `ConfigSection`: namespaced configuration snapshot
//! - `UnitLensError`: structured errors for the host boundary

mod error;
mod number;
mod position;
mod rich_text;
mod settings;

pub use error::{codes, UnitLensError};
pub use number::{
    format_number, parse_number, parse_or_nan, round_half_up, NumberError, INFINITY_TEXT,
    NAN_TEXT, NEG_INFINITY_TEXT,
};
pub use position::{LineIndex, Position, Span, TextSource};
pub use rich_text::{escape_markdown, RichText, Segment};
pub use settings::{ConfigSection, ConfigSource, Settings};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ConfigSection, ConfigSource, LineIndex, Position, RichText, Settings, Span, TextSource,
        UnitLensError,
    };
    pub use crate::error::codes;
}
