//! unitlens Plugin System
//!
//! Converters are plugins: a recognition pattern, a pure transform and two
//! formatters behind one trait. New unit pairs are added by registering a
//! new implementor; nothing else changes.

mod context;
mod registry;
mod traits;

pub use context::ConvertContext;
pub use registry::ConverterRegistry;
pub use traits::{ConfigDefault, ConverterMeta, ConverterPlugin, DefaultValue};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        ConfigDefault, ConvertContext, ConverterMeta, ConverterPlugin, ConverterRegistry,
        DefaultValue,
    };
    pub use unitlens_core::prelude::*;
}
