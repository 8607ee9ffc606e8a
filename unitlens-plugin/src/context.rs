//! Conversion context: a converter's resolved configuration

use crate::{ConfigDefault, ConverterMeta, DefaultValue};
use unitlens_core::{ConfigSection, ConfigSource};

/// Configuration passed to a converter for one call.
///
/// Built fresh from the host's snapshot each time, so changed settings apply
/// on the next invocation without any invalidation.
#[derive(Debug, Clone)]
pub struct ConvertContext {
    pub namespace: &'static str,
    pub section: ConfigSection,
    defaults: &'static [ConfigDefault],
}

impl ConvertContext {
    pub fn new(meta: &ConverterMeta, section: ConfigSection) -> Self {
        Self {
            namespace: meta.namespace,
            section,
            defaults: meta.defaults,
        }
    }

    /// Resolve `meta.namespace` against the source
    pub fn resolve(meta: &ConverterMeta, source: &dyn ConfigSource) -> Self {
        Self::new(meta, source.namespace(meta.namespace))
    }

    /// Context with nothing but the declared defaults
    pub fn defaults_only(meta: &ConverterMeta) -> Self {
        Self::new(meta, ConfigSection::new())
    }

    pub fn with_section(mut self, section: ConfigSection) -> Self {
        self.section = section;
        self
    }

    /// Setting value, falling back to the declared default; NaN when
    /// neither exists.
    pub fn number(&self, key: &str) -> f64 {
        self.section
            .number(key)
            .or_else(|| match self.default_for(key) {
                Some(DefaultValue::Number(n)) => Some(n),
                _ => None,
            })
            .unwrap_or(f64::NAN)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.section.bool(key).or_else(|| match self.default_for(key) {
            Some(DefaultValue::Bool(b)) => Some(b),
            _ => None,
        })
    }

    fn default_for(&self, key: &str) -> Option<DefaultValue> {
        self.defaults.iter().find(|d| d.key == key).map(|d| d.value)
    }
}
