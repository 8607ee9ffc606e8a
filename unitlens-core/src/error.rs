//! Structured errors for host consumption
//!
//! The conversion pipeline itself never fails: malformed input degrades to
//! sentinel output. These errors only describe problems at the host bridge
//! (bad requests, unknown converters, unreadable settings) and are shaped so
//! they can be handed straight back to an editor as JSON.

use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const METHOD_NOT_FOUND: &str = "METHOD_NOT_FOUND";
    pub const INVALID_PARAMS: &str = "INVALID_PARAMS";
    pub const UNKNOWN_CONVERTER: &str = "UNKNOWN_CONVERTER";
    pub const SETTINGS_ERROR: &str = "SETTINGS_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Structured error returned across the host boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitLensError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl UnitLensError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    // ========== Common Error Constructors ==========

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
            .with_suggestion("Send one JSON-RPC message per line")
    }

    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self::new(codes::INVALID_REQUEST, format!("Invalid request: {}", details.into()))
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(codes::METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn missing_param(name: &str) -> Self {
        Self::new(codes::INVALID_PARAMS, format!("Missing {} parameter", name))
    }

    pub fn invalid_param(name: &str, details: impl Into<String>) -> Self {
        Self::new(codes::INVALID_PARAMS, format!("Invalid {} parameter: {}", name, details.into()))
    }

    pub fn unknown_converter(id: &str) -> Self {
        Self::new(codes::UNKNOWN_CONVERTER, format!("Unknown converter: {}", id))
            .with_suggestion("Use converters/list to see registered converters")
    }

    pub fn settings_error(details: impl Into<String>) -> Self {
        Self::new(codes::SETTINGS_ERROR, format!("Settings error: {}", details.into()))
            .with_suggestion("Settings must be a JSON object keyed by namespace")
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
    }
}

impl std::fmt::Display for UnitLensError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for UnitLensError {}
