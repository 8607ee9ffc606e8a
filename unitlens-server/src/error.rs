//! Server-level failures. Request problems are answered as JSON-RPC
//! errors; these are the ones that stop the server or its setup.

use thiserror::Error;
use unitlens_core::UnitLensError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Settings(UnitLensError),

    #[error("Failed to read settings file '{path}': {source}")]
    SettingsFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
