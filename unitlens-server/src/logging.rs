//! Logging to stderr; stdout carries the protocol.
//!
//! Filter priority: `UNITLENS_LOG` > `RUST_LOG` > `info`.

use crate::error::ServerError;
use std::env;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "UNITLENS_LOG";
const DEFAULT_FILTER: &str = "info";

fn create_filter() -> EnvFilter {
    let directives = env::var(LOG_ENV)
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(create_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
        .map_err(|e| ServerError::Logging(e.to_string()))
}
