//! unitlens stdio server
//!
//! Speaks newline-delimited JSON-RPC 2.0 on stdin/stdout. The editor side
//! forwards cursor moves, edits and view switches as `hints/refresh`, asks
//! for tooltips with `hints/hover`, and renders the `hints/decorations`
//! notifications it gets back.
//!
//! Environment:
//! - `UNITLENS_SETTINGS`: JSON file with the initial settings snapshot
//! - `UNITLENS_LOG` / `RUST_LOG`: log filter (stderr)

mod config;
mod error;
mod logging;
mod overlay;
mod protocol;
mod server;

use server::{Server, SERVER_VERSION};
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing::{error, info, warn};
use unitlens::UnitLens;
use unitlens_core::Settings;

fn main() -> ExitCode {
    if let Err(e) = logging::init() {
        eprintln!("{}", e);
    }

    info!(version = SERVER_VERSION, "unitlens server started");
    info!(
        stdin_terminal = io::stdin().is_terminal(),
        stdout_terminal = io::stdout().is_terminal(),
        "stdio"
    );

    let settings = match config::load_initial_settings() {
        Ok(settings) => settings,
        Err(e) => {
            warn!(error = %e, "ignoring initial settings");
            Settings::new()
        }
    };

    let lens = UnitLens::with_standard_converters();
    for meta in lens.registry().list() {
        info!(id = meta.id, namespace = meta.namespace, "converter registered");
    }
    info!(languages = ?lens.gate().languages(), "document types");

    let stdin = io::stdin();
    let reader = io::BufReader::new(stdin.lock());
    let mut server = Server::new(lens, settings, io::stdout());

    match server.run(reader) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server stopped");
            ExitCode::FAILURE
        }
    }
}
