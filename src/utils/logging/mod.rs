//! Logging setup
//!
//! Installs the global `tracing` subscriber for the command-line front end.
//! Library code only emits events; it never installs a subscriber itself.

use crate::utils::error::{Result, WalletError};
use tracing_subscriber::EnvFilter;

/// Map a `-v` count to a default filter directive
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn,xertiq_wallet=info",
        1 => "info,xertiq_wallet=debug",
        _ => "debug,xertiq_wallet=trace",
    }
}

/// Initialize logging. `RUST_LOG` takes precedence over `verbosity`.
pub fn init_logging(verbosity: u8, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| WalletError::config(format!("Failed to initialize logging: {}", e)))
}
