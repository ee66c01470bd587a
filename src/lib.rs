//! # XertiQ Wallet
//!
//! Client core for the XertiQ Wallet: prepare a batch of PDF certificates
//! with their CSV metadata, upload it, and follow its processing live over
//! a server-sent event stream.
//!
//! ## Features
//!
//! - **Reconciliation**: match PDF file names against CSV metadata rows
//!   before anything is uploaded
//! - **Live progress**: a cancellable, single-owner session state machine
//!   fed by the backend's progress stream
//! - **Credits**: balance lookups and checkout payment polling
//! - **Local state**: an explicit, file-backed wallet store
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xertiq_wallet::{ProgressTracker, WalletClient, WalletConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WalletConfig::from_env()?;
//!     let client = WalletClient::new(config.api.clone())?;
//!
//!     let mut tracker = ProgressTracker::new();
//!     client.track_batch(&mut tracker, "batch-session-id", config.progress.idle_timeout());
//!
//!     if let Some(snapshot) = tracker.wait_terminated().await {
//!         println!("{:?}", snapshot.termination);
//!     }
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod sdk;
pub mod utils;

// Re-export main types
pub use config::{ConfigBuilder, WalletConfig};
pub use utils::error::{Result, WalletError};

pub use core::batch::{
    BatchProgressState, BatchStatus, ProgressObserver, ProgressSnapshot, ProgressTracker,
    ProgressView, SessionPhase, Termination,
};
pub use core::reconcile::{ReconciliationResult, check_submission, reconcile};
pub use core::streaming::ProgressEvent;
pub use core::wallet::{WalletState, WalletStore};
pub use sdk::WalletClient;

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Commit the binary was built from, or `unknown` outside a checkout
pub const GIT_HASH: &str = env!("GIT_HASH");
/// Version string printed by `xertiq --version`
pub const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");
