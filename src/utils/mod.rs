//! Utility modules for the wallet client
//!
//! - **error**: the crate-wide error type
//! - **logging**: subscriber setup for the binary
//! - **net**: polling helpers
//! - **sys**: cancellation primitives

pub mod error;
pub mod logging;
pub mod net;
pub mod sys;

pub use error::{Result, WalletError};
pub use net::{PollOutcome, PollPolicy};
pub use sys::CancelFlag;
