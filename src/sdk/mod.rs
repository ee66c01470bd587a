//! Wallet backend SDK
//!
//! HTTP access to the XertiQ backend: batch upload, stream token exchange,
//! the progress event stream and the credit/payment endpoints. The
//! connection driver that feeds a [`crate::core::batch::SessionSink`] lives
//! here too, so `core` stays free of network I/O.

pub mod client;

pub use client::{CreditBalance, PaymentStatus, UploadResponse, WalletClient};

/// SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
