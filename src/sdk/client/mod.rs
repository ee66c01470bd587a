//! Wallet client module
//!
//! A single [`WalletClient`] wraps one `reqwest` client. Endpoints are split
//! by concern: batch upload and progress streaming, and credits/payments.

mod batch;
mod client;
mod payments;
mod types;


pub use client::WalletClient;
pub use types::{CreditBalance, PaymentStatus, StreamTokenResponse, UploadResponse};
