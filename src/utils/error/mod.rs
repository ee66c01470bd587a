//! Error handling for the wallet client
//!
//! This module defines the error type shared by every layer of the crate.

#![allow(missing_docs)]

mod helpers;
mod types;

pub use types::{Result, WalletError};
