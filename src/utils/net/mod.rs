//! Network utilities
//!
//! Polling helpers used by the wallet client for balance and payment checks.

pub mod poll;

pub use poll::{PollOutcome, PollPolicy, poll_until};
