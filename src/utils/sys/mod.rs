//! System utilities
//!
//! Cancellation primitives shared by long-running client operations.

pub mod cancel;

pub use cancel::CancelFlag;
