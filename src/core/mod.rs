//! Core functionality for the wallet client
//!
//! This module contains the business logic and data structures: CSV/PDF
//! reconciliation, the progress event wire format, the batch progress state
//! machine and the local wallet store. Nothing here performs HTTP I/O.

pub mod batch;
pub mod reconcile;
pub mod streaming;
pub mod wallet;
