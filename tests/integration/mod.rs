//! Integration tests for xertiq-wallet
//!
//! These tests exercise the public API end to end, with HTTP served by a
//! local `wiremock` server and inputs written to temporary directories.

pub mod batch_upload_tests;
pub mod payments_tests;
pub mod progress_stream_tests;
pub mod reconcile_tests;
