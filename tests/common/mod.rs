//! Common test utilities for xertiq-wallet
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::{MockBackend, fixtures::StateFactory};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let backend = MockBackend::start().await;
//!     let state = StateFactory::processing(3, 1);
//!     // ...
//! }
//! ```

pub mod backend;

// Re-export commonly used items
pub use backend::{CREDENTIAL, MockBackend};
pub use fixtures::{RecordingObserver, SseBody, StateFactory};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
