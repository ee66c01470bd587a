//! Local wallet state
//!
//! The wallet state (signed-in user, wallet address, credit balance and
//! auth token) is owned by a single [`WalletStore`] and persisted as JSON.

mod store;


pub use store::{UserProfile, WalletState, WalletStore};
