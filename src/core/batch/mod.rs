//! Batch progress tracking
//!
//! - **types**: the batch state carried by progress events
//! - **session**: the per-session lifecycle state machine
//! - **tracker**: single-owner publication of the active session
//! - **view**: terminal rendering

mod session;
mod tracker;
mod types;
mod view;


pub use session::{ProgressSession, SessionPhase, Termination, Transition};
pub use tracker::{ProgressObserver, ProgressSnapshot, ProgressTracker, SessionSink};
pub use types::{BatchProgressState, BatchStatus, DocumentOutcome, DocumentStatus};
pub use view::ProgressView;
