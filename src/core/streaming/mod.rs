//! Batch progress event stream
//!
//! Decodes the Server-Sent Events body of a progress connection into typed
//! [`ProgressEvent`]s.

mod decoder;
mod events;
mod stream;


pub use decoder::{SseDecoder, SseFrame};
pub use events::ProgressEvent;
pub use stream::ProgressEventStream;
