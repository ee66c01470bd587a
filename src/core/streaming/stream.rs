//! Byte stream to progress event adapter

use super::decoder::SseDecoder;
use super::events::ProgressEvent;
use crate::utils::error::{Result, WalletError};
use futures::{Stream, StreamExt};
use pin_project_lite::pin_project;
use std::pin::Pin;
use tracing::debug;

pin_project! {
    /// Stream of progress events read from an SSE body.
    ///
    /// Items are `Err(WalletError::Parsing)` for a malformed frame, after
    /// which reading continues, or `Err(WalletError::Network)` for a
    /// transport failure, after which the stream ends.
    pub struct ProgressEventStream {
        #[pin]
        inner: Pin<Box<dyn Stream<Item = Result<ProgressEvent>> + Send>>,
    }
}

impl ProgressEventStream {
    /// Create stream from a progress response
    pub fn from_response(response: reqwest::Response) -> Self {
        Self::from_byte_stream(response.bytes_stream())
    }

    /// Create stream from any chunked byte source
    pub fn from_byte_stream<S, B, E>(bytes: S) -> Self
    where
        S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
        B: AsRef<[u8]> + Send + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        let stream = async_stream::stream! {
            let mut decoder = SseDecoder::new();
            let mut bytes = Box::pin(bytes);

            while let Some(chunk_result) = bytes.next().await {
                match chunk_result {
                    Ok(chunk) => {
                        for frame in decoder.push(chunk.as_ref()) {
                            match frame {
                                Ok(frame) if frame.data.trim().is_empty() => {}
                                Ok(frame) => yield ProgressEvent::from_json(&frame.data),
                                Err(e) => yield Err(e),
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(WalletError::network(format!("Stream error: {}", e)));
                        break;
                    }
                }
            }

            if decoder.has_pending() {
                debug!("Discarding incomplete SSE frame at end of stream");
            }
        };

        Self {
            inner: Box::pin(stream),
        }
    }
}

impl Stream for ProgressEventStream {
    type Item = Result<ProgressEvent>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        let this = self.project();
        this.inner.poll_next(cx)
    }
}
