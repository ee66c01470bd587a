//! Incremental SSE frame decoder

use crate::utils::error::{Result, WalletError};
use tracing::{trace, warn};

/// One dispatched SSE event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseFrame {
    /// Value of the `event:` field, if any
    pub event: Option<String>,
    /// `data:` lines joined with `\n`
    pub data: String,
    /// Value of the `id:` field, if any
    pub id: Option<String>,
}

/// Longest line accepted from the server
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Incremental decoder for a `text/event-stream` body.
///
/// Bytes may be split anywhere, including inside a UTF-8 sequence or a
/// `\r\n` pair. A frame is dispatched on the blank line that terminates it.
/// A line longer than the limit is reported once as a parsing error and
/// skipped up to its newline, together with the frame it belonged to.
#[derive(Debug)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    /// Bytes of `buffer` already known to hold no newline
    scanned: usize,
    /// Inside an overlong line that is being skipped
    discarding: bool,
    max_line: usize,
    event: Option<String>,
    data: Vec<String>,
    id: Option<String>,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::with_line_limit(MAX_LINE_BYTES)
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_limit(max_line: usize) -> Self {
        Self {
            buffer: Vec::new(),
            scanned: 0,
            discarding: false,
            max_line,
            event: None,
            data: Vec::new(),
            id: None,
        }
    }

    /// Feed a chunk and return every frame it completes, in order.
    ///
    /// An overlong line yields `Err(WalletError::Parsing)` in place of the
    /// frame it would have been part of.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<SseFrame>> {
        self.buffer.extend_from_slice(chunk);

        let mut out = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.buffer[self.scanned..].iter().position(|b| *b == b'\n') {
            let end = self.scanned + offset;
            self.scanned = end + 1;

            if std::mem::take(&mut self.discarding) {
                start = self.scanned;
                continue;
            }
            if end - start > self.max_line {
                start = self.scanned;
                out.push(Err(self.overflow()));
                continue;
            }

            let mut line = &self.buffer[start..end];
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }
            let line = String::from_utf8_lossy(line).into_owned();
            start = self.scanned;

            if let Some(frame) = self.process_line(&line) {
                out.push(Ok(frame));
            }
        }

        self.buffer.drain(..start);
        if self.discarding {
            self.buffer.clear();
        } else if self.buffer.len() > self.max_line {
            self.buffer.clear();
            out.push(Err(self.overflow()));
            self.discarding = true;
        }
        self.scanned = self.buffer.len();
        out
    }

    /// Whether a partially received frame is pending
    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty() || !self.data.is_empty() || self.discarding
    }

    /// Drop the frame in progress and build the error for an overlong line
    fn overflow(&mut self) -> WalletError {
        warn!("Skipping SSE line longer than {} bytes", self.max_line);
        self.event = None;
        self.data.clear();
        WalletError::parsing(format!("SSE line exceeds {} bytes", self.max_line))
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }

        if line.starts_with(':') {
            trace!("SSE comment: {}", line);
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "id" => self.id = Some(value.to_string()),
            // reconnection delay is not used: the client never reconnects
            "retry" => {}
            other => trace!("Ignoring unknown SSE field: {}", other),
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }

        Some(SseFrame {
            event,
            data: std::mem::take(&mut self.data).join("\n"),
            id: self.id.clone(),
        })
    }
}
