//! Terminal rendering of batch progress

use super::session::Termination;
use super::tracker::ProgressSnapshot;
use super::types::{BatchProgressState, BatchStatus, DocumentStatus};
use std::fmt::Write;
use std::time::Duration;

const BAR_WIDTH: usize = 30;

/// Renders progress snapshots as plain text
#[derive(Debug, Clone)]
pub struct ProgressView {
    auto_dismiss: Duration,
    show_documents: bool,
}

impl ProgressView {
    pub fn new(auto_dismiss: Duration) -> Self {
        Self {
            auto_dismiss,
            show_documents: true,
        }
    }

    pub fn show_documents(mut self, show: bool) -> Self {
        self.show_documents = show;
        self
    }

    /// Delay after which a finished view should dismiss itself.
    ///
    /// Only a completed batch with at least one successful document
    /// dismisses automatically; failures stay on screen.
    pub fn auto_dismiss_delay(&self, state: &BatchProgressState) -> Option<Duration> {
        (state.status == BatchStatus::Completed && state.successful_documents > 0)
            .then_some(self.auto_dismiss)
    }

    /// One-line progress bar
    pub fn progress_line(state: &BatchProgressState) -> String {
        let percent = state.percent_complete() as usize;
        let filled = percent * BAR_WIDTH / 100;
        format!(
            "[{}{}] {:>3}% {}/{} processed ({} ok, {} failed)",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            percent,
            state.processed_documents,
            state.total_documents,
            state.successful_documents,
            state.failed_documents
        )
    }

    /// Full rendering of a snapshot
    pub fn render(&self, snapshot: &ProgressSnapshot) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Batch {} ({})",
            snapshot.session_id,
            if snapshot.live { "live" } else { "connecting" }
        );

        match &snapshot.state {
            Some(state) => {
                let _ = writeln!(out, "{}", Self::progress_line(state));
                if !state.current_message.is_empty() {
                    let _ = writeln!(out, "Step {}: {}", state.current_step, state.current_message);
                }
                if self.show_documents {
                    for doc in &state.documents {
                        let marker = match doc.status {
                            DocumentStatus::Pending => "…",
                            DocumentStatus::Success => "✓",
                            DocumentStatus::Failed => "✗",
                        };
                        let _ = write!(out, "  {} {}", marker, doc.file_name);
                        if let Some(email) = &doc.identity_email {
                            let _ = write!(out, " <{}>", email);
                        }
                        if let Some(message) = &doc.message {
                            let _ = write!(out, ": {}", message);
                        }
                        out.push('\n');
                    }
                }
            }
            None => {
                let _ = writeln!(out, "Waiting for progress...");
            }
        }

        if let Some(banner) = Self::banner(snapshot) {
            let _ = writeln!(out, "{}", banner);
        }

        out
    }

    /// Terminal message, if the session has ended
    pub fn banner(snapshot: &ProgressSnapshot) -> Option<String> {
        match snapshot.termination.as_ref()? {
            Termination::Completed => {
                let state = snapshot.state.as_ref()?;
                Some(match state.status {
                    BatchStatus::Failed => "Batch processing failed".to_string(),
                    _ if state.failed_documents > 0 => format!(
                        "Batch finished: {} issued, {} failed",
                        state.successful_documents, state.failed_documents
                    ),
                    _ => format!(
                        "Batch complete: {} certificate(s) issued",
                        state.successful_documents
                    ),
                })
            }
            Termination::ConnectionFailed(reason) => {
                Some(format!("Processing failed: {}", reason))
            }
        }
    }
}
