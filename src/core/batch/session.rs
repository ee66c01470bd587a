//! Progress session state machine
//!
//! `Idle → TokenExchanging → Connecting → Live → Terminated`.
//! The machine is pure: it never performs I/O, it only records what the
//! connection driver reports and says what changed.

use super::types::BatchProgressState;
use crate::core::streaming::ProgressEvent;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Lifecycle phase of one progress session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    TokenExchanging,
    Connecting,
    Live,
    Terminated,
}

/// Why a session reached `Terminated`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum Termination {
    /// A `complete` event was processed
    Completed,
    /// The connection failed before any `complete` event
    ConnectionFailed(String),
}

/// Observable effect of feeding one input to the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed
    Ignored,
    /// The session is now marked live
    Live,
    /// The batch state was replaced by a progress payload
    Progress,
    /// The batch state was replaced by the final payload; terminal
    Completed,
    /// The backend reported an error; the connection stays open
    StreamError(String),
    /// A payload was rejected and dropped
    Dropped(String),
    /// The connection failed before completion; terminal
    Failed(String),
    /// The connection closed after completion; expected and not a failure
    BenignDisconnect,
}

/// State of one batch progress session
#[derive(Debug, Clone)]
pub struct ProgressSession {
    session_id: String,
    phase: SessionPhase,
    live: bool,
    state: Option<BatchProgressState>,
    termination: Option<Termination>,
    last_error: Option<String>,
}

impl ProgressSession {
    pub fn new<S: Into<String>>(session_id: S) -> Self {
        Self {
            session_id: session_id.into(),
            phase: SessionPhase::Idle,
            live: false,
            state: None,
            termination: None,
            last_error: None,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Advisory connection flag; never gates event handling
    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn state(&self) -> Option<&BatchProgressState> {
        self.state.as_ref()
    }

    pub fn termination(&self) -> Option<&Termination> {
        self.termination.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == SessionPhase::Terminated
    }

    pub fn is_completed(&self) -> bool {
        self.termination == Some(Termination::Completed)
    }

    /// Enter `TokenExchanging`
    pub fn begin_token_exchange(&mut self) {
        self.advance(SessionPhase::TokenExchanging);
    }

    /// Enter `Connecting`
    pub fn begin_connect(&mut self) {
        self.advance(SessionPhase::Connecting);
    }

    /// The event connection is open
    pub fn on_open(&mut self) -> Transition {
        if self.is_terminated() {
            return Transition::Ignored;
        }
        self.advance(SessionPhase::Live);
        self.live = true;
        Transition::Live
    }

    /// Apply one inbound event. Every event after termination is a no-op.
    pub fn on_event(&mut self, event: ProgressEvent) -> Transition {
        if self.is_terminated() {
            debug!(
                "Session {} ignoring '{}' event after termination",
                self.session_id,
                event.kind()
            );
            return Transition::Ignored;
        }

        // an event implies the connection is open
        if self.phase < SessionPhase::Live {
            self.advance(SessionPhase::Live);
        }

        match event {
            ProgressEvent::Connected => {
                self.live = true;
                Transition::Live
            }
            ProgressEvent::Progress(state) => {
                if let Err(reason) = self.check_payload(&state) {
                    warn!(
                        "Session {} dropping progress payload: {}",
                        self.session_id, reason
                    );
                    return Transition::Dropped(reason);
                }
                self.state = Some(state);
                Transition::Progress
            }
            ProgressEvent::Complete(state) => {
                // the final payload always terminates the session
                if let Err(reason) = self.check_payload(&state) {
                    warn!(
                        "Session {} final payload is inconsistent: {}",
                        self.session_id, reason
                    );
                }
                info!(
                    "Session {} completed: {} succeeded, {} failed",
                    self.session_id, state.successful_documents, state.failed_documents
                );
                self.state = Some(state);
                self.terminate(Termination::Completed);
                Transition::Completed
            }
            ProgressEvent::Error(message) => {
                warn!("Session {} stream error: {}", self.session_id, message);
                self.last_error = Some(message.clone());
                Transition::StreamError(message)
            }
        }
    }

    /// The connection errored or closed
    pub fn on_connection_error<S: Into<String>>(&mut self, reason: S) -> Transition {
        let reason = reason.into();
        match &self.termination {
            Some(Termination::Completed) => {
                debug!(
                    "Session {} connection closed after completion: {}",
                    self.session_id, reason
                );
                Transition::BenignDisconnect
            }
            Some(Termination::ConnectionFailed(_)) => Transition::Ignored,
            None => {
                warn!("Session {} connection failed: {}", self.session_id, reason);
                self.live = false;
                self.last_error = Some(reason.clone());
                self.terminate(Termination::ConnectionFailed(reason.clone()));
                Transition::Failed(reason)
            }
        }
    }

    /// Check the counter invariants and that `processedDocuments` does not move backwards
    fn check_payload(&self, next: &BatchProgressState) -> Result<(), String> {
        next.check_counters()?;

        if let Some(current) = &self.state {
            if next.processed_documents < current.processed_documents {
                return Err(format!(
                    "processedDocuments went backwards ({} -> {})",
                    current.processed_documents, next.processed_documents
                ));
            }
        }

        Ok(())
    }

    fn advance(&mut self, to: SessionPhase) {
        if to > self.phase {
            debug!("Session {}: {:?} -> {:?}", self.session_id, self.phase, to);
            self.phase = to;
        }
    }

    fn terminate(&mut self, termination: Termination) {
        self.phase = SessionPhase::Terminated;
        self.termination = Some(termination);
    }
}
