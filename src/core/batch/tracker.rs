//! Single-owner progress tracking
//!
//! A [`ProgressTracker`] owns the observable progress of at most one batch
//! session at a time. Starting a session cancels the previous one: its
//! [`SessionSink`] stops publishing and its reader task is aborted, so a
//! late event from a discarded connection can never reach observers.

use super::session::{ProgressSession, SessionPhase, Termination, Transition};
use super::types::BatchProgressState;
use crate::core::streaming::ProgressEvent;
use crate::utils::sys::CancelFlag;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Callbacks fired as a session progresses. All methods default to no-ops.
pub trait ProgressObserver: Send + Sync {
    fn on_live(&self, _session_id: &str) {}
    fn on_progress(&self, _session_id: &str, _state: &BatchProgressState) {}
    fn on_complete(&self, _session_id: &str, _state: &BatchProgressState) {}
    fn on_stream_error(&self, _session_id: &str, _message: &str) {}
    fn on_connection_failed(&self, _session_id: &str, _reason: &str) {}
}

/// Published view of the active session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub session_id: String,
    pub phase: SessionPhase,
    pub live: bool,
    pub state: Option<BatchProgressState>,
    pub termination: Option<Termination>,
    pub last_error: Option<String>,
}

impl ProgressSnapshot {
    fn of(session: &ProgressSession) -> Self {
        Self {
            session_id: session.session_id().to_string(),
            phase: session.phase(),
            live: session.is_live(),
            state: session.state().cloned(),
            termination: session.termination().cloned(),
            last_error: session.last_error().map(str::to_string),
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == SessionPhase::Terminated
    }
}

type SnapshotSender = Arc<watch::Sender<Option<ProgressSnapshot>>>;
type Observers = Arc<[Arc<dyn ProgressObserver>]>;

/// Write side of one session. Owned by exactly one driver.
pub struct SessionSink {
    session: ProgressSession,
    cancel: CancelFlag,
    snapshots: SnapshotSender,
    observers: Observers,
}

impl SessionSink {
    pub fn session_id(&self) -> &str {
        self.session.session_id()
    }

    pub fn session(&self) -> &ProgressSession {
        &self.session
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_terminated(&self) -> bool {
        self.session.is_terminated()
    }

    pub fn begin_token_exchange(&mut self) {
        if self.is_cancelled() {
            return;
        }
        self.session.begin_token_exchange();
        self.publish();
    }

    pub fn begin_connect(&mut self) {
        if self.is_cancelled() {
            return;
        }
        self.session.begin_connect();
        self.publish();
    }

    pub fn on_open(&mut self) -> Transition {
        if self.is_cancelled() {
            return Transition::Ignored;
        }
        let transition = self.session.on_open();
        self.commit(&transition);
        transition
    }

    /// Apply one inbound event unless the session was cancelled
    pub fn dispatch(&mut self, event: ProgressEvent) -> Transition {
        if self.is_cancelled() {
            debug!(
                "Dropping '{}' event for cancelled session {}",
                event.kind(),
                self.session_id()
            );
            return Transition::Ignored;
        }
        let transition = self.session.on_event(event);
        self.commit(&transition);
        transition
    }

    /// Report a connection-level error unless the session was cancelled
    pub fn connection_error<S: Into<String>>(&mut self, reason: S) -> Transition {
        if self.is_cancelled() {
            return Transition::Ignored;
        }
        let transition = self.session.on_connection_error(reason);
        self.commit(&transition);
        transition
    }

    fn commit(&self, transition: &Transition) {
        let id = self.session.session_id();
        match transition {
            Transition::Ignored | Transition::Dropped(_) | Transition::BenignDisconnect => return,
            Transition::Live => self.notify(|o| o.on_live(id)),
            Transition::Progress => {
                if let Some(state) = self.session.state() {
                    self.notify(|o| o.on_progress(id, state));
                }
            }
            Transition::Completed => {
                if let Some(state) = self.session.state() {
                    self.notify(|o| o.on_complete(id, state));
                }
            }
            Transition::StreamError(message) => self.notify(|o| o.on_stream_error(id, message)),
            Transition::Failed(reason) => self.notify(|o| o.on_connection_failed(id, reason)),
        }
        self.publish();
    }

    fn notify<F: Fn(&dyn ProgressObserver)>(&self, f: F) {
        for observer in self.observers.iter() {
            if self.is_cancelled() {
                return;
            }
            f(observer.as_ref());
        }
    }

    fn publish(&self) {
        let snapshot = ProgressSnapshot::of(&self.session);
        let cancel = &self.cancel;
        // the flag is re-checked under the channel lock so a cancelled
        // session can never overwrite its successor's snapshot
        self.snapshots.send_if_modified(|current| {
            if cancel.is_cancelled() {
                return false;
            }
            *current = Some(snapshot);
            true
        });
    }
}

struct ActiveSession {
    session_id: String,
    cancel: CancelFlag,
    task: Option<JoinHandle<()>>,
}

impl ActiveSession {
    fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            // dropping the reader closes the connection
            task.abort();
        }
    }
}

/// Owner of the observable progress state
pub struct ProgressTracker {
    snapshots: SnapshotSender,
    observers: Vec<Arc<dyn ProgressObserver>>,
    active: Option<ActiveSession>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            snapshots: Arc::new(tx),
            observers: Vec::new(),
            active: None,
        }
    }

    /// Register an observer for sessions started after this call
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ProgressSnapshot>> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> Option<ProgressSnapshot> {
        self.snapshots.borrow().clone()
    }

    pub fn current_session(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.session_id.as_str())
    }

    /// Start a session without a driver task, cancelling any previous one.
    pub fn begin<S: Into<String>>(&mut self, session_id: S) -> SessionSink {
        let session_id = session_id.into();
        self.cancel();

        info!("Tracking batch session {}", session_id);
        let cancel = CancelFlag::new();
        let session = ProgressSession::new(session_id.clone());
        self.snapshots
            .send_replace(Some(ProgressSnapshot::of(&session)));

        self.active = Some(ActiveSession {
            session_id,
            cancel: cancel.clone(),
            task: None,
        });

        SessionSink {
            session,
            cancel,
            snapshots: self.snapshots.clone(),
            observers: self.observers.clone().into(),
        }
    }

    /// Start a session and spawn `driver` with its sink
    pub fn spawn<S, F, Fut>(&mut self, session_id: S, driver: F)
    where
        S: Into<String>,
        F: FnOnce(SessionSink) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let sink = self.begin(session_id);
        let task = tokio::spawn(driver(sink));
        if let Some(active) = self.active.as_mut() {
            active.task = Some(task);
        }
    }

    /// Cancel the active session, if any
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            debug!("Cancelling batch session {}", active.session_id);
            active.shutdown();
        }
    }

    /// Wait until the active session terminates.
    ///
    /// Returns `None` if the session is cancelled or replaced first.
    pub async fn wait_terminated(&self) -> Option<ProgressSnapshot> {
        let session_id = self.current_session()?.to_string();
        let cancel = self.active.as_ref()?.cancel.clone();
        let mut rx = self.subscribe();

        loop {
            {
                let current = rx.borrow_and_update();
                match current.as_ref() {
                    Some(s) if s.session_id != session_id => return None,
                    Some(s) if s.is_terminated() => return Some(s.clone()),
                    _ => {}
                }
            }
            if cancel.is_cancelled() {
                return None;
            }
            if rx.changed().await.is_err() {
                return None;
            }
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.cancel();
    }
}
