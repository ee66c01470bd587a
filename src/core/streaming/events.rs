//! Typed progress events

use crate::core::batch::BatchProgressState;
use crate::utils::error::{Result, WalletError};
use serde_json::Value;

/// A decoded progress event, dispatched on its `type` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The backend accepted the connection
    Connected,
    /// Intermediate batch state
    Progress(BatchProgressState),
    /// Final batch state
    Complete(BatchProgressState),
    /// Backend-reported error; the connection stays open
    Error(String),
}

impl ProgressEvent {
    /// Event name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ProgressEvent::Connected => "connected",
            ProgressEvent::Progress(_) => "progress",
            ProgressEvent::Complete(_) => "complete",
            ProgressEvent::Error(_) => "error",
        }
    }

    /// Parse the JSON body of one SSE frame.
    ///
    /// Fails with [`WalletError::Parsing`] for invalid JSON, a missing or
    /// unknown `type`, or a payload that does not match the batch state shape.
    pub fn from_json(data: &str) -> Result<Self> {
        let json: Value = serde_json::from_str(data.trim())
            .map_err(|e| WalletError::parsing(format!("invalid event JSON: {}", e)))?;

        let event_type = json
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| WalletError::parsing("event has no 'type' field"))?;

        match event_type {
            "connected" => Ok(ProgressEvent::Connected),
            "progress" => Ok(ProgressEvent::Progress(Self::state_payload(&json)?)),
            "complete" => Ok(ProgressEvent::Complete(Self::state_payload(&json)?)),
            "error" => Ok(ProgressEvent::Error(Self::error_message(&json))),
            other => Err(WalletError::parsing(format!(
                "unknown event type '{}'",
                other
            ))),
        }
    }

    fn state_payload(json: &Value) -> Result<BatchProgressState> {
        let data = json
            .get("data")
            .cloned()
            .ok_or_else(|| WalletError::parsing("event has no 'data' payload"))?;

        serde_json::from_value(data)
            .map_err(|e| WalletError::parsing(format!("invalid batch state payload: {}", e)))
    }

    fn error_message(json: &Value) -> String {
        let nested = json.get("data").and_then(|d| d.get("message"));
        [nested, json.get("message"), json.get("error")]
            .into_iter()
            .flatten()
            .find_map(|v| v.as_str())
            .unwrap_or("unknown stream error")
            .to_string()
    }
}
