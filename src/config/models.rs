//! Configuration data models

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default backend base URL
pub fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

/// Default whole-request timeout in seconds
pub fn default_request_timeout() -> u64 {
    30
}

/// Default connect timeout in seconds
pub fn default_connect_timeout() -> u64 {
    10
}

/// Default delay before a successful batch view dismisses itself
pub fn default_auto_dismiss_ms() -> u64 {
    3000
}

/// Default polling interval in milliseconds
pub fn default_poll_interval_ms() -> u64 {
    2000
}

/// Default polling attempt budget
pub fn default_poll_max_attempts() -> u32 {
    10
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Long-lived bearer credential
    #[serde(default)]
    pub credential: Option<String>,
    /// Timeout for ordinary request/response calls, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// TCP connect timeout, in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            credential: None,
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

/// Batch progress stream configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Delay before a successfully completed batch view is dismissed
    #[serde(default = "default_auto_dismiss_ms")]
    pub auto_dismiss_ms: u64,
    /// Treat a stream silent for this many seconds as dropped. Disabled when unset.
    #[serde(default)]
    pub idle_timeout: Option<u64>,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            auto_dismiss_ms: default_auto_dismiss_ms(),
            idle_timeout: None,
        }
    }
}

impl ProgressConfig {
    pub fn auto_dismiss_delay(&self) -> Duration {
        Duration::from_millis(self.auto_dismiss_ms)
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout.map(Duration::from_secs)
    }
}

/// Polling configuration for balance and payment checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_poll_max_attempts")]
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
            max_attempts: default_poll_max_attempts(),
        }
    }
}

impl PollingConfig {
    pub fn policy(&self) -> crate::utils::net::PollPolicy {
        crate::utils::net::PollPolicy::new(
            Duration::from_millis(self.interval_ms),
            self.max_attempts,
        )
    }
}

/// Local wallet state file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON state file. The CLI falls back to `./.xertiq/wallet.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(".xertiq").join("wallet.json"))
    }
}
