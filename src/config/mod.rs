//! Configuration management for the wallet client
//!
//! Configuration comes from an optional YAML file, then `XERTIQ_*`
//! environment variables (a `.env` file is honoured by the binary), and is
//! validated before any client is built from it.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{Result, WalletError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable holding the backend base URL
pub const ENV_API_URL: &str = "XERTIQ_API_URL";
/// Environment variable holding the long-lived credential
pub const ENV_TOKEN: &str = "XERTIQ_TOKEN";

/// Main configuration struct for the wallet client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl WalletConfig {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            WalletError::config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config: WalletConfig = serde_yaml::from_str(&content)
            .map_err(|e| WalletError::config(format!("Failed to parse config: {}", e)))?;

        config.check()?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.check()?;
        Ok(config)
    }

    /// Load from `path` when given, then layer environment variables on top
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path).await?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.check()?;
        Ok(config)
    }

    /// Apply `XERTIQ_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            self.api.credential = Some(token);
        }
        if let Some(timeout) = lookup("XERTIQ_REQUEST_TIMEOUT") {
            self.api.request_timeout = parse_var("XERTIQ_REQUEST_TIMEOUT", &timeout)?;
        }
        if let Some(timeout) = lookup("XERTIQ_CONNECT_TIMEOUT") {
            self.api.connect_timeout = parse_var("XERTIQ_CONNECT_TIMEOUT", &timeout)?;
        }
        if let Some(delay) = lookup("XERTIQ_AUTO_DISMISS_MS") {
            self.progress.auto_dismiss_ms = parse_var("XERTIQ_AUTO_DISMISS_MS", &delay)?;
        }
        if let Some(idle) = lookup("XERTIQ_STREAM_IDLE_TIMEOUT") {
            self.progress.idle_timeout = Some(parse_var("XERTIQ_STREAM_IDLE_TIMEOUT", &idle)?);
        }
        if let Some(interval) = lookup("XERTIQ_POLL_INTERVAL_MS") {
            self.polling.interval_ms = parse_var("XERTIQ_POLL_INTERVAL_MS", &interval)?;
        }
        if let Some(attempts) = lookup("XERTIQ_POLL_MAX_ATTEMPTS") {
            self.polling.max_attempts = parse_var("XERTIQ_POLL_MAX_ATTEMPTS", &attempts)?;
        }
        if let Some(path) = lookup("XERTIQ_STORE_PATH") {
            self.store.path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Run validation, converting the message into a configuration error
    pub fn check(&self) -> Result<()> {
        Validate::validate(self).map_err(WalletError::Config)
    }

    /// Get API configuration
    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    /// Get progress stream configuration
    pub fn progress(&self) -> &ProgressConfig {
        &self.progress
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| WalletError::config(format!("Invalid {}: {}", key, e)))
}

/// Programmatic configuration builder
pub struct ConfigBuilder {
    config: WalletConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: WalletConfig::default(),
        }
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.config.api.base_url = url.to_string();
        self
    }

    pub fn credential(mut self, credential: &str) -> Self {
        self.config.api.credential = Some(credential.to_string());
        self
    }

    pub fn request_timeout(mut self, seconds: u64) -> Self {
        self.config.api.request_timeout = seconds;
        self
    }

    pub fn auto_dismiss_ms(mut self, millis: u64) -> Self {
        self.config.progress.auto_dismiss_ms = millis;
        self
    }

    pub fn idle_timeout(mut self, seconds: u64) -> Self {
        self.config.progress.idle_timeout = Some(seconds);
        self
    }

    pub fn polling(mut self, interval_ms: u64, max_attempts: u32) -> Self {
        self.config.polling = PollingConfig {
            interval_ms,
            max_attempts,
        };
        self
    }

    pub fn store_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.store.path = Some(path.into());
        self
    }

    /// Build the configuration without validating it
    pub fn build(self) -> WalletConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
