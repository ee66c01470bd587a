//! Configuration validation

use super::models::*;
use super::WalletConfig;
use tracing::debug;
use url::Url;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for WalletConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating wallet configuration");

        self.api.validate()?;
        self.progress.validate()?;
        self.polling.validate()?;
        Ok(())
    }
}

impl Validate for ApiConfig {
    fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| format!("api.base_url has invalid URL format: {}", e))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(format!(
                    "api.base_url must use http:// or https:// scheme, got: {}",
                    scheme
                ));
            }
        }

        if url.host_str().is_none() {
            return Err("api.base_url must have a host".to_string());
        }

        if let Some(credential) = &self.credential {
            if credential.trim().is_empty() {
                return Err("api.credential must not be blank when set".to_string());
            }
        }

        if self.request_timeout == 0 {
            return Err("api.request_timeout must be greater than 0".to_string());
        }

        if self.connect_timeout == 0 {
            return Err("api.connect_timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for ProgressConfig {
    fn validate(&self) -> Result<(), String> {
        if self.idle_timeout == Some(0) {
            return Err("progress.idle_timeout must be greater than 0 when set".to_string());
        }
        Ok(())
    }
}

impl Validate for PollingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.interval_ms == 0 {
            return Err("polling.interval_ms must be greater than 0".to_string());
        }
        if self.max_attempts == 0 {
            return Err("polling.max_attempts must be greater than 0".to_string());
        }
        Ok(())
    }
}
