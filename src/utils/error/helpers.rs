//! Helper functions for creating specific error types

use super::types::WalletError;

impl WalletError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth(message.into())
    }

    pub fn api<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    pub fn parsing<S: Into<String>>(message: S) -> Self {
        Self::Parsing(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn stream<S: Into<String>>(message: S) -> Self {
        Self::Stream(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn payment<S: Into<String>>(message: S) -> Self {
        Self::Payment(message.into())
    }

    pub fn cancelled<S: Into<String>>(message: S) -> Self {
        Self::Cancelled(message.into())
    }

    /// Map a non-success HTTP status and body to the matching variant.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            "empty response body".to_string()
        } else {
            body.trim().to_string()
        };

        match status {
            401 | 403 => Self::Auth(format!("HTTP {}: {}", status, message)),
            404 => Self::NotFound(message),
            _ => Self::api(status, message),
        }
    }

    /// Whether retrying the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            WalletError::Network(_) | WalletError::Timeout(_) => true,
            WalletError::HttpClient(e) => e.is_timeout() || e.is_connect(),
            WalletError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, WalletError::Auth(_))
    }
}
