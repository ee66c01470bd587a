//! Core error type definitions

use thiserror::Error;

/// Result type alias for the wallet client
pub type Result<T> = std::result::Result<T, WalletError>;

/// Main error type for the wallet client
#[derive(Error, Debug)]
pub enum WalletError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication errors (missing credential, 401/403 from the backend)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Non-success response from the backend
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network errors
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing errors
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Progress stream errors
    #[error("Stream error: {0}")]
    Stream(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Checkout session ended without payment
    #[error("Payment error: {0}")]
    Payment(String),

    /// Operation was cancelled by its owner
    #[error("Cancelled: {0}")]
    Cancelled(String),
}
