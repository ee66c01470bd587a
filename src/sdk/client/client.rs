//! Core wallet client implementation

use crate::config::{ApiConfig, Validate};
use crate::utils::error::{Result, WalletError};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

/// HTTP client for the wallet backend
#[derive(Debug, Clone)]
pub struct WalletClient {
    pub(crate) config: ApiConfig,
    pub(crate) base_url: Url,
    pub(crate) http_client: reqwest::Client,
}

impl WalletClient {
    /// Create a new client.
    ///
    /// Only a connect timeout is set on the underlying client; ordinary
    /// requests get `request_timeout` individually so the long-lived
    /// progress stream is never cut off.
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate().map_err(WalletError::Config)?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| WalletError::config(format!("Invalid base URL: {}", e)))?;

        let http_client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .user_agent(concat!("xertiq-wallet/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WalletError::config(format!("Failed to create HTTP client: {}", e)))?;

        info!("WalletClient created for {}", base_url);

        Ok(Self {
            config,
            base_url,
            http_client,
        })
    }

    /// Replace the long-lived credential, e.g. after sign-in
    pub fn with_credential<S: Into<String>>(mut self, credential: S) -> Self {
        self.config.credential = Some(credential.into());
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The long-lived credential, required by every endpoint
    pub fn credential(&self) -> Result<&str> {
        self.config
            .credential
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| WalletError::auth("No credential configured"))
    }

    /// Resolve `segments` under the base URL, percent-encoding each one
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| WalletError::config(format!("Base URL {} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Authenticated request with the per-request timeout applied
    pub(crate) fn authorized(&self, method: reqwest::Method, url: Url) -> Result<RequestBuilder> {
        let credential = self.credential()?;
        Ok(self
            .http_client
            .request(method, url)
            .bearer_auth(credential)
            .timeout(self.config.request_timeout()))
    }

    /// Send `request` and decode a JSON body from a success response
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = check_response(request.send().await?).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            WalletError::parsing(format!("Unexpected response body: {}", e))
        })
    }
}

/// Turn a non-success response into the matching error
pub(crate) async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    debug!("Request to {} failed with {}", response.url().path(), status);
    let body = response.text().await.unwrap_or_default();
    Err(WalletError::from_status(status.as_u16(), &body))
}
