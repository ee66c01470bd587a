//! JSON-backed wallet store

use crate::utils::error::{Result, WalletError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Persisted wallet state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletState {
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub credits: Option<u64>,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Single owner of the wallet state and its backing file
#[derive(Debug)]
pub struct WalletStore {
    path: PathBuf,
    state: WalletState,
    dirty: bool,
}

impl WalletStore {
    /// Load the store from `path`. A missing file yields the default state.
    pub async fn hydrate<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let state = match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let state: WalletState = serde_json::from_str(&content).map_err(|e| {
                    WalletError::parsing(format!("Invalid wallet state in {:?}: {}", path, e))
                })?;
                debug!("Hydrated wallet state from {:?}", path);
                state
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No wallet state at {:?}, starting empty", path);
                WalletState::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            state,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &WalletState {
        &self.state
    }

    /// Whether there are changes not yet persisted
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_user(&mut self, user: Option<UserProfile>) {
        self.state.user = user;
        self.touch();
    }

    pub fn set_wallet_address(&mut self, address: Option<String>) {
        self.state.wallet_address = address;
        self.touch();
    }

    pub fn set_credits(&mut self, credits: u64) {
        self.state.credits = Some(credits);
        self.touch();
    }

    pub fn set_auth_token(&mut self, token: Option<String>) {
        self.state.auth_token = token;
        self.touch();
    }

    /// Forget everything, e.g. on sign-out
    pub fn clear(&mut self) {
        self.state = WalletState::default();
        self.touch();
    }

    /// Write the state as pretty JSON, replacing the file atomically
    pub async fn persist(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let body = serde_json::to_vec_pretty(&self.state)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        self.dirty = false;
        info!("Wallet state saved to {:?}", self.path);
        Ok(())
    }

    fn touch(&mut self) {
        self.state.last_updated = Some(Utc::now());
        self.dirty = true;
    }
}
