//! Wire types for wallet backend responses

use serde::{Deserialize, Serialize};

/// `POST /batch/sse-token`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamTokenResponse {
    pub token: String,
}

/// `POST /batch/upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub session_id: String,
    #[serde(default)]
    pub total_documents: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /credits/balance`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditBalance {
    pub credits: u64,
}

/// `GET /payments/session/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub status: String,
    #[serde(default)]
    pub credits: Option<u64>,
}

impl PaymentStatus {
    /// The checkout was paid and credits were granted
    pub fn is_paid(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "paid" | "complete")
    }

    /// The checkout can no longer be paid
    pub fn is_failed(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "failed" | "expired")
    }
}
