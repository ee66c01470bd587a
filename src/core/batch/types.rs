//! Batch progress data model
//!
//! Mirrors the JSON payload the backend attaches to `progress` and
//! `complete` events (camelCase on the wire).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Processing status of a single document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

/// Overall status of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    #[default]
    Processing,
    Completed,
    Failed,
}

impl BatchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchStatus::Completed | BatchStatus::Failed)
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BatchStatus::Processing => "processing",
            BatchStatus::Completed => "completed",
            BatchStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Outcome of one certificate in the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOutcome {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_email: Option<String>,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Snapshot of a batch as reported by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgressState {
    #[serde(default)]
    pub total_documents: u32,
    #[serde(default)]
    pub processed_documents: u32,
    #[serde(default)]
    pub successful_documents: u32,
    #[serde(default)]
    pub failed_documents: u32,
    #[serde(default)]
    pub documents: Vec<DocumentOutcome>,
    #[serde(default)]
    pub status: BatchStatus,
    #[serde(default)]
    pub current_step: u32,
    #[serde(default)]
    pub current_message: String,
}

impl BatchProgressState {
    /// Percentage of processed documents, 0 when the batch is empty
    pub fn percent_complete(&self) -> u8 {
        if self.total_documents == 0 {
            return 0;
        }
        let processed = self.processed_documents.min(self.total_documents) as u64;
        (processed * 100 / self.total_documents as u64) as u8
    }

    /// Check the counter invariants:
    /// `successful + failed <= processed <= total`.
    pub fn check_counters(&self) -> Result<(), String> {
        if self.processed_documents > self.total_documents {
            return Err(format!(
                "processedDocuments ({}) exceeds totalDocuments ({})",
                self.processed_documents, self.total_documents
            ));
        }

        let settled = self.successful_documents as u64 + self.failed_documents as u64;
        if settled > self.processed_documents as u64 {
            return Err(format!(
                "successfulDocuments + failedDocuments ({}) exceeds processedDocuments ({})",
                settled, self.processed_documents
            ));
        }

        Ok(())
    }

    /// Documents that failed, in batch order
    pub fn failed(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.documents
            .iter()
            .filter(|d| d.status == DocumentStatus::Failed)
    }
}
