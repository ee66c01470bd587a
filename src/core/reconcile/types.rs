//! Reconciliation data types

use serde::{Deserialize, Serialize};
use std::fmt;

/// One parsed row of a batch metadata CSV
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    /// Value of the mandatory `filename` column
    pub filename: String,
    /// Every other column, in header order
    #[serde(default)]
    pub metadata: Vec<(String, String)>,
}

impl CsvRow {
    pub fn new<S: Into<String>>(filename: S) -> Self {
        Self {
            filename: filename.into(),
            metadata: Vec::new(),
        }
    }

    pub fn with_field<K: Into<String>, V: Into<String>>(mut self, column: K, value: V) -> Self {
        self.metadata.push((column.into(), value.into()));
        self
    }

    /// Look up a metadata column by exact header name
    pub fn get(&self, column: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

/// A PDF paired with the CSV row describing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedDocument {
    pub file_name: String,
    pub row: CsvRow,
}

/// Outcome of matching PDF names against CSV rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    /// PDFs with a row, in PDF input order
    pub matched: Vec<MatchedDocument>,
    /// PDFs without a row, in PDF input order
    pub missing_in_csv: Vec<String>,
    /// Filenames that occur on more than one CSV row. Informational only.
    pub duplicate_filenames: Vec<String>,
}

impl ReconciliationResult {
    /// True when every PDF has a CSV row
    pub fn is_valid(&self) -> bool {
        self.missing_in_csv.is_empty()
    }

    pub fn matched_names(&self) -> Vec<&str> {
        self.matched.iter().map(|m| m.file_name.as_str()).collect()
    }
}

/// Reason a batch may not be submitted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBlocker {
    /// No PDF was selected
    NoPdfs,
    /// No CSV metadata file was selected
    NoCsv,
    /// Some PDFs have no CSV row
    MissingMetadata(Vec<String>),
}

impl fmt::Display for SubmitBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitBlocker::NoPdfs => write!(f, "select at least one PDF file"),
            SubmitBlocker::NoCsv => write!(f, "select a CSV metadata file"),
            SubmitBlocker::MissingMetadata(names) => write!(
                f,
                "{} PDF file(s) have no CSV row: {}",
                names.len(),
                names.join(", ")
            ),
        }
    }
}
