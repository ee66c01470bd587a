//! CSV/PDF reconciliation
//!
//! Matches the PDF files selected for a batch against the rows of its CSV
//! metadata file before the batch is submitted. Validation is one-directional:
//! every PDF needs a row, while rows without a PDF are allowed.

mod matcher;
mod metadata;
mod types;


pub use matcher::{check_submission, reconcile};
pub use metadata::{list_pdf_names, load_csv_rows, parse_csv_rows};
pub use types::{CsvRow, MatchedDocument, ReconciliationResult, SubmitBlocker};
