//! Filename matching between PDFs and CSV rows

use super::types::{CsvRow, MatchedDocument, ReconciliationResult, SubmitBlocker};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Match every PDF name against `rows` by exact, case-sensitive `filename`.
///
/// The first row wins when a filename repeats. Rows without a PDF are not
/// reported; an empty PDF list is trivially valid.
pub fn reconcile<S: AsRef<str>>(pdf_names: &[S], rows: &[CsvRow]) -> ReconciliationResult {
    let mut by_name: HashMap<&str, &CsvRow> = HashMap::with_capacity(rows.len());
    let mut duplicates = Vec::new();
    let mut reported = HashSet::new();

    for row in rows {
        let name = row.filename.as_str();
        if by_name.contains_key(name) {
            if reported.insert(name) {
                duplicates.push(name.to_string());
            }
        } else {
            by_name.insert(name, row);
        }
    }

    let mut result = ReconciliationResult {
        duplicate_filenames: duplicates,
        ..Default::default()
    };

    for pdf in pdf_names {
        let pdf = pdf.as_ref();
        match by_name.get(pdf) {
            Some(row) => result.matched.push(MatchedDocument {
                file_name: pdf.to_string(),
                row: (*row).clone(),
            }),
            None => result.missing_in_csv.push(pdf.to_string()),
        }
    }

    debug!(
        "Reconciled {} PDFs against {} CSV rows: {} matched, {} missing",
        pdf_names.len(),
        rows.len(),
        result.matched.len(),
        result.missing_in_csv.len()
    );

    result
}

/// Decide whether a batch can be submitted.
///
/// Requires at least one PDF, a CSV file, and a valid reconciliation.
pub fn check_submission(
    pdf_count: usize,
    csv_present: bool,
    result: &ReconciliationResult,
) -> Result<(), SubmitBlocker> {
    if pdf_count == 0 {
        return Err(SubmitBlocker::NoPdfs);
    }
    if !csv_present {
        return Err(SubmitBlocker::NoCsv);
    }
    if !result.is_valid() {
        return Err(SubmitBlocker::MissingMetadata(result.missing_in_csv.clone()));
    }
    Ok(())
}
