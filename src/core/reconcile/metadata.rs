//! Loading batch inputs from disk

use super::types::CsvRow;
use crate::utils::error::{Result, WalletError};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Header of the mandatory filename column, matched case-insensitively
const FILENAME_COLUMN: &str = "filename";

/// Parse CSV metadata rows from `reader`.
///
/// The first record is the header and must contain a `filename` column.
/// Cells are trimmed; a blank filename is rejected with its line number.
pub fn parse_csv_rows<R: Read>(reader: R) -> Result<Vec<CsvRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let filename_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(FILENAME_COLUMN))
        .ok_or_else(|| {
            WalletError::validation(format!(
                "CSV header must contain a '{}' column",
                FILENAME_COLUMN
            ))
        })?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // header is line 1
        let line = index + 2;

        let filename = record.get(filename_idx).unwrap_or_default();
        if filename.is_empty() {
            return Err(WalletError::validation(format!(
                "CSV line {} has an empty '{}' value",
                line, FILENAME_COLUMN
            )));
        }

        let metadata = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != filename_idx)
            .map(|(i, name)| (name.clone(), record.get(i).unwrap_or_default().to_string()))
            .collect();

        rows.push(CsvRow {
            filename: filename.to_string(),
            metadata,
        });
    }

    debug!("Parsed {} CSV metadata rows", rows.len());
    Ok(rows)
}

/// Parse CSV metadata rows from a file
pub fn load_csv_rows<P: AsRef<Path>>(path: P) -> Result<Vec<CsvRow>> {
    let file = std::fs::File::open(path.as_ref())?;
    parse_csv_rows(file)
}

/// List the `.pdf` files (case-insensitive extension) directly inside `dir`, sorted by name
pub fn list_pdf_names<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in std::fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                return Err(WalletError::validation(format!(
                    "PDF file name is not valid UTF-8: {:?}",
                    raw
                )));
            }
        }
    }

    names.sort();
    Ok(names)
}
