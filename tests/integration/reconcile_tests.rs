//! Reconciliation integration tests
//!
//! Build a PDF directory and metadata CSV on disk and reconcile them the
//! way the `xertiq reconcile` command does.

#[cfg(test)]
mod tests {
    use crate::assert_err;
    use std::fs;
    use std::path::Path;
    use xertiq_wallet::WalletError;
    use xertiq_wallet::core::reconcile::{
        SubmitBlocker, check_submission, list_pdf_names, load_csv_rows, reconcile,
    };

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"%PDF-1.7").unwrap();
    }

    #[test]
    fn test_directory_against_csv() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "alice.pdf");
        touch(dir.path(), "bob.PDF");
        touch(dir.path(), "carol.pdf");
        fs::write(dir.path().join("notes.txt"), "not a certificate").unwrap();
        fs::create_dir(dir.path().join("archive.pdf")).unwrap();

        let csv = dir.path().join("metadata.csv");
        fs::write(
            &csv,
            "FileName,name,email\n\
             alice.pdf,Alice,alice@example.com\n\
             bob.PDF , Bob ,bob@example.com\n\
             dave.pdf,Dave,dave@example.com\n",
        )
        .unwrap();

        let pdfs = list_pdf_names(dir.path()).unwrap();
        assert_eq!(pdfs, vec!["alice.pdf", "bob.PDF", "carol.pdf"]);

        let rows = load_csv_rows(&csv).unwrap();
        let result = reconcile(&pdfs, &rows);

        assert_eq!(result.matched_names(), vec!["alice.pdf", "bob.PDF"]);
        assert_eq!(result.missing_in_csv, vec!["carol.pdf"]);
        assert!(!result.is_valid());
        assert_eq!(result.matched[1].row.get("name"), Some("Bob"));

        assert_eq!(
            check_submission(pdfs.len(), true, &result),
            Err(SubmitBlocker::MissingMetadata(vec!["carol.pdf".to_string()]))
        );
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Report.pdf");
        let csv = dir.path().join("metadata.csv");
        fs::write(&csv, "filename,email\nreport.pdf,x@example.com\n").unwrap();

        let pdfs = list_pdf_names(dir.path()).unwrap();
        let result = reconcile(&pdfs, &load_csv_rows(&csv).unwrap());

        assert!(result.matched.is_empty());
        assert_eq!(result.missing_in_csv, vec!["Report.pdf"]);
    }

    #[test]
    fn test_empty_directory_is_valid_but_not_submittable() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("metadata.csv");
        fs::write(&csv, "filename\nx.pdf\n").unwrap();

        let pdfs = list_pdf_names(dir.path()).unwrap();
        let result = reconcile(&pdfs, &load_csv_rows(&csv).unwrap());

        assert!(result.missing_in_csv.is_empty());
        assert!(result.is_valid());
        assert_eq!(
            check_submission(pdfs.len(), true, &result),
            Err(SubmitBlocker::NoPdfs)
        );
    }

    #[test]
    fn test_csv_without_filename_column() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("metadata.csv");
        fs::write(&csv, "name,email\nAlice,alice@example.com\n").unwrap();

        let err = assert_err!(load_csv_rows(&csv));
        assert!(matches!(err, WalletError::Validation(_)));
    }

    #[test]
    fn test_missing_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = assert_err!(load_csv_rows(dir.path().join("absent.csv")));
        assert!(matches!(err, WalletError::Io(_)));
    }
}
