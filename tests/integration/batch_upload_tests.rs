//! Batch upload integration tests
//!
//! Submit PDFs and their metadata CSV as a multipart form to a mock backend.

#[cfg(test)]
mod tests {
    use crate::common::{CREDENTIAL, MockBackend};
    use crate::{assert_err, assert_ok};
    use serde_json::json;
    use std::fs;
    use std::path::{Path, PathBuf};
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, ResponseTemplate};
    use xertiq_wallet::WalletError;

    fn write_batch(dir: &Path, names: &[&str]) -> (Vec<PathBuf>, PathBuf) {
        let pdfs = names
            .iter()
            .map(|name| {
                let pdf = dir.join(name);
                fs::write(&pdf, b"%PDF-1.7").unwrap();
                pdf
            })
            .collect();

        let csv = dir.join("metadata.csv");
        fs::write(
            &csv,
            "fileName,identityEmail\na.pdf,alice@example.com\nb.pdf,bob@example.com\n",
        )
        .unwrap();
        (pdfs, csv)
    }

    #[tokio::test]
    async fn test_submit_batch_returns_session_id() {
        let backend = MockBackend::start().await;
        Mock::given(method("POST"))
            .and(path("/batch/upload"))
            .and(header("authorization", format!("Bearer {}", CREDENTIAL).as_str()))
            .and(body_string_contains(r#"name="files"; filename="a.pdf""#))
            .and(body_string_contains(r#"name="files"; filename="b.pdf""#))
            .and(body_string_contains(r#"name="csv"; filename="metadata.csv""#))
            .and(body_string_contains("alice@example.com"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "sessionId": "batch-9", "totalDocuments": 2 })),
            )
            .expect(1)
            .mount(&backend.server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let (pdfs, csv) = write_batch(dir.path(), &["a.pdf", "b.pdf"]);

        let upload = assert_ok!(backend.client().submit_batch(&pdfs, &csv).await);
        assert_eq!(upload.session_id, "batch-9");
        assert_eq!(upload.total_documents, Some(2));
    }

    #[tokio::test]
    async fn test_submit_batch_without_pdfs_is_rejected_locally() {
        let backend = MockBackend::start().await;
        Mock::given(method("POST"))
            .and(path("/batch/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sessionId": "x" })))
            .expect(0)
            .mount(&backend.server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let (_, csv) = write_batch(dir.path(), &[]);

        let err = assert_err!(backend.client().submit_batch(&[], &csv).await);
        assert!(matches!(err, WalletError::Validation(_)));
    }

    #[tokio::test]
    async fn test_submit_batch_missing_csv_sends_nothing() {
        let backend = MockBackend::start().await;
        Mock::given(method("POST"))
            .and(path("/batch/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sessionId": "x" })))
            .expect(0)
            .mount(&backend.server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let (pdfs, _) = write_batch(dir.path(), &["a.pdf"]);

        let err = assert_err!(
            backend
                .client()
                .submit_batch(&pdfs, &dir.path().join("absent.csv"))
                .await
        );
        assert!(matches!(err, WalletError::Io(_)));
    }

    #[tokio::test]
    async fn test_submit_batch_server_rejection() {
        let backend = MockBackend::start().await;
        Mock::given(method("POST"))
            .and(path("/batch/upload"))
            .respond_with(ResponseTemplate::new(402).set_body_string("insufficient credits"))
            .mount(&backend.server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let (pdfs, csv) = write_batch(dir.path(), &["a.pdf"]);

        let err = assert_err!(backend.client().submit_batch(&pdfs, &csv).await);
        assert!(matches!(err, WalletError::Api { status: 402, .. }));
        assert!(err.to_string().contains("insufficient credits"));
    }
}
