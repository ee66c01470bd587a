//! Progress stream integration tests
//!
//! Drive a full session (token exchange, stream, termination) against a
//! mock backend.

#[cfg(test)]
mod tests {
    use crate::common::{CREDENTIAL, MockBackend, RecordingObserver, SseBody, StateFactory};
    use std::sync::Arc;
    use std::time::Duration;
    use xertiq_wallet::config::ApiConfig;
    use xertiq_wallet::core::batch::SessionPhase;
    use xertiq_wallet::{BatchStatus, ProgressSnapshot, ProgressTracker, Termination, WalletClient};

    const SESSION: &str = "batch-42";

    async fn follow(backend: &MockBackend, tracker: &mut ProgressTracker) -> ProgressSnapshot {
        backend.client().track_batch(tracker, SESSION, None);
        tokio::time::timeout(Duration::from_secs(5), tracker.wait_terminated())
            .await
            .expect("session did not terminate")
            .expect("session was cancelled")
    }

    fn full_run() -> String {
        SseBody::new()
            .connected()
            .progress(&StateFactory::processing(3, 1))
            .progress(&StateFactory::processing(3, 2))
            .complete(&StateFactory::completed(3, 0))
            .build()
    }

    // ==================== Token Exchange ====================

    /// A failed token exchange falls back to the long-lived credential
    #[tokio::test]
    async fn test_token_failure_falls_back_to_credential() {
        let backend = MockBackend::start().await;
        backend.refuse_stream_token(500).await;
        backend.serve_progress(SESSION, CREDENTIAL, full_run()).await;

        let mut tracker = ProgressTracker::new();
        let snapshot = follow(&backend, &mut tracker).await;

        assert_eq!(snapshot.termination, Some(Termination::Completed));
        let state = snapshot.state.unwrap();
        assert_eq!(state.status, BatchStatus::Completed);
        assert_eq!(state.successful_documents, 3);
    }

    #[tokio::test]
    async fn test_short_lived_token_is_used() {
        let backend = MockBackend::start().await;
        backend.grant_stream_token("short-lived").await;
        backend.serve_progress(SESSION, "short-lived", full_run()).await;

        let mut tracker = ProgressTracker::new();
        let snapshot = follow(&backend, &mut tracker).await;

        assert_eq!(snapshot.termination, Some(Termination::Completed));
    }

    #[tokio::test]
    async fn test_no_credential_fails_session() {
        let backend = MockBackend::start().await;
        let client = WalletClient::new(ApiConfig {
            base_url: backend.server.uri(),
            credential: None,
            ..Default::default()
        })
        .unwrap();

        let mut tracker = ProgressTracker::new();
        let session = client.run_progress(tracker.begin(SESSION), None).await;

        assert!(matches!(
            session.termination(),
            Some(Termination::ConnectionFailed(_))
        ));
    }

    // ==================== Stream Lifecycle ====================

    #[tokio::test]
    async fn test_unknown_session_fails() {
        let backend = MockBackend::start().await;
        backend.grant_stream_token("short-lived").await;

        let observer = Arc::new(RecordingObserver::default());
        let mut tracker = ProgressTracker::new().with_observer(observer.clone());
        let snapshot = follow(&backend, &mut tracker).await;

        assert!(matches!(
            snapshot.termination,
            Some(Termination::ConnectionFailed(_))
        ));
        assert!(!snapshot.live);
        assert_eq!(observer.count("failed"), 1);
        assert_eq!(observer.count("live"), 0);
    }

    #[tokio::test]
    async fn test_stream_closed_before_complete_fails() {
        let backend = MockBackend::start().await;
        backend.grant_stream_token("short-lived").await;
        let body = SseBody::new()
            .connected()
            .progress(&StateFactory::processing(4, 2))
            .build();
        backend.serve_progress(SESSION, "short-lived", body).await;

        let mut tracker = ProgressTracker::new();
        let snapshot = follow(&backend, &mut tracker).await;

        assert_eq!(snapshot.phase, SessionPhase::Terminated);
        assert!(matches!(
            snapshot.termination,
            Some(Termination::ConnectionFailed(_))
        ));
        // the last good state is kept for display
        assert_eq!(snapshot.state.unwrap().processed_documents, 2);
    }

    #[tokio::test]
    async fn test_error_event_does_not_terminate() {
        let backend = MockBackend::start().await;
        backend.grant_stream_token("short-lived").await;
        let body = SseBody::new()
            .error("IPFS gateway slow")
            .progress(&StateFactory::processing(2, 1))
            .complete(&StateFactory::completed(2, 0))
            .build();
        backend.serve_progress(SESSION, "short-lived", body).await;

        let observer = Arc::new(RecordingObserver::default());
        let mut tracker = ProgressTracker::new().with_observer(observer.clone());
        let snapshot = follow(&backend, &mut tracker).await;

        assert_eq!(snapshot.termination, Some(Termination::Completed));
        assert_eq!(snapshot.last_error.as_deref(), Some("IPFS gateway slow"));
        assert_eq!(
            observer.calls(),
            vec![
                format!("live:{}", SESSION),
                "error:IPFS gateway slow".to_string(),
                "progress:1".to_string(),
                "complete:2".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_completion_then_disconnect_is_not_a_failure() {
        let backend = MockBackend::start().await;
        backend.grant_stream_token("short-lived").await;
        backend.serve_progress(SESSION, "short-lived", full_run()).await;

        let observer = Arc::new(RecordingObserver::default());
        let mut tracker = ProgressTracker::new().with_observer(observer.clone());
        let snapshot = follow(&backend, &mut tracker).await;

        assert_eq!(snapshot.termination, Some(Termination::Completed));
        assert!(snapshot.last_error.is_none());
        assert_eq!(observer.count("complete"), 1);
        assert_eq!(observer.count("failed"), 0);
    }

    // ==================== Malformed Payloads ====================

    #[tokio::test]
    async fn test_malformed_frames_are_dropped() {
        let backend = MockBackend::start().await;
        backend.grant_stream_token("short-lived").await;
        let body = SseBody::new()
            .comment("keep-alive")
            .raw("{not json")
            .raw(r#"{"type":"mystery"}"#)
            .raw(r#"{"type":"progress","data":{"totalDocuments":"many"}}"#)
            .progress(&StateFactory::processing(2, 1))
            .complete(&StateFactory::completed(1, 1))
            .build();
        backend.serve_progress(SESSION, "short-lived", body).await;

        let observer = Arc::new(RecordingObserver::default());
        let mut tracker = ProgressTracker::new().with_observer(observer.clone());
        let snapshot = follow(&backend, &mut tracker).await;

        assert_eq!(snapshot.termination, Some(Termination::Completed));
        assert_eq!(observer.count("progress"), 1);
        let state = snapshot.state.unwrap();
        assert_eq!(state.failed_documents, 1);
    }

    #[tokio::test]
    async fn test_regressing_counters_are_dropped() {
        let backend = MockBackend::start().await;
        backend.grant_stream_token("short-lived").await;
        let body = SseBody::new()
            .progress(&StateFactory::processing(3, 2))
            .progress(&StateFactory::processing(3, 1))
            .build();
        backend.serve_progress(SESSION, "short-lived", body).await;

        let observer = Arc::new(RecordingObserver::default());
        let mut tracker = ProgressTracker::new().with_observer(observer.clone());
        let snapshot = follow(&backend, &mut tracker).await;

        assert_eq!(snapshot.state.unwrap().processed_documents, 2);
        assert_eq!(observer.count("progress"), 1);
    }

    #[tokio::test]
    async fn test_inconsistent_complete_still_finishes_session() {
        let backend = MockBackend::start().await;
        backend.grant_stream_token("short-lived").await;
        let body = SseBody::new()
            .progress(&StateFactory::processing(3, 2))
            .complete(&StateFactory::completed(1, 0))
            .build();
        backend.serve_progress(SESSION, "short-lived", body).await;

        let observer = Arc::new(RecordingObserver::default());
        let mut tracker = ProgressTracker::new().with_observer(observer.clone());
        let snapshot = follow(&backend, &mut tracker).await;

        assert_eq!(snapshot.termination, Some(Termination::Completed));
        assert_eq!(snapshot.state.unwrap().processed_documents, 1);
        assert_eq!(observer.count("complete"), 1);
        assert_eq!(observer.count("failed"), 0);
    }

    // ==================== Ownership ====================

    #[tokio::test]
    async fn test_new_session_replaces_previous() {
        let backend = MockBackend::start().await;
        backend.grant_stream_token("short-lived").await;
        backend.serve_progress(SESSION, "short-lived", full_run()).await;

        let mut tracker = ProgressTracker::new();
        // nothing is served for the first session; it is replaced right away
        backend.client().track_batch(&mut tracker, "abandoned", None);
        let snapshot = follow(&backend, &mut tracker).await;

        assert_eq!(snapshot.session_id, SESSION);
        assert_eq!(snapshot.termination, Some(Termination::Completed));
        assert_eq!(tracker.snapshot().unwrap().session_id, SESSION);
    }
}
