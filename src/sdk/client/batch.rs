//! Batch upload and progress streaming

use super::client::{WalletClient, check_response};
use super::types::{StreamTokenResponse, UploadResponse};
use crate::core::batch::{ProgressSession, ProgressTracker, SessionSink};
use crate::core::streaming::ProgressEventStream;
use crate::utils::error::{Result, WalletError};
use futures::StreamExt;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

impl WalletClient {
    /// Upload PDFs with their metadata CSV and start a batch.
    ///
    /// Returns the session id used to follow progress.
    pub async fn submit_batch(&self, pdfs: &[PathBuf], csv: &Path) -> Result<UploadResponse> {
        if pdfs.is_empty() {
            return Err(WalletError::validation("No PDF files to upload"));
        }

        let mut form = Form::new();
        for pdf in pdfs {
            form = form.part("files", file_part(pdf, "application/pdf").await?);
        }
        form = form.part("csv", file_part(csv, "text/csv").await?);

        info!("Uploading batch of {} documents", pdfs.len());
        let request = self
            .authorized(Method::POST, self.endpoint(&["batch", "upload"])?)?
            .multipart(form);
        let upload: UploadResponse = self.send_json(request).await?;

        info!("Batch accepted, session {}", upload.session_id);
        Ok(upload)
    }

    /// Exchange the long-lived credential for a short-lived stream token
    pub async fn request_stream_token(&self) -> Result<String> {
        let request = self.authorized(Method::POST, self.endpoint(&["batch", "sse-token"])?)?;
        let body: StreamTokenResponse = self.send_json(request).await?;

        if body.token.trim().is_empty() {
            return Err(WalletError::auth("Backend returned an empty stream token"));
        }
        debug!("Obtained short-lived stream token");
        Ok(body.token)
    }

    /// Stream token, or the long-lived credential when the exchange fails
    pub async fn stream_token_or_fallback(&self) -> Result<String> {
        match self.request_stream_token().await {
            Ok(token) => Ok(token),
            Err(e) => {
                warn!(
                    "Stream token exchange failed, using long-lived credential: {}",
                    e
                );
                Ok(self.credential()?.to_string())
            }
        }
    }

    /// Open the progress event stream for `session_id`.
    ///
    /// The token travels as a query parameter. No request timeout applies.
    pub async fn open_progress_stream(
        &self,
        session_id: &str,
        token: &str,
    ) -> Result<ProgressEventStream> {
        let mut url = self.endpoint(&["batch", "progress", session_id])?;
        url.query_pairs_mut().append_pair("token", token);

        debug!("Opening progress stream for session {}", session_id);
        let response = self
            .http_client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;
        let response = check_response(response).await?;

        Ok(ProgressEventStream::from_response(response))
    }

    /// Drive one session from token exchange to termination.
    ///
    /// Malformed frames are dropped. A transport error, end of stream or
    /// an idle gap longer than `idle_timeout` before `complete` fails the
    /// session. The connection is dropped as soon as the session ends or
    /// is cancelled.
    pub async fn run_progress(
        &self,
        mut sink: SessionSink,
        idle_timeout: Option<Duration>,
    ) -> ProgressSession {
        let session_id = sink.session_id().to_string();

        sink.begin_token_exchange();
        let token = match self.stream_token_or_fallback().await {
            Ok(token) => token,
            Err(e) => {
                sink.connection_error(e.to_string());
                return sink.session().clone();
            }
        };

        if sink.is_cancelled() {
            return sink.session().clone();
        }

        sink.begin_connect();
        let mut events = match self.open_progress_stream(&session_id, &token).await {
            Ok(events) => events,
            Err(e) => {
                sink.connection_error(e.to_string());
                return sink.session().clone();
            }
        };
        sink.on_open();

        loop {
            if sink.is_cancelled() {
                debug!("Session {} cancelled, closing stream", session_id);
                break;
            }

            let next = match idle_timeout {
                Some(limit) => match tokio::time::timeout(limit, events.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        sink.connection_error(format!("No progress events for {:?}", limit));
                        break;
                    }
                },
                None => events.next().await,
            };

            match next {
                Some(Ok(event)) => {
                    sink.dispatch(event);
                    if sink.is_terminated() {
                        break;
                    }
                }
                Some(Err(WalletError::Parsing(reason))) => {
                    warn!(
                        "Dropping malformed progress frame for session {}: {}",
                        session_id, reason
                    );
                }
                Some(Err(e)) => {
                    sink.connection_error(e.to_string());
                    break;
                }
                None => {
                    sink.connection_error("Progress stream closed before completion");
                    break;
                }
            }
        }

        sink.session().clone()
    }

    /// Follow `session_id` on a background task owned by `tracker`.
    ///
    /// Any session the tracker was following is cancelled first.
    pub fn track_batch<S: Into<String>>(
        &self,
        tracker: &mut ProgressTracker,
        session_id: S,
        idle_timeout: Option<Duration>,
    ) {
        let client = self.clone();
        tracker.spawn(session_id, move |sink| async move {
            client.run_progress(sink, idle_timeout).await;
        });
    }
}

async fn file_part(path: &Path, mime: &str) -> Result<Part> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| WalletError::validation(format!("Invalid file name: {:?}", path)))?
        .to_string();
    let bytes = tokio::fs::read(path).await?;

    Part::bytes(bytes)
        .file_name(name)
        .mime_str(mime)
        .map_err(WalletError::from)
}
