//! Mock wallet backend built on wiremock

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xertiq_wallet::{ConfigBuilder, WalletClient, WalletConfig};

/// Long-lived credential every mock expects
pub const CREDENTIAL: &str = "long-lived-credential";

/// A running mock backend and a client pointed at it
pub struct MockBackend {
    pub server: MockServer,
}

impl MockBackend {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn config(&self) -> WalletConfig {
        ConfigBuilder::new()
            .base_url(&self.server.uri())
            .credential(CREDENTIAL)
            .request_timeout(5)
            .polling(5, 5)
            .build()
    }

    pub fn client(&self) -> WalletClient {
        WalletClient::new(self.config().api).expect("mock client")
    }

    /// `POST /batch/sse-token` answers with `token`
    pub async fn grant_stream_token(&self, token: &str) {
        Mock::given(method("POST"))
            .and(path("/batch/sse-token"))
            .and(header("authorization", format!("Bearer {}", CREDENTIAL).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
            .mount(&self.server)
            .await;
    }

    /// `POST /batch/sse-token` fails with `status`
    pub async fn refuse_stream_token(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/batch/sse-token"))
            .respond_with(ResponseTemplate::new(status).set_body_string("token service down"))
            .mount(&self.server)
            .await;
    }

    /// Serve `body` as the progress stream of `session_id`, only for `token`
    pub async fn serve_progress(&self, session_id: &str, token: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(format!("/batch/progress/{}", session_id)))
            .and(query_param("token", token))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/event-stream"),
            )
            .mount(&self.server)
            .await;
    }
}
