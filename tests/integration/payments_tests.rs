//! Credits and payment integration tests

#[cfg(test)]
mod tests {
    use crate::common::{CREDENTIAL, MockBackend};
    use crate::{assert_err, assert_ok};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, ResponseTemplate};
    use xertiq_wallet::WalletError;
    use xertiq_wallet::utils::{CancelFlag, PollOutcome};

    async fn mount_json(backend: &MockBackend, route: &str, body: serde_json::Value, times: Option<u64>) {
        let mock = Mock::given(method("GET"))
            .and(path(route))
            .and(header("authorization", format!("Bearer {}", CREDENTIAL).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body));
        let mock = match times {
            Some(n) => mock.up_to_n_times(n),
            None => mock,
        };
        mock.mount(&backend.server).await;
    }

    #[tokio::test]
    async fn test_credit_balance() {
        let backend = MockBackend::start().await;
        mount_json(&backend, "/credits/balance", json!({ "credits": 120 }), None).await;

        let credits = assert_ok!(backend.client().credit_balance().await);
        assert_eq!(credits, 120);
    }

    #[tokio::test]
    async fn test_rejected_credential_is_auth_error() {
        let backend = MockBackend::start().await;
        Mock::given(method("GET"))
            .and(path("/credits/balance"))
            .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
            .mount(&backend.server)
            .await;

        let err = assert_err!(backend.client().credit_balance().await);
        assert!(err.is_auth_error());
        assert!(err.to_string().contains("token expired"));
    }

    #[tokio::test]
    async fn test_await_payment_until_paid() {
        let backend = MockBackend::start().await;
        let route = "/payments/session/cs_test_1";
        mount_json(&backend, route, json!({ "status": "open" }), Some(2)).await;
        mount_json(&backend, route, json!({ "status": "paid", "credits": 50 }), None).await;

        let config = backend.config();
        let outcome = backend
            .client()
            .await_payment("cs_test_1", &config.polling.policy(), &CancelFlag::new())
            .await
            .unwrap();

        match outcome {
            PollOutcome::Ready { value, attempts } => {
                assert_eq!(attempts, 3);
                assert_eq!(value.credits, Some(50));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_expired_checkout_stops_polling() {
        let backend = MockBackend::start().await;
        mount_json(
            &backend,
            "/payments/session/cs_test_2",
            json!({ "status": "expired" }),
            None,
        )
        .await;

        let config = backend.config();
        let result = backend
            .client()
            .await_payment("cs_test_2", &config.polling.policy(), &CancelFlag::new())
            .await;

        assert!(matches!(result, Err(WalletError::Payment(_))));
    }

    #[tokio::test]
    async fn test_await_payment_exhausted() {
        let backend = MockBackend::start().await;
        mount_json(
            &backend,
            "/payments/session/cs_test_3",
            json!({ "status": "open" }),
            None,
        )
        .await;

        let config = backend.config();
        let outcome = backend
            .client()
            .await_payment("cs_test_3", &config.polling.policy(), &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(
            outcome.attempts(),
            config.polling.max_attempts,
        );
        assert!(outcome.into_value().is_none());
    }

    #[tokio::test]
    async fn test_await_credit_change_survives_server_errors() {
        let backend = MockBackend::start().await;
        Mock::given(method("GET"))
            .and(path("/credits/balance"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&backend.server)
            .await;
        mount_json(&backend, "/credits/balance", json!({ "credits": 10 }), Some(1)).await;
        mount_json(&backend, "/credits/balance", json!({ "credits": 35 }), None).await;

        let config = backend.config();
        let outcome = backend
            .client()
            .await_credit_change(10, &config.polling.policy(), &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PollOutcome::Ready {
                value: 35,
                attempts: 3
            }
        );
    }

    #[tokio::test]
    async fn test_cancelled_before_first_probe() {
        let backend = MockBackend::start().await;
        let cancel = CancelFlag::new();
        cancel.cancel();

        let config = backend.config();
        let outcome = backend
            .client()
            .await_payment("cs_test_4", &config.polling.policy(), &cancel)
            .await
            .unwrap();

        assert_eq!(outcome.attempts(), 0);
        assert!(matches!(outcome, PollOutcome::Cancelled { .. }));
    }
}
