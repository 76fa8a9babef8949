//! Tests for EmailVerificationClient against a wiremock server.
//!
//! Verifies request construction (path, api_key and email query params),
//! the validity rule, and the mapping of every failure class into a
//! `VerificationFailure` rather than an error.

use std::time::Duration;

use signup_client::{
    Deliverability, EmailVerificationClient, EmailVerifier, ServiceConfig, VerificationFailure,
    VerificationOutcome,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> EmailVerificationClient {
    let config = ServiceConfig::local_mock(&server.uri(), "http://127.0.0.1:1", "test-key")
        .expect("config");
    EmailVerificationClient::new(&config).expect("client build")
}

fn body(valid_format: bool, deliverability: &str) -> serde_json::Value {
    serde_json::json!({
        "email": "user@example.com",
        "autocorrect": "",
        "deliverability": deliverability,
        "quality_score": "0.80",
        "is_valid_format": {"value": valid_format, "text": valid_format.to_string().to_uppercase()},
        "is_free_email": {"value": true, "text": "TRUE"},
        "is_disposable_email": {"value": false, "text": "FALSE"}
    })
}

#[tokio::test]
async fn deliverable_address_is_valid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("email", "user@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body(true, "DELIVERABLE")))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server).verify("user@example.com").await;
    let VerificationOutcome::Checked(report) = outcome else {
        panic!("expected a report, got {outcome:?}");
    };
    assert!(report.valid);
    assert!(report.free_provider);
    assert!(!report.disposable);
    assert_eq!(report.deliverability, Deliverability::Deliverable);
    assert_eq!(report.details["quality_score"], "0.80");
}

#[tokio::test]
async fn undeliverable_address_is_checked_but_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body(true, "UNDELIVERABLE")))
        .mount(&server)
        .await;

    let outcome = client_for(&server).verify("user@example.com").await;
    assert!(!outcome.is_valid());
    assert!(matches!(
        outcome,
        VerificationOutcome::Checked(ref r) if r.deliverability == Deliverability::Undeliverable
    ));
}

#[tokio::test]
async fn email_is_trimmed_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("email", "user@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body(true, "DELIVERABLE")))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client_for(&server).verify("  user@example.com ").await.is_valid());
}

#[tokio::test]
async fn unauthorized_maps_to_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    assert_eq!(
        client_for(&server).verify("user@example.com").await,
        VerificationOutcome::Failed(VerificationFailure::Unauthorized { status: 401 })
    );
}

#[tokio::test]
async fn rate_limit_maps_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(
        client_for(&server).verify("user@example.com").await,
        VerificationOutcome::Failed(VerificationFailure::RateLimited)
    );
}

#[tokio::test]
async fn server_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    assert_eq!(
        client_for(&server).verify("user@example.com").await,
        VerificationOutcome::Failed(VerificationFailure::Upstream {
            status: 503,
            body: "maintenance".into()
        })
    );
}

#[tokio::test]
async fn garbage_body_maps_to_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let outcome = client_for(&server).verify("user@example.com").await;
    assert!(matches!(
        outcome,
        VerificationOutcome::Failed(VerificationFailure::Parse { .. })
    ));
}

#[tokio::test]
async fn slow_service_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body(true, "DELIVERABLE"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config =
        ServiceConfig::local_mock(&server.uri(), "http://127.0.0.1:1", "test-key").unwrap();
    config.timeout_secs = 1;
    let client = EmailVerificationClient::new(&config).unwrap();

    assert_eq!(
        client.verify("user@example.com").await,
        VerificationOutcome::Failed(VerificationFailure::Timeout { elapsed_ms: 1000 })
    );
}

#[tokio::test]
async fn unreachable_service_maps_to_transport() {
    let config =
        ServiceConfig::local_mock("http://127.0.0.1:1", "http://127.0.0.1:1", "test-key").unwrap();
    let client = EmailVerificationClient::new(&config).unwrap();

    let outcome = client.verify("user@example.com").await;
    assert!(matches!(
        outcome,
        VerificationOutcome::Failed(VerificationFailure::Transport { .. })
    ));
}
