#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.
//
// Covers the status-classification table (one classified error per received
// response, zero retries) and the request envelope: bearer auth header,
// pagination query parameters, JSON bodies.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use accessly_api::{ApiClient, Error, TokenCredentials};

// ── Helpers ─────────────────────────────────────────────────────────

fn credentials(token: &str) -> TokenCredentials {
    TokenCredentials::new(SecretString::from(token.to_string()), None)
}

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api/v1/developer", server.uri())).unwrap();
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        base_url,
        credentials("test-token"),
        3,
        Duration::from_secs(1),
    );
    (server, client)
}

// ── Success paths ───────────────────────────────────────────────────

#[tokio::test]
async fn get_returns_decoded_payload() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/developer/users"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "SUCCESS",
            "data": [{"id": "u1", "first_name": "Ada"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let payload = client.get("/users").await.unwrap();
    assert_eq!(payload.get("code").and_then(Value::as_str), Some("SUCCESS"));
    assert_eq!(payload.get("data").unwrap().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn pagination_params_are_sent_as_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/developer/visitors"))
        .and(query_param("limit", "25"))
        .and(query_param("offset", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    client
        .get_with_params(
            "/visitors",
            &[("limit", "25".to_string()), ("offset", "50".to_string())],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn post_sends_json_body_and_accepts_201() {
    let (server, client) = setup().await;

    let body = json!({"first_name": "Grace", "last_name": "Hopper"});

    Mock::given(method("POST"))
        .and(path("/api/v1/developer/users"))
        .and(body_json(&body))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "u9"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let payload = client.post("/users", &body).await.unwrap();
    assert_eq!(
        payload.get("data").and_then(|d| d.get("id")),
        Some(&json!("u9"))
    );
}

#[tokio::test]
async fn empty_body_decodes_to_empty_object() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/developer/visitors/v1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let payload = client.delete("/visitors/v1").await.unwrap();
    assert!(payload.is_empty());
}

// ── Classification: every received response, exactly one error ──────

#[tokio::test]
async fn each_error_status_yields_one_classified_error_without_retry() {
    let cases: [(u16, &str); 6] = [
        (400, "validation"),
        (401, "authentication"),
        (403, "permission"),
        (404, "not_found"),
        (429, "rate_limit"),
        (500, "api_error"),
    ];

    for (status, kind) in cases {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/developer/doors"))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({"message": "nope"})),
            )
            .expect(1) // application-level failures are never retried
            .mount(&server)
            .await;

        let err = client.get("/doors").await.unwrap_err();
        assert_eq!(err.kind(), kind, "status {status}");
        assert_eq!(err.status(), Some(status), "status {status}");
        server.verify().await;
    }
}

#[tokio::test]
async fn rate_limit_is_surfaced_not_absorbed() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/developer/users"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"message": "slow down"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client.get("/users").await.unwrap_err();
    assert!(matches!(err, Error::RateLimit { .. }));
    assert!(err.to_string().contains("slow down"));
}

#[tokio::test]
async fn unparsable_body_is_wrapped_not_fatal() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/developer/users"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("<html>Internal Server Error</html>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client.get("/users").await.unwrap_err();
    let body = err.body().expect("classified errors carry the body");
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("<html>Internal Server Error</html>")
    );
}

#[tokio::test]
async fn unparsable_success_body_is_wrapped_too() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/developer/doors"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let payload = client.get("/doors").await.unwrap();
    assert_eq!(payload.get("message").and_then(Value::as_str), Some("OK"));
}

// ── Authentication precondition ─────────────────────────────────────

#[tokio::test]
async fn missing_token_fails_before_any_network_attempt() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api/v1/developer", server.uri())).unwrap();
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        base_url,
        credentials(""),
        3,
        Duration::from_secs(1),
    );

    let err = client.get("/users").await.unwrap_err();
    assert!(matches!(err, Error::Authentication { status: None, .. }));

    // No request may reach the server.
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn rotated_token_is_used_on_subsequent_requests() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api/v1/developer", server.uri())).unwrap();
    let mut client = ApiClient::with_client(
        reqwest::Client::new(),
        base_url,
        credentials("stale"),
        0,
        Duration::from_millis(1),
    );

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    client.authenticate(SecretString::from("fresh".to_string()), None);
    client.get("/users").await.unwrap();
}
