#![allow(clippy::unwrap_used)]
// Integration tests for `AccessDirectory` using wiremock.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use accessly_core::api::{ApiClient, TokenCredentials};
use accessly_core::{AccessDirectory, ClientConfig, CoreError, CreateVisitorRequest};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AccessDirectory) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api/v1/developer", server.uri())).unwrap();
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        base_url,
        TokenCredentials::new(SecretString::from("test-token".to_string()), None),
        0,
        Duration::from_millis(1),
    );
    let config = ClientConfig::new("127.0.0.1", SecretString::from("test-token".to_string()));
    (server, AccessDirectory::from_parts(client, config))
}

// ── Users ───────────────────────────────────────────────────────────

#[tokio::test]
async fn lists_users_with_pagination() {
    let (server, directory) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/developer/users"))
        .and(query_param("limit", "100"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "SUCCESS",
            "data": [
                {"id": "u1", "first_name": "Ada", "last_name": "Lovelace", "role": "admin"},
                {"id": "u2", "first_name": "Grace", "last_name": "Hopper"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let users = directory.users(100, 0).await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].full_name(), "Ada Lovelace");
}

#[tokio::test]
async fn fetches_a_single_user() {
    let (server, directory) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/developer/users/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "u1", "first_name": "Ada", "last_name": "Lovelace"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = directory.user("u1").await.unwrap();
    assert_eq!(user.id, "u1");
}

// ── Visitors ────────────────────────────────────────────────────────

#[tokio::test]
async fn creates_a_visitor_with_the_expected_payload() {
    let (server, directory) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/developer/visitors"))
        .and(body_partial_json(json!({
            "first_name": "Jo",
            "last_name": "Walker",
            "is_active": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {
                "id": "v1",
                "first_name": "Jo",
                "last_name": "Walker",
                "status": "UPCOMING",
                "start_time": 1_767_225_600,
                "end_time": 1_767_312_000
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CreateVisitorRequest {
        first_name: "Jo".into(),
        last_name: "Walker".into(),
        start_date: chrono::Utc::now(),
        end_date: chrono::Utc::now() + chrono::Duration::hours(8),
        email: None,
        phone: None,
        access_policy_ids: Vec::new(),
        sponsor_user_id: None,
        notes: None,
    };

    let visitor = directory.create_visitor(&request).await.unwrap();
    assert_eq!(visitor.id, "v1");
    assert!(visitor.is_active);
}

#[tokio::test]
async fn pin_assignment_checks_the_result_code() {
    let (server, directory) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/developer/visitors/v1/pin_codes"))
        .and(body_partial_json(json!({"pin_code": "4321"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "SUCCESS"})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(directory.set_visitor_pin("v1", "4321").await.unwrap());
}

#[tokio::test]
async fn delete_visitor_tolerates_empty_bodies() {
    let (server, directory) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/developer/visitors/v1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    directory.delete_visitor("v1").await.unwrap();
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn devices_flatten_the_nested_array_shape() {
    let (server, directory) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/developer/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                [
                    {"id": "dev1", "name": "Hub", "type": "UAH"},
                    {"id": "dev2", "name": "Reader", "type": "UA-G2"}
                ],
                [
                    {"id": "dev3", "name": "Cam", "type": "CAMERA"}
                ]
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let devices = directory.devices(100, 0).await.unwrap();
    assert_eq!(devices.len(), 3);
    assert_eq!(devices[2].id, "dev3");
}

#[tokio::test]
async fn devices_accept_a_flat_array_too() {
    let (server, directory) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/developer/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "dev1", "name": "Hub", "type": "UAH"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let devices = directory.devices(100, 0).await.unwrap();
    assert_eq!(devices.len(), 1);
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn missing_resources_surface_as_not_found() {
    let (server, directory) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/developer/doors/nope"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "door not found"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = directory.door("nope").await.unwrap_err();
    match err {
        CoreError::NotFound { message } => assert_eq!(message, "door not found"),
        other => panic!("expected NotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn unsupported_operations_fail_without_a_request() {
    let (server, directory) = setup().await;

    assert!(matches!(
        directory.unlock_door("d1", 10),
        Err(CoreError::Unsupported { .. })
    ));
    assert!(matches!(
        directory.schedules(),
        Err(CoreError::Unsupported { .. })
    ));
    assert!(matches!(
        directory.access_events(),
        Err(CoreError::Unsupported { .. })
    ));

    assert!(server.received_requests().await.unwrap().is_empty());
}
