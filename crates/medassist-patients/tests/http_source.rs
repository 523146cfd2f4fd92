use std::sync::Arc;

use httpmock::prelude::*;
use medassist_core::models::patient::PatientStatus;
use medassist_patients::{
    FetchError, HttpPatientSource, LoadState, PatientSelector, PatientSource, StaticToken,
};
use serde_json::json;

#[tokio::test]
async fn fetch_sends_bearer_token_and_accept_header() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(Method::GET)
                .path("/api/patients")
                .header("authorization", "Bearer tok-123")
                .header("accept", "application/json");
            then.status(200)
                .json_body(json!([{ "id": "7", "first_name": "Anna" }]));
        })
        .await;

    let source = HttpPatientSource::new(&server.base_url(), "/api/patients");
    let response = source.fetch("tok-123").await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.status, 200);
    let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body[0]["first_name"], "Anna");
}

#[tokio::test]
async fn base_url_and_path_are_joined_with_one_slash() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(Method::GET).path("/v2/patients");
            then.status(200).body("[]");
        })
        .await;

    let base = format!("{}/", server.base_url());
    let source = HttpPatientSource::new(&base, "/v2/patients");
    assert_eq!(source.url(), server.url("/v2/patients"));

    let response = source.fetch("tok").await.unwrap();
    mock.assert_async().await;
    assert!(response.is_success());
}

#[tokio::test]
async fn non_success_status_and_body_pass_through() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(Method::GET).path("/api/patients");
            then.status(503).body("maintenance window");
        })
        .await;

    let source = HttpPatientSource::new(&server.base_url(), "/api/patients");
    let response = source.fetch("tok").await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.status, 503);
    assert!(!response.is_success());
    assert_eq!(response.body, b"maintenance window");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let source = HttpPatientSource::new("http://127.0.0.1:1", "/api/patients");
    let err = source.fetch("tok").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn selector_refreshes_over_http() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(Method::GET)
                .path("/api/patients")
                .header("authorization", "Bearer clinic-token");
            then.status(200).json_body(json!({
                "patients": [
                    { "id": 1, "user": { "firstName": "Marco", "lastName": "Rossi" } },
                    { "id": 2, "first_name": "Anna", "status": "critical" }
                ]
            }));
        })
        .await;

    let source = HttpPatientSource::new(&server.base_url(), "/api/patients");
    let selector = PatientSelector::new(
        Arc::new(source),
        Arc::new(StaticToken::new("clinic-token")),
    );
    let patients = selector.refresh().await.unwrap();

    mock.assert_async().await;
    assert_eq!(selector.load_state(), LoadState::Loaded);
    assert_eq!(patients.len(), 2);
    assert_eq!(patients[0].id, "1");
    assert_eq!(patients[0].display_name(), "Marco Rossi");
    assert_eq!(patients[1].status, PatientStatus::Critical);
}

#[tokio::test]
async fn selector_reports_http_failure_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(Method::GET).path("/api/patients");
            then.status(401).body("token expired");
        })
        .await;

    let source = HttpPatientSource::new(&server.base_url(), "/api/patients");
    let selector = PatientSelector::new(Arc::new(source), Arc::new(StaticToken::new("old")));
    let err = selector.refresh().await.unwrap_err();

    assert_eq!(
        err,
        FetchError::Status {
            status: 401,
            body: "token expired".to_string(),
        }
    );
    assert!(matches!(selector.load_state(), LoadState::Failed { .. }));
    assert!(selector.patients().is_empty());
}
