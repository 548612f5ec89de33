// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crewdeck_core::domain::client_config::ClientConfig;
use crewdeck_core::domain::inference::{ExecutionRequest, InferenceError, InferenceService};
use crewdeck_core::domain::mission::MissionId;
use crewdeck_core::infrastructure::HttpInferenceClient;
use mockito::Matcher;
use serde_json::json;

fn client(server: &mockito::ServerGuard) -> HttpInferenceClient {
    let config = ClientConfig::new("https://crud.example.com/prod/", server.url());
    HttpInferenceClient::new(&config).unwrap()
}

fn request() -> ExecutionRequest {
    ExecutionRequest {
        id: MissionId::from("42"),
        api_endpoint: "https://crud.example.com/prod".into(),
    }
}

#[tokio::test]
async fn test_successful_run_returns_raw_outputs() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/results")
        .match_body(Matcher::Json(json!({"id": "42", "apiEndpoint": "https://crud.example.com/prod"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "results": "Newsletter ready",
                "task_outputs": ["events", "{\"type\":\"image\",\"data\":\"iVBORw0KGgo\"}"],
                "execution_time": 31.7
            })
            .to_string(),
        )
        .create_async()
        .await;

    let response = client(&server).run_mission(&request()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.results, "Newsletter ready");
    assert_eq!(response.task_outputs.len(), 2);
    assert_eq!(response.execution_time, 31.7);
}

#[tokio::test]
async fn test_gateway_timeout_is_upstream_timeout() {
    let mut server = mockito::Server::new_async().await;
    server.mock("POST", "/results").with_status(504).create_async().await;

    let err = client(&server).run_mission(&request()).await.unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_other_statuses_keep_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/results")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let err = client(&server).run_mission(&request()).await.unwrap_err();
    match err {
        InferenceError::Http { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_is_invalid_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/results")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client(&server).run_mission(&request()).await.unwrap_err();
    assert!(matches!(err, InferenceError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let config = ClientConfig::new("https://crud.example.com", "http://127.0.0.1:1");
    let client = HttpInferenceClient::new(&config).unwrap();

    let err = client.run_mission(&request()).await.unwrap_err();
    assert!(matches!(err, InferenceError::Network(_)));
}
