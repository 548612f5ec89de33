// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crewdeck_core::domain::agent::{AgentDraft, AgentId, AgentTool};
use crewdeck_core::domain::client_config::ClientConfig;
use crewdeck_core::domain::mission::{MissionId, ProcessMode};
use crewdeck_core::domain::repository::{AgentStore, MissionStore, RepositoryError, TaskStore};
use crewdeck_core::domain::task::TaskId;
use crewdeck_core::infrastructure::HttpStoreClient;
use mockito::Matcher;
use serde_json::json;

fn client(server: &mockito::ServerGuard) -> HttpStoreClient {
    let config = ClientConfig::new(server.url(), "http://inference.invalid");
    HttpStoreClient::new(&config).unwrap()
}

fn envelope(items: serde_json::Value) -> String {
    json!({
        "isBase64Encoded": true,
        "statusCode": 200,
        "body": items.to_string(),
        "headers": {"Content-Type": "application/json"}
    })
    .to_string()
}

#[tokio::test]
async fn test_list_agents_decodes_double_encoded_envelope() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/agents")
        .with_status(200)
        .with_body(envelope(json!([
            {"id": {"S": "415"}, "role": {"S": "NPC Sculptor"}, "goal": {"S": "Draw"},
             "backstory": {"S": "Artist"}, "allow_delegation": {"BOOL": false},
             "tools": {"L": [{"S": "ImageGenerator"}]}},
            {"id": {"S": "416"}, "role": {"S": "Writer"}}
        ])))
        .create_async()
        .await;

    let agents = AgentStore::list(&client(&server)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(agents.len(), 2);
    let sculptor = agents.iter().find(|a| a.id.as_str() == "415").unwrap();
    assert!(sculptor.has_tool(AgentTool::ImageGenerator));
    let writer = agents.iter().find(|a| a.id.as_str() == "416").unwrap();
    assert_eq!(writer.goal, "");
    assert!(!writer.allow_delegation);
}

#[tokio::test]
async fn test_list_missions_reads_process_and_order() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/missions")
        .with_status(200)
        .with_body(envelope(json!([{
            "id": {"S": "9"}, "name": {"S": "Snake"}, "game": {"S": "A snake game"},
            "agents": {"L": [{"S": "1"}]}, "tasks": {"L": [{"S": "t3"}, {"S": "t1"}, {"S": "t2"}]},
            "process": {"S": "hierarchical"}, "results": {"S": ""}
        }])))
        .create_async()
        .await;

    let missions = MissionStore::list(&client(&server)).await.unwrap();

    assert_eq!(missions[0].process, ProcessMode::Hierarchical);
    let order: Vec<&str> = missions[0].tasks.iter().map(|t| t.as_str()).collect();
    assert_eq!(order, ["t3", "t1", "t2"]);
}

#[tokio::test]
async fn test_envelope_error_status_is_transport_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_body(json!({"statusCode": 500, "body": "ResourceNotFoundException"}).to_string())
        .create_async()
        .await;

    let err = TaskStore::list(&client(&server)).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Transport(msg) if msg.contains("ResourceNotFoundException")));
}

#[tokio::test]
async fn test_unparseable_body_is_codec_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let err = TaskStore::list(&client(&server)).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Codec(_)));
}

#[tokio::test]
async fn test_create_agent_posts_plain_json() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/agents")
        .match_body(Matcher::Json(json!({
            "id": "12",
            "role": "Copy Writer",
            "goal": "Write descriptions",
            "backstory": "Writes",
            "allow_delegation": false,
            "tools": ["CodeInterpreter"]
        })))
        .with_status(200)
        .with_body(json!({"statusCode": 200, "body": "\"Agent created\""}).to_string())
        .create_async()
        .await;

    let agent = AgentDraft::new("Copy Writer", "Write descriptions", "Writes")
        .with_tool(AgentTool::CodeInterpreter)
        .into_agent(AgentId::from("12"));
    AgentStore::create(&client(&server), &agent).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_put_failure_status_is_transport_error() {
    let mut server = mockito::Server::new_async().await;
    server.mock("PUT", "/agents").with_status(502).create_async().await;

    let agent = AgentDraft::new("Writer", "g", "b").into_agent(AgentId::from("1"));
    let err = AgentStore::put(&client(&server), &agent).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Transport(_)));
}

#[tokio::test]
async fn test_mission_batch_delete_continues_past_failures() {
    let mut server = mockito::Server::new_async().await;
    let ok = server
        .mock("DELETE", "/missions")
        .match_body(Matcher::AnyOf(vec![
            Matcher::Json(json!({"ids": ["a"]})),
            Matcher::Json(json!({"ids": ["b"]})),
        ]))
        .with_status(200)
        .expect(2)
        .create_async()
        .await;
    let failing = server
        .mock("DELETE", "/missions")
        .match_body(Matcher::Json(json!({"ids": ["broken"]})))
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let report = MissionStore::delete(
        &client(&server),
        &[MissionId::from("a"), MissionId::from("broken"), MissionId::from("b")],
    )
    .await;

    ok.assert_async().await;
    failing.assert_async().await;
    assert_eq!(report.requested, 3);
    assert_eq!(report.failed, 1);
}

#[tokio::test]
async fn test_task_delete_sends_single_id_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/tasks")
        .match_body(Matcher::Json(json!({"id": "77"})))
        .with_status(200)
        .create_async()
        .await;

    let report = TaskStore::delete(&client(&server), &[TaskId::from("77")]).await;

    mock.assert_async().await;
    assert!(report.is_clean());
}
