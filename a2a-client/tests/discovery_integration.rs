//! Discovery and delegate calls against real loopback listeners.

use a2a_client::{A2AClient, A2AError, DiscoveryClient};
use a2a_types::{Message, MessageRole, Task, TaskResponse, TaskSendParams, TaskState};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL that refuses connections: bind a port, then release it.
async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn card_json(name: &str, url: &str) -> Value {
    json!({
        "name": name,
        "description": "test agent",
        "url": url,
        "version": "1.0.0",
        "capabilities": {"streaming": false},
        "skills": [{"id": "greet", "name": "Greet", "tags": ["greeting"]}]
    })
}

#[tokio::test]
async fn test_discovery_skips_unreachable_url() {
    let reachable = spawn(Router::new().route(
        "/.well-known/agent.json",
        get(|| async { Json(card_json("GreetingAgent", "http://127.0.0.1:1/")) }),
    ))
    .await;
    let unreachable = unreachable_url().await;

    let discovery = DiscoveryClient::new(vec![unreachable.clone(), format!("{}/", reachable)])
        .with_timeout(Duration::from_secs(2));
    let report = discovery.discover().await;

    assert_eq!(report.cards.len(), 1);
    assert!(report.cards.contains_key("GreetingAgent"));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].url, unreachable);
}

#[tokio::test]
async fn test_discovery_skips_malformed_document() {
    let malformed = spawn(Router::new().route(
        "/.well-known/agent.json",
        get(|| async { "definitely not json" }),
    ))
    .await;
    let wrong_shape = spawn(Router::new().route(
        "/.well-known/agent.json",
        get(|| async { Json(json!({"agents": 3})) }),
    ))
    .await;

    let report = DiscoveryClient::new(vec![malformed, wrong_shape]).discover().await;

    assert!(report.is_empty());
    assert_eq!(report.failures.len(), 2);
    assert!(report
        .failures
        .iter()
        .all(|f| matches!(f.error, A2AError::SerializationError { .. })));
}

#[tokio::test]
async fn test_discovery_merges_keyed_and_list_documents() {
    let keyed = spawn(Router::new().route(
        "/.well-known/agent.json",
        get(|| async {
            Json(json!({
                "greeter": card_json("GreetingAgent", "http://h/agents/greeter"),
                "moderator": card_json("ModeratorAgent", "http://h/agents/moderator")
            }))
        }),
    ))
    .await;
    let list = spawn(Router::new().route(
        "/.well-known/agent.json",
        get(|| async {
            Json(json!([
                card_json("EchoAgent", "http://echo/"),
                card_json("moderator", "http://later/")
            ]))
        }),
    ))
    .await;

    let cards = DiscoveryClient::new(vec![keyed, list]).list_agent_cards().await;

    let ids: Vec<&str> = cards.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["EchoAgent", "greeter", "moderator"]);
    // later source wins on duplicate ids
    assert_eq!(cards["moderator"].url, "http://later/");
}

#[tokio::test]
async fn test_discovery_with_no_urls_is_empty() {
    let report = DiscoveryClient::new(Vec::new()).discover().await;
    assert!(report.is_empty());
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_send_task_round_trip() {
    let base = spawn(Router::new().route(
        "/",
        post(|Json(params): Json<TaskSendParams>| async move {
            let mut task = Task::submitted(params.id.clone(), params.message);
            task.history
                .push(Message::agent_text(format!("echo from {}", params.session_id)));
            task.status = TaskState::Completed;
            Json(TaskResponse::success(Some(params.id.into()), task))
        }),
    ))
    .await;

    let client = A2AClient::new(format!("{}/", base)).unwrap();
    let task = client
        .send_task(TaskSendParams::new("t1", "s1", Message::user_text("hi")))
        .await
        .unwrap();

    assert_eq!(task.id, "t1");
    assert_eq!(task.status, TaskState::Completed);
    assert_eq!(task.history.len(), 2);
    assert_eq!(task.history[1].role, MessageRole::Agent);
    assert_eq!(task.history[1].text(), "echo from s1");
}

#[tokio::test]
async fn test_send_task_times_out() {
    let base = spawn(Router::new().route(
        "/",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({}))
        }),
    ))
    .await;

    let client = A2AClient::new(base)
        .unwrap()
        .with_timeout(Duration::from_millis(100));
    let err = client
        .send_task(TaskSendParams::new("t1", "s1", Message::user_text("hi")))
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_error_envelope_becomes_remote_agent_error() {
    let base = spawn(Router::new().route(
        "/",
        post(|| async {
            (
                axum::http::StatusCode::BAD_REQUEST,
                Json(json!({"id": null, "error": {"message": "bad envelope", "code": -32600}})),
            )
        }),
    ))
    .await;

    let client = A2AClient::new(base).unwrap();
    let err = client
        .send_task(TaskSendParams::new("t1", "s1", Message::user_text("hi")))
        .await
        .unwrap_err();

    match err {
        A2AError::RemoteAgentError { message, code } => {
            assert_eq!(message, "bad envelope");
            assert_eq!(code, Some(-32600));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_failed_remote_task_is_error_when_completion_expected() {
    let base = spawn(Router::new().route(
        "/",
        post(|Json(params): Json<TaskSendParams>| async move {
            let mut task = Task::submitted(params.id.clone(), params.message);
            task.history.push(Message::agent_text("Error processing request: boom"));
            task.status = TaskState::Failed;
            Json(TaskResponse::success(Some(params.id.into()), task))
        }),
    ))
    .await;

    let client = A2AClient::new(base).unwrap();
    let params = TaskSendParams::new("t1", "s1", Message::user_text("hi"));

    let task = client.send_task(params.clone()).await.unwrap();
    assert_eq!(task.status, TaskState::Failed);

    let err = client.send_task_expect_completed(params).await.unwrap_err();
    assert!(err.to_string().contains("boom"));
}
