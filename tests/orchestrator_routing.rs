//! Orchestrator delegation against delegates listening on loopback.

use a2a_types::{
    AgentCard, Message, Task, TaskMetadata, TaskResponse, TaskSendParams, TaskState,
};
use a2a_client::A2AClient;
use axum::routing::post;
use axum::{Json, Router};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use taskmesh::agents::RemoteAgent;
use taskmesh::registry::AgentTable;
use taskmesh::{
    AgentRegistry, AgentTaskManager, InMemoryTaskStore, OrchestratorAgent, TaskManager,
};
use tokio::net::TcpListener;

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/", addr)
}

fn reply(params: TaskSendParams, state: TaskState, text: String) -> Json<TaskResponse> {
    let mut task = Task::submitted(params.id.clone(), params.message);
    task.history.push(Message::agent_text(text));
    task.status = state;
    Json(TaskResponse::success(Some(params.id.into()), task))
}

/// Delegate that answers `"{prefix}: {query}"`, noting any UTG it was sent.
async fn echo_delegate(prefix: &'static str) -> String {
    spawn(Router::new().route(
        "/",
        post(move |Json(params): Json<TaskSendParams>| async move {
            let query = params.message.text();
            let utg = params
                .metadata
                .as_ref()
                .and_then(|m| m.utg.as_ref())
                .map(|t| format!(" [utg {}]", t.transition_reason))
                .unwrap_or_default();
            reply(params, TaskState::Completed, format!("{prefix}: {query}{utg}"))
        }),
    ))
    .await
}

/// Delegate that finalizes every task as `FAILED`.
async fn failing_delegate() -> String {
    spawn(Router::new().route(
        "/",
        post(|Json(params): Json<TaskSendParams>| async move {
            reply(
                params,
                TaskState::Failed,
                "Error processing request: upstream down".to_string(),
            )
        }),
    ))
    .await
}

fn card(name: &str, url: &str, tags: &[&str]) -> AgentCard {
    AgentCard::new(name, "delegate", "1.0.0", url).add_skill_with("main", "Main", |s| {
        s.with_tags(tags.iter().map(|t| t.to_string()).collect())
    })
}

fn host(orchestrator: OrchestratorAgent) -> AgentTaskManager {
    AgentTaskManager::new(
        AgentCard::new("HostAgent", "routes", "1.0.0", "http://localhost/"),
        Arc::new(InMemoryTaskStore::new()),
        Arc::new(orchestrator),
    )
}

async fn send(manager: &AgentTaskManager, id: &str, text: &str) -> Task {
    manager
        .on_send_task(TaskSendParams::new(id, "s1", Message::user_text(text)))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_routes_by_skill_tag_and_falls_back_to_default() {
    let greeter = echo_delegate("greeter").await;
    let moderator = echo_delegate("moderator").await;

    let registry = Arc::new(AgentRegistry::from_cards(AgentTable::from([
        ("greeter".to_string(), card("GreetingAgent", &greeter, &["hello"])),
        ("moderator".to_string(), card("ModeratorAgent", &moderator, &["feedback"])),
    ])));
    let orchestrator =
        OrchestratorAgent::new("HostAgent", registry).with_default_agent("moderator");
    let manager = host(orchestrator);

    let task = send(&manager, "t1", "hello world").await;
    assert_eq!(task.status, TaskState::Completed);
    assert_eq!(task.history.len(), 2);
    assert_eq!(task.history[1].text(), "greeter: hello world");

    let task = send(&manager, "t2", "something else").await;
    assert_eq!(task.status, TaskState::Completed);
    assert_eq!(task.history[1].text(), "moderator: something else");
}

#[tokio::test]
async fn test_metadata_is_forwarded_to_delegate() {
    let moderator = echo_delegate("moderator").await;
    let registry = Arc::new(AgentRegistry::from_cards(AgentTable::from([(
        "moderator".to_string(),
        card("ModeratorAgent", &moderator, &["feedback"]),
    )])));
    let manager = host(
        OrchestratorAgent::new("HostAgent", registry)
            .with_default_agent("moderator"),
    );

    let metadata: TaskMetadata = serde_json::from_value(serde_json::json!({
        "utg": {
            "current_state": "Home",
            "next_state": "Settings",
            "transition_reason": "error"
        }
    }))
    .unwrap();
    let task = manager
        .on_send_task(
            TaskSendParams::new("t1", "s1", Message::user_text("check")).with_metadata(metadata),
        )
        .await
        .unwrap();

    assert_eq!(task.history[1].text(), "moderator: check [utg error]");
}

#[tokio::test]
async fn test_delegate_timeout_fails_task() {
    let slow = spawn(Router::new().route(
        "/",
        post(|Json(params): Json<TaskSendParams>| async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            reply(params, TaskState::Completed, "late".to_string())
        }),
    ))
    .await;

    let registry = Arc::new(AgentRegistry::from_cards(AgentTable::from([(
        "slow".to_string(),
        card("SlowAgent", &slow, &["hello"]),
    )])));
    let orchestrator = OrchestratorAgent::new("HostAgent", registry)
        .with_delegate_timeout(Duration::from_millis(100));
    let manager = host(orchestrator);

    let task = send(&manager, "t1", "hello").await;

    assert_eq!(task.status, TaskState::Failed);
    let message = task.last_agent_message().unwrap().text();
    assert!(message.starts_with("Error processing request:"), "{message}");
    assert!(message.contains("timed out"), "{message}");
}

#[tokio::test]
async fn test_failed_delegate_task_fails_our_task() {
    let failing = failing_delegate().await;

    let registry = Arc::new(AgentRegistry::from_cards(AgentTable::from([(
        "weather".to_string(),
        card("WeatherAgent", &failing, &["weather"]),
    )])));
    let manager = host(
        OrchestratorAgent::new("HostAgent", registry),
    );

    let task = send(&manager, "t1", "weather in Paris").await;

    assert_eq!(task.status, TaskState::Failed);
    assert!(task
        .last_agent_message()
        .unwrap()
        .text()
        .contains("upstream down"));
}

#[tokio::test]
async fn test_unreachable_delegate_fails_task() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let registry = Arc::new(AgentRegistry::from_cards(AgentTable::from([(
        "gone".to_string(),
        card("GoneAgent", &url, &["hello"]),
    )])));
    let manager = host(OrchestratorAgent::new("HostAgent", registry));

    let task = send(&manager, "t1", "hello").await;
    assert_eq!(task.status, TaskState::Failed);
    assert!(task
        .last_agent_message()
        .unwrap()
        .text()
        .contains("Delegate gone failed"));
}

#[tokio::test]
async fn test_empty_registry_rejects_routing() {
    let registry = Arc::new(AgentRegistry::from_cards(BTreeMap::new()));
    let manager = host(
        OrchestratorAgent::new("HostAgent", registry)
            .with_default_agent("greeter"),
    );

    let task = send(&manager, "t1", "hello").await;

    assert_eq!(task.status, TaskState::Failed);
    assert!(task
        .last_agent_message()
        .unwrap()
        .text()
        .contains("No agents available"));
}

#[tokio::test]
async fn test_orchestrator_never_selects_itself() {
    let greeter = echo_delegate("greeter").await;
    let registry = Arc::new(AgentRegistry::from_cards(AgentTable::from([
        ("host".to_string(), card("HostAgent", "http://127.0.0.1:1/", &["hello"])),
        ("greeter".to_string(), card("GreetingAgent", &greeter, &["greeting"])),
    ])));
    let manager = host(
        OrchestratorAgent::new("HostAgent", registry)
            .with_default_agent("greeter"),
    );

    let task = send(&manager, "t1", "hello").await;

    assert_eq!(task.status, TaskState::Completed);
    assert_eq!(task.history[1].text(), "greeter: hello");
}

fn remote(url: &str) -> AgentTaskManager {
    let client = A2AClient::new(url)
        .unwrap()
        .with_timeout(Duration::from_secs(5));
    AgentTaskManager::new(
        AgentCard::new("WeatherProxy", "forwards", "1.0.0", "http://localhost/"),
        Arc::new(InMemoryTaskStore::new()),
        Arc::new(RemoteAgent::new("WeatherProxy", client)),
    )
}

#[tokio::test]
async fn test_remote_agent_completes_with_delegate_reply() {
    let weather = echo_delegate("weather").await;
    let manager = remote(&weather);

    let task = send(&manager, "t1", "forecast for Oslo").await;

    assert_eq!(task.status, TaskState::Completed);
    assert_eq!(task.history.len(), 2);
    assert_eq!(task.history[1].text(), "weather: forecast for Oslo");
}

#[tokio::test]
async fn test_remote_agent_fails_when_delegate_fails() {
    let failing = failing_delegate().await;
    let manager = remote(&failing);

    let task = send(&manager, "t1", "forecast for Oslo").await;

    assert_eq!(task.status, TaskState::Failed);
    let reply = task.last_agent_message().unwrap().text();
    assert!(reply.contains("Delegate WeatherProxy failed"));
    assert!(reply.contains("upstream down"));
}
