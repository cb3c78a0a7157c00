use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::{
    dispatch::{dispatch, AgentBindings},
    error::Error,
    json_rpc::parse_request,
};

/// State shared across all routes
#[derive(Clone)]
pub struct ServerState {
    pub bindings: Arc<AgentBindings>,
}

/// Create the envelope routes and the discovery endpoint
pub fn create_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", post(root_send))
        .route("/agents/:agent_id", post(agent_send))
        .route("/.well-known/agent.json", get(agent_card))
        .fallback(fallback)
        .with_state(state)
}

async fn root_send(State(state): State<ServerState>, body: Bytes) -> Response {
    handle(&state, None, &body).await
}

async fn agent_send(
    State(state): State<ServerState>,
    Path(agent_id): Path<String>,
    body: Bytes,
) -> Response {
    handle(&state, Some(agent_id.as_str()), &body).await
}

/// Single-agent hosts accept envelopes on any path.
async fn fallback(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    if method == Method::POST && !state.bindings.is_multi_agent() {
        return handle(&state, None, &body).await;
    }
    Error::UnknownRoute(format!("{method} {}", uri.path())).into_response()
}

async fn handle(state: &ServerState, agent_id: Option<&str>, body: &[u8]) -> Response {
    let manager = match state.bindings.resolve(agent_id) {
        Ok(manager) => manager,
        Err(e) => return e.into_response(),
    };

    let request = match parse_request(body) {
        Ok(request) => request,
        Err(rejection) => return rejection.into_response(),
    };

    tracing::debug!(
        agent = %manager.agent_card().name,
        id = ?request.id,
        "dispatching request"
    );

    match dispatch(manager.as_ref(), request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(rejection) => rejection.into_response(),
    }
}

/// Handler for `/.well-known/agent.json`
async fn agent_card(State(state): State<ServerState>) -> impl IntoResponse {
    Json(state.bindings.discovery_document())
}
