//! A2A Client for calling remote agents
//!
//! This module provides a client that POSTs task envelopes to a remote agent's
//! endpoint and decodes the response envelope. Every request carries a bounded
//! timeout; a request that outlives it surfaces as [`A2AError::Timeout`].

use crate::constants::DEFAULT_REQUEST_TIMEOUT;
use crate::error::{A2AError, A2AResult};
use a2a_types::{
    AgentCard, JSONRPCId, JSONRPCRequest, Task, TaskQueryParams, TaskResponse, TaskSendParams,
    TaskState, METHOD_GET_TASK,
};
use reqwest::Client;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A2A client for communicating with one remote agent
#[derive(Clone)]
pub struct A2AClient {
    /// HTTP client for making requests
    client: Client,
    /// Endpoint task envelopes are POSTed to
    endpoint: String,
    /// Upper bound for a single request, including reading the body
    timeout: Duration,
    /// Request ID counter for JSON-RPC requests
    request_id_counter: Arc<AtomicU64>,
    /// Card the client was built from, if any
    agent_card: Option<Arc<AgentCard>>,
}

impl A2AClient {
    /// Create a client that talks to `endpoint` directly.
    pub fn new(endpoint: impl Into<String>) -> A2AResult<Self> {
        Self::with_client(endpoint, Client::new())
    }

    /// Create a client with a pre-configured `reqwest::Client`.
    pub fn with_client(endpoint: impl Into<String>, http_client: Client) -> A2AResult<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(A2AError::InvalidParameter {
                message: "Endpoint URL must not be empty".to_string(),
            });
        }

        Ok(Self {
            client: http_client,
            endpoint,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            request_id_counter: Arc::new(AtomicU64::new(1)),
            agent_card: None,
        })
    }

    /// Create a client for the endpoint advertised by an agent card.
    pub fn from_card(agent_card: AgentCard) -> A2AResult<Self> {
        Self::from_card_with_client(agent_card, Client::new())
    }

    /// Create a client for an agent card with a custom HTTP client.
    pub fn from_card_with_client(agent_card: AgentCard, http_client: Client) -> A2AResult<Self> {
        if agent_card.url.is_empty() {
            return Err(A2AError::InvalidParameter {
                message: format!(
                    "Agent card '{}' does not contain a valid 'url' for the service endpoint",
                    agent_card.name
                ),
            });
        }

        let mut client = Self::with_client(agent_card.url.clone(), http_client)?;
        client.agent_card = Some(Arc::new(agent_card));
        Ok(client)
    }

    /// Set the per-request timeout (builder pattern)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the card this client was built from
    pub fn agent_card(&self) -> Option<&AgentCard> {
        self.agent_card.as_deref()
    }

    /// Submit one message to a task on the remote agent.
    ///
    /// The envelope is sent in its bare form. A response carrying an error
    /// envelope becomes [`A2AError::RemoteAgentError`]; a task that the remote
    /// side finalized as `FAILED` is returned as-is so the caller can inspect it.
    pub async fn send_task(&self, params: TaskSendParams) -> A2AResult<Task> {
        tracing::debug!(
            endpoint = %self.endpoint,
            task_id = %params.id,
            session_id = %params.session_id,
            "sending task envelope"
        );
        let expected_id = JSONRPCId::from(params.id.as_str());
        let response = self.post_envelope("tasks/send", &params).await?;
        Self::check_correlation("tasks/send", &expected_id, &response);
        Self::into_task(response)
    }

    /// Submit a message and treat a `FAILED` remote task as an error.
    pub async fn send_task_expect_completed(&self, params: TaskSendParams) -> A2AResult<Task> {
        let task = self.send_task(params).await?;
        if task.status == TaskState::Failed {
            let reason = task
                .last_agent_message()
                .map(|message| message.text())
                .unwrap_or_else(|| "remote task failed".to_string());
            return Err(A2AError::RemoteAgentError {
                message: reason,
                code: None,
            });
        }
        Ok(task)
    }

    /// Read a task back from the remote agent via `tasks/get`.
    pub async fn get_task(&self, params: TaskQueryParams) -> A2AResult<Task> {
        let request_id = self.next_request_id();
        let request = JSONRPCRequest::new(request_id.clone(), METHOD_GET_TASK, &params)?;
        let response = self.post_envelope(METHOD_GET_TASK, &request).await?;
        Self::check_correlation(METHOD_GET_TASK, &request_id, &response);
        Self::into_task(response)
    }

    /// Get the next request ID
    fn next_request_id(&self) -> JSONRPCId {
        let id = self.request_id_counter.fetch_add(1, Ordering::SeqCst);
        JSONRPCId::Integer(id as i64)
    }

    fn into_task(response: TaskResponse) -> A2AResult<Task> {
        response
            .into_result()
            .map_err(|error| A2AError::RemoteAgentError {
                message: error.message,
                code: error.code,
            })
    }

    fn check_correlation(method: &str, expected: &JSONRPCId, response: &TaskResponse) {
        if let Some(actual) = &response.id {
            if actual != expected {
                tracing::warn!(
                    method,
                    expected = %expected,
                    actual = %actual,
                    "response id does not match request id"
                );
            }
        }
    }

    /// POST a serialized envelope and decode the response envelope.
    async fn post_envelope<B: Serialize>(&self, method: &str, body: &B) -> A2AResult<TaskResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| self.request_error(method, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.request_error(method, e))?;

        if !status.is_success() {
            // Error envelopes are still envelopes; surface their message when present.
            if let Ok(envelope) = serde_json::from_str::<TaskResponse>(&text) {
                if let Some(error) = envelope.error() {
                    return Err(A2AError::RemoteAgentError {
                        message: error.message.clone(),
                        code: error.code,
                    });
                }
            }
            return Err(A2AError::NetworkError {
                message: format!("HTTP error {} from {}: {}", status, self.endpoint, text),
            });
        }

        serde_json::from_str(&text).map_err(|e| A2AError::SerializationError {
            message: format!("Failed to parse {} response: {}", method, e),
        })
    }

    fn request_error(&self, method: &str, error: reqwest::Error) -> A2AError {
        if error.is_timeout() {
            A2AError::Timeout {
                url: self.endpoint.clone(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            A2AError::NetworkError {
                message: format!("Failed to send {} request to {}: {}", method, self.endpoint, error),
            }
        }
    }
}
