use super::agent::{Agent, AgentOutput};
use crate::errors::{AgentError, AgentResult};
use a2a_client::A2AClient;
use a2a_types::{Message, TaskMetadata, TaskSendParams};
use async_trait::async_trait;
use uuid::Uuid;

/// Submit `query` to a delegate as a fresh task and return its reply.
///
/// Every delegated call gets its own task id; the session id is carried over
/// so the delegate can group the calls. A delegate that times out, cannot be
/// reached, answers with an error envelope or finalizes its task as `FAILED`
/// is reported as [`AgentError::Delegate`].
pub(crate) async fn forward(
    client: &A2AClient,
    delegate: &str,
    query: &str,
    session_id: &str,
    metadata: Option<&TaskMetadata>,
) -> AgentResult<AgentOutput> {
    let mut params = TaskSendParams::new(
        Uuid::new_v4().to_string(),
        session_id,
        Message::user_text(query),
    );
    if let Some(metadata) = metadata.filter(|m| !m.is_empty()) {
        params = params.with_metadata(metadata.clone());
    }

    tracing::info!(
        delegate,
        endpoint = %client.endpoint(),
        task_id = %params.id,
        "forwarding query to delegate"
    );

    let task = client
        .send_task_expect_completed(params)
        .await
        .map_err(|e| {
            tracing::error!(delegate, error = %e, "delegate call failed");
            AgentError::Delegate {
                agent: delegate.to_string(),
                reason: e.to_string(),
            }
        })?;

    let reply = task
        .last_agent_message()
        .map(Message::text)
        .unwrap_or_default();
    Ok(AgentOutput::Text(reply))
}

/// Forwards every query to one fixed remote agent.
pub struct RemoteAgent {
    name: String,
    client: A2AClient,
}

impl RemoteAgent {
    pub fn new(name: impl Into<String>, client: A2AClient) -> Self {
        Self {
            name: name.into(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }
}

#[async_trait]
impl Agent for RemoteAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, query: &str, session_id: &str) -> AgentResult<AgentOutput> {
        forward(&self.client, &self.name, query, session_id, None).await
    }

    async fn invoke_with_metadata(
        &self,
        query: &str,
        session_id: &str,
        metadata: Option<&TaskMetadata>,
    ) -> AgentResult<AgentOutput> {
        forward(&self.client, &self.name, query, session_id, metadata).await
    }
}
