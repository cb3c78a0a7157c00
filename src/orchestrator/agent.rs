use super::selector::DelegateSelector;
use crate::agents::remote_agent::forward;
use crate::agents::{Agent, AgentOutput};
use crate::errors::{AgentError, AgentResult};
use crate::registry::AgentRegistry;
use a2a_client::constants::DEFAULT_REQUEST_TIMEOUT;
use a2a_client::A2AClient;
use a2a_types::TaskMetadata;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Routes each query to the best-matching agent in the registry.
///
/// The registry is read once per call; a refresh that lands mid-call does not
/// affect the delegate already chosen.
pub struct OrchestratorAgent {
    name: String,
    registry: Arc<AgentRegistry>,
    selector: DelegateSelector,
    http_client: reqwest::Client,
    delegate_timeout: Duration,
}

impl OrchestratorAgent {
    pub fn new(name: impl Into<String>, registry: Arc<AgentRegistry>) -> Self {
        let name = name.into();
        Self {
            selector: DelegateSelector::default().excluding(name.clone()),
            name,
            registry,
            http_client: reqwest::Client::new(),
            delegate_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Agent to use when no skill matches the query.
    pub fn with_default_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.selector = self.selector.with_default_agent(agent_id);
        self
    }

    /// Also skip `agent_id` when selecting, typically the id this
    /// orchestrator is hosted under.
    pub fn excluding(mut self, agent_id: impl Into<String>) -> Self {
        self.selector = self.selector.excluding(agent_id);
        self
    }

    pub fn with_delegate_timeout(mut self, timeout: Duration) -> Self {
        self.delegate_timeout = timeout;
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }
}

#[async_trait]
impl Agent for OrchestratorAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, query: &str, session_id: &str) -> AgentResult<AgentOutput> {
        self.invoke_with_metadata(query, session_id, None).await
    }

    async fn invoke_with_metadata(
        &self,
        query: &str,
        session_id: &str,
        metadata: Option<&TaskMetadata>,
    ) -> AgentResult<AgentOutput> {
        let table = self.registry.snapshot().await;
        let selection = self.selector.select(&table, query)?;

        tracing::info!(
            orchestrator = %self.name,
            delegate = %selection.agent_id,
            fallback = selection.fallback,
            session_id,
            "routing query"
        );

        let client = A2AClient::from_card_with_client(selection.card, self.http_client.clone())
            .map_err(|e| AgentError::Delegate {
                agent: selection.agent_id.clone(),
                reason: e.to_string(),
            })?
            .with_timeout(self.delegate_timeout);

        forward(&client, &selection.agent_id, query, session_id, metadata).await
    }
}
