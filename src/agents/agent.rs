use crate::errors::AgentResult;
use a2a_types::{Message, MessageRole, Part, TaskMetadata};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// What a capability produced for one query.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutput {
    Text(String),
    /// JSON payload; carried to the client as a text part tagged with its content type.
    Structured(Value),
}

impl AgentOutput {
    pub fn text(text: impl Into<String>) -> Self {
        AgentOutput::Text(text.into())
    }

    /// Render the output as the agent message appended to the task history.
    pub fn into_message(self) -> Message {
        match self {
            AgentOutput::Text(text) => Message::agent_text(text),
            AgentOutput::Structured(value) => {
                let mut metadata = HashMap::new();
                metadata.insert(
                    "content_type".to_string(),
                    Value::String("application/json".to_string()),
                );
                Message::new(
                    MessageRole::Agent,
                    vec![Part::Text {
                        text: value.to_string(),
                        metadata: Some(metadata),
                    }],
                )
            }
        }
    }
}

impl From<String> for AgentOutput {
    fn from(text: String) -> Self {
        AgentOutput::Text(text)
    }
}

impl From<&str> for AgentOutput {
    fn from(text: &str) -> Self {
        AgentOutput::Text(text.to_string())
    }
}

impl From<Value> for AgentOutput {
    fn from(value: Value) -> Self {
        AgentOutput::Structured(value)
    }
}

/// The capability a task manager binds to.
///
/// Implementations answer one query at a time for a session. Callers only
/// ever see `dyn Agent`; nothing branches on the concrete type.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Answer `query` within `session_id`.
    async fn invoke(&self, query: &str, session_id: &str) -> AgentResult<AgentOutput>;

    /// Answer `query` with access to the request's metadata extensions.
    ///
    /// The default ignores the metadata. Capabilities that consume feedback or
    /// UTG records override this.
    async fn invoke_with_metadata(
        &self,
        query: &str,
        session_id: &str,
        _metadata: Option<&TaskMetadata>,
    ) -> AgentResult<AgentOutput> {
        self.invoke(query, session_id).await
    }
}
