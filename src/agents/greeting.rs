use super::agent::{Agent, AgentOutput};
use crate::errors::AgentResult;
use async_trait::async_trait;

/// Replies to greetings and echoes anything else.
#[derive(Debug, Clone)]
pub struct GreetingAgent {
    name: String,
}

impl GreetingAgent {
    pub const GREETING: &'static str = "Hello! How can I help you today?";

    pub fn new() -> Self {
        Self {
            name: "GreetingAgent".to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for GreetingAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for GreetingAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, query: &str, _session_id: &str) -> AgentResult<AgentOutput> {
        if query.to_lowercase().contains("hello") {
            return Ok(AgentOutput::text(Self::GREETING));
        }
        Ok(AgentOutput::Text(format!("{} received: {}", self.name, query)))
    }
}
