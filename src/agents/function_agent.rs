use super::agent::{Agent, AgentOutput};
use crate::errors::AgentResult;
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;

/// Type alias for an async function backing a [`FunctionAgent`]
pub type AsyncAgentFunction =
    Box<dyn Fn(String, String) -> BoxFuture<'static, AgentResult<AgentOutput>> + Send + Sync>;

/// An agent that wraps a closure taking `(query, session_id)`.
pub struct FunctionAgent {
    name: String,
    function: AsyncAgentFunction,
}

impl FunctionAgent {
    pub fn new<F, Fut>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(String, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AgentResult<AgentOutput>> + Send + 'static,
    {
        Self {
            name: name.into(),
            function: Box::new(move |query, session_id| function(query, session_id).boxed()),
        }
    }

    /// Convenience constructor for synchronous text responders.
    pub fn from_fn<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        Self::new(name, move |query, session_id| {
            let reply = function(&query, &session_id);
            async move { Ok(AgentOutput::Text(reply)) }
        })
    }
}

impl std::fmt::Debug for FunctionAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionAgent")
            .field("name", &self.name)
            .finish()
    }
}

#[async_trait]
impl Agent for FunctionAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, query: &str, session_id: &str) -> AgentResult<AgentOutput> {
        (self.function)(query.to_string(), session_id.to_string()).await
    }
}
