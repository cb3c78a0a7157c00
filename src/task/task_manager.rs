use crate::agents::Agent;
use crate::errors::{AgentError, AgentResult};
use a2a_types::{AgentCard, Message, Task, TaskQueryParams, TaskSendParams, TaskState};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::task_store::TaskStore;

/// Upper bound for a single capability call unless configured otherwise.
pub const DEFAULT_INVOKE_TIMEOUT: Duration = Duration::from_secs(60);

/// Handler the router dispatches envelopes to.
#[async_trait]
pub trait TaskManager: Send + Sync {
    /// Card advertised for this handler at the discovery endpoint.
    fn agent_card(&self) -> &AgentCard;

    /// Record the message, run the bound capability and return the finalized task.
    ///
    /// A failing capability does not surface as `Err`; it produces a `FAILED`
    /// task whose last message explains what went wrong. `Err` is reserved
    /// for faults in the runtime itself.
    async fn on_send_task(&self, params: TaskSendParams) -> AgentResult<Task>;

    /// Read a task back, optionally trimming its history.
    async fn on_get_task(&self, params: TaskQueryParams) -> AgentResult<Task>;
}

/// Task manager that binds one [`Agent`] to one [`TaskStore`].
pub struct AgentTaskManager {
    card: AgentCard,
    store: Arc<dyn TaskStore>,
    agent: Arc<dyn Agent>,
    invoke_timeout: Duration,
}

impl AgentTaskManager {
    pub fn new(card: AgentCard, store: Arc<dyn TaskStore>, agent: Arc<dyn Agent>) -> Self {
        Self {
            card,
            store,
            agent,
            invoke_timeout: DEFAULT_INVOKE_TIMEOUT,
        }
    }

    /// Set the capability timeout (builder pattern)
    pub fn with_invoke_timeout(mut self, timeout: Duration) -> Self {
        self.invoke_timeout = timeout;
        self
    }

    async fn run_agent(&self, params: &TaskSendParams) -> AgentResult<Message> {
        let query = params.message.first_text().unwrap_or_default();
        let call = self.agent.invoke_with_metadata(
            query,
            &params.session_id,
            params.metadata.as_ref(),
        );

        match tokio::time::timeout(self.invoke_timeout, call).await {
            Ok(result) => result.map(|output| output.into_message()),
            Err(_) => Err(AgentError::Timeout {
                operation: format!("{} invoke", self.agent.name()),
                duration_ms: self.invoke_timeout.as_millis() as u64,
            }),
        }
    }
}

#[async_trait]
impl TaskManager for AgentTaskManager {
    fn agent_card(&self) -> &AgentCard {
        &self.card
    }

    async fn on_send_task(&self, params: TaskSendParams) -> AgentResult<Task> {
        self.store
            .upsert(&params.id, &params.session_id, params.message.clone())
            .await?;

        let (state, reply) = match self.run_agent(&params).await {
            Ok(reply) => (TaskState::Completed, reply),
            Err(error) => {
                if error.is_error_level() {
                    tracing::error!(
                        agent = %self.agent.name(),
                        task_id = %params.id,
                        category = error.category(),
                        error = %error,
                        "agent invocation failed"
                    );
                } else {
                    tracing::warn!(
                        agent = %self.agent.name(),
                        task_id = %params.id,
                        category = error.category(),
                        error = %error,
                        "agent invocation failed"
                    );
                }
                (
                    TaskState::Failed,
                    Message::agent_text(format!("Error processing request: {error}")),
                )
            }
        };

        let task = self.store.finalize(&params.id, state, reply).await?;
        tracing::debug!(task_id = %task.id, status = %task.status, "task finalized");
        Ok(task)
    }

    async fn on_get_task(&self, params: TaskQueryParams) -> AgentResult<Task> {
        self.store
            .get(&params.id, params.history_length)
            .await?
            .ok_or_else(|| AgentError::TaskNotFound {
                task_id: params.id.clone(),
            })
    }
}
