use super::agent::{Agent, AgentOutput};
use crate::errors::AgentResult;
use a2a_types::{Feedback, StateTransition, TaskMetadata};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

/// A feedback record attributed to the session it arrived on.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackEntry {
    pub session_id: String,
    pub feedback: Feedback,
    pub received_at: DateTime<Utc>,
}

/// A UTG edge attributed to the session it arrived on.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionEntry {
    pub session_id: String,
    pub transition: StateTransition,
    pub received_at: DateTime<Utc>,
}

/// Collects human feedback and UI state transitions for later training runs,
/// and answers with a self-correction notice when a transition looks abnormal.
///
/// The logs only grow; draining them is the consumer's job.
pub struct ModeratorAgent {
    name: String,
    feedback_log: Mutex<Vec<FeedbackEntry>>,
    utg_log: Mutex<Vec<TransitionEntry>>,
}

impl ModeratorAgent {
    pub fn new() -> Self {
        Self {
            name: "ModeratorAgent".to_string(),
            feedback_log: Mutex::new(Vec::new()),
            utg_log: Mutex::new(Vec::new()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub async fn feedback_log(&self) -> Vec<FeedbackEntry> {
        self.feedback_log.lock().await.clone()
    }

    pub async fn utg_log(&self) -> Vec<TransitionEntry> {
        self.utg_log.lock().await.clone()
    }

    async fn record(&self, session_id: &str, metadata: &TaskMetadata) {
        let now = Utc::now();
        if let Some(feedback) = &metadata.feedback {
            tracing::info!(session_id, kind = %feedback.kind, "recorded feedback");
            self.feedback_log.lock().await.push(FeedbackEntry {
                session_id: session_id.to_string(),
                feedback: feedback.clone(),
                received_at: now,
            });
        }
        if let Some(transition) = &metadata.utg {
            tracing::info!(
                session_id,
                from = %transition.current_state,
                to = %transition.next_state,
                reason = %transition.transition_reason,
                "recorded state transition"
            );
            self.utg_log.lock().await.push(TransitionEntry {
                session_id: session_id.to_string(),
                transition: transition.clone(),
                received_at: now,
            });
        }
    }
}

impl Default for ModeratorAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for ModeratorAgent {
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
        if let Some(metadata) = metadata {
            self.record(session_id, metadata).await;

            if let Some(transition) = metadata.utg.as_ref().filter(|t| t.is_abnormal()) {
                tracing::warn!(
                    session_id,
                    from = %transition.current_state,
                    to = %transition.next_state,
                    "abnormal transition, triggering self-correction"
                );
                return Ok(AgentOutput::Text(format!(
                    "Detected abnormal transition from {} to {}. Self-correction triggered.",
                    transition.current_state, transition.next_state
                )));
            }
        }

        if query.contains("self-correct") {
            return Ok(AgentOutput::text(
                "Self-correction applied based on feedback and UTG.",
            ));
        }

        Ok(AgentOutput::Text(format!("Moderator received: {query}")))
    }
}
