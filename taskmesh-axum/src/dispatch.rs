use a2a_types::{AgentCard, AgentCardDocument, TaskResponse};
use std::collections::BTreeMap;
use std::sync::Arc;
use taskmesh::TaskManager;

use crate::error::{Error, Rejection, Result};
use crate::json_rpc::{Call, InboundRequest};

/// How hosted task managers are bound to request paths.
#[derive(Clone)]
pub enum AgentBindings {
    /// One handler receives every request, whatever the path.
    Single {
        agent_id: String,
        manager: Arc<dyn TaskManager>,
    },
    /// Handlers addressed as `/agents/{id}`; the root path goes to
    /// `default_agent`, or to the sole handler when only one is bound.
    Multi {
        managers: BTreeMap<String, Arc<dyn TaskManager>>,
        default_agent: Option<String>,
    },
}

impl AgentBindings {
    pub fn single(agent_id: impl Into<String>, manager: Arc<dyn TaskManager>) -> Self {
        AgentBindings::Single {
            agent_id: agent_id.into(),
            manager,
        }
    }

    pub fn multi(
        managers: BTreeMap<String, Arc<dyn TaskManager>>,
        default_agent: Option<String>,
    ) -> Result<Self> {
        if managers.is_empty() {
            return Err(Error::Configuration(
                "at least one agent must be hosted".to_string(),
            ));
        }
        if let Some(default) = &default_agent {
            if !managers.contains_key(default) {
                return Err(Error::Configuration(format!(
                    "default agent '{default}' is not hosted"
                )));
            }
        }
        Ok(AgentBindings::Multi {
            managers,
            default_agent,
        })
    }

    pub fn is_multi_agent(&self) -> bool {
        matches!(self, AgentBindings::Multi { .. })
    }

    /// Find the handler for `agent_id`, or for the root path when `None`.
    pub fn resolve(&self, agent_id: Option<&str>) -> Result<&Arc<dyn TaskManager>> {
        match self {
            AgentBindings::Single { manager, .. } => Ok(manager),
            AgentBindings::Multi {
                managers,
                default_agent,
            } => {
                let target = match (agent_id, default_agent) {
                    (Some(id), _) => id,
                    (None, Some(default)) => default.as_str(),
                    (None, None) if managers.len() == 1 => {
                        return managers
                            .values()
                            .next()
                            .ok_or_else(|| Error::AgentNotFound("/".to_string()));
                    }
                    (None, None) => {
                        return Err(Error::InvalidRequest(
                            "No default agent; address one as /agents/{agent_id}".to_string(),
                        ))
                    }
                };
                managers
                    .get(target)
                    .ok_or_else(|| Error::AgentNotFound(target.to_string()))
            }
        }
    }

    /// `(hosted id, card)` for every bound handler.
    pub fn cards(&self) -> Vec<(&str, &AgentCard)> {
        match self {
            AgentBindings::Single { agent_id, manager } => {
                vec![(agent_id.as_str(), manager.agent_card())]
            }
            AgentBindings::Multi { managers, .. } => managers
                .iter()
                .map(|(id, manager)| (id.as_str(), manager.agent_card()))
                .collect(),
        }
    }

    /// The discovery document served at `/.well-known/agent.json`.
    pub fn discovery_document(&self) -> AgentCardDocument {
        match self {
            AgentBindings::Single { manager, .. } => {
                AgentCardDocument::Single(manager.agent_card().clone())
            }
            AgentBindings::Multi { managers, .. } => AgentCardDocument::Keyed(
                managers
                    .iter()
                    .map(|(id, manager)| (id.clone(), manager.agent_card().clone()))
                    .collect(),
            ),
        }
    }
}

/// Run a parsed request against `manager`.
///
/// A handler failure is already a FAILED task inside a success envelope; only
/// store-level faults and unknown tasks come back as rejections.
pub async fn dispatch(
    manager: &dyn TaskManager,
    request: InboundRequest,
) -> std::result::Result<TaskResponse, Rejection> {
    let InboundRequest { id, jsonrpc, call } = request;

    let outcome = match call {
        Call::Send(params) => manager.on_send_task(params).await,
        Call::Get(params) => manager.on_get_task(params).await,
    };

    match outcome {
        Ok(task) => {
            let response = TaskResponse::success(id, task);
            Ok(if jsonrpc {
                response.with_jsonrpc()
            } else {
                response
            })
        }
        Err(e) => Err(Error::from(e).with_id(id, jsonrpc)),
    }
}
