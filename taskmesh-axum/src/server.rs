use a2a_types::AgentCard;
use axum::Router;
use std::collections::BTreeMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use taskmesh::TaskManager;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    dispatch::AgentBindings,
    error::{Error, Result},
    routes::{create_routes, ServerState},
};

/// Envelope server for one or more hosted task managers
pub struct A2AServer {
    bindings: Arc<AgentBindings>,
}

impl A2AServer {
    /// Create a new server builder
    pub fn builder() -> A2AServerBuilder {
        A2AServerBuilder::default()
    }

    pub fn bindings(&self) -> &AgentBindings {
        &self.bindings
    }

    /// Display server startup information including agent card details
    fn display_server_info(&self, local_addr: &SocketAddr) {
        tracing::info!("🚀 Task server starting");
        tracing::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        tracing::info!("📡 Listening at: http://{}", local_addr);
        tracing::info!(
            "📋 Agent cards available at: http://{}/.well-known/agent.json",
            local_addr
        );
        let binding = if self.bindings.is_multi_agent() {
            "multi-agent"
        } else {
            "single-agent"
        };
        tracing::info!("🔀 Binding: {}", binding);

        for (agent_id, card) in self.bindings.cards() {
            tracing::info!("🤖 {} [{}]", card.name, agent_id);
            tracing::info!("  Description: {}", card.description);
            tracing::info!(
                "  Version: {}",
                if card.version.is_empty() {
                    "⚠️  Not set"
                } else {
                    &card.version
                }
            );
            tracing::info!(
                "  URL: {}",
                if card.url.is_empty() {
                    "⚠️  Not set"
                } else {
                    &card.url
                }
            );
            if card.skills.is_empty() {
                tracing::info!("  Skills: None configured");
            } else {
                tracing::info!("  Skills: {} configured", card.skills.len());
                for skill in &card.skills {
                    tracing::info!("    • {} ({}) tags={:?}", skill.name, skill.id, skill.tags);
                }
            }
        }
    }

    /// Validate every hosted card and warn about potential issues
    fn validate_agent_cards(&self) {
        for (agent_id, card) in self.bindings.cards() {
            let warnings = card_warnings(card);
            if warnings.is_empty() {
                continue;
            }
            tracing::warn!("⚠️  AgentCard warnings for '{}':", agent_id);
            for warning in &warnings {
                tracing::warn!("  {}", warning);
            }
        }
    }

    /// Convert the server into an Axum router
    pub fn into_router(self) -> Router {
        let state = ServerState {
            bindings: self.bindings,
        };

        create_routes(state)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// Run the server on the specified address
    pub async fn serve(self, addr: impl tokio::net::ToSocketAddrs) -> std::io::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        self.serve_with_shutdown(listener, std::future::pending())
            .await
    }

    /// Run on an already bound listener until `signal` resolves.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        self.display_server_info(&local_addr);
        self.validate_agent_cards();

        let app = self.into_router();
        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await?;
        tracing::info!("server stopped");
        Ok(())
    }
}

/// Problems in a card that would keep peers from discovering or calling it.
pub fn card_warnings(card: &AgentCard) -> Vec<String> {
    let mut warnings = Vec::new();

    if card.name.trim().is_empty() {
        warnings.push("AgentCard name is empty".to_string());
    }
    if card.description.trim().is_empty() {
        warnings.push("AgentCard description is empty".to_string());
    }
    if card.version.trim().is_empty() {
        warnings.push(
            "Version is empty - other agents may have trouble identifying compatibility"
                .to_string(),
        );
    }
    if card.url.trim().is_empty() {
        warnings.push(
            "URL is empty - other agents will not know how to reach this agent".to_string(),
        );
    }
    if card.skills.is_empty() {
        warnings.push("No skills configured; orchestrators can only reach it as a fallback".to_string());
    }

    warnings
}

/// Builder for configuring an A2A server
#[derive(Default)]
pub struct A2AServerBuilder {
    agents: Vec<(String, Arc<dyn TaskManager>)>,
    default_agent: Option<String>,
}

impl A2AServerBuilder {
    /// Host `manager` under `agent_id`.
    pub fn with_agent(mut self, agent_id: impl Into<String>, manager: Arc<dyn TaskManager>) -> Self {
        self.agents.push((agent_id.into(), manager));
        self
    }

    /// Agent that answers on the root path of a multi-agent server.
    pub fn with_default_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.default_agent = Some(agent_id.into());
        self
    }

    /// Build the server. One hosted agent gives a single-agent binding, more
    /// give a multi-agent binding.
    pub fn build(self) -> Result<A2AServer> {
        let mut agents = self.agents;
        let bindings = if agents.len() == 1 {
            let (agent_id, manager) = agents.remove(0);
            if let Some(default) = &self.default_agent {
                if *default != agent_id {
                    return Err(Error::Configuration(format!(
                        "default agent '{default}' is not hosted"
                    )));
                }
            }
            AgentBindings::single(agent_id, manager)
        } else {
            let mut managers = BTreeMap::new();
            for (agent_id, manager) in agents {
                if managers.insert(agent_id.clone(), manager).is_some() {
                    return Err(Error::Configuration(format!(
                        "agent id '{agent_id}' is hosted twice"
                    )));
                }
            }
            AgentBindings::multi(managers, self.default_agent)?
        };

        Ok(A2AServer {
            bindings: Arc::new(bindings),
        })
    }
}
