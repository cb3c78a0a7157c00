//! Assembles a server from a [`NodeConfig`]: hosted agents, the shared
//! registry and discovery.

use a2a_client::{A2AClient, DiscoveryClient};
use axum::Router;
use std::sync::Arc;
use taskmesh::agents::{Agent, GreetingAgent, ModeratorAgent, RemoteAgent};
use taskmesh::config::{AgentKind, HostedAgentConfig, NodeConfig};
use taskmesh::{AgentRegistry, AgentTaskManager, InMemoryTaskStore, OrchestratorAgent};
use tokio::net::TcpListener;

use crate::error::{Error, Result};
use crate::server::A2AServer;

/// A configured process hosting one or more agents.
pub struct MeshNode {
    config: NodeConfig,
    registry: Arc<AgentRegistry>,
    server: A2AServer,
}

impl MeshNode {
    /// Build the hosted agents and run discovery once.
    ///
    /// An empty or unreachable discovery list still yields a node; its
    /// orchestrators reject routed requests until a refresh finds agents.
    pub async fn from_config(config: NodeConfig) -> Result<Self> {
        if config.advertises_wildcard_host() {
            tracing::warn!(
                host = %config.host,
                base_url = %config.base_url(),
                "bound to a wildcard address without public_url; advertised cards are not routable"
            );
        }

        let registry = Arc::new(AgentRegistry::new());

        let mut builder = A2AServer::builder();
        for hosted in &config.agents {
            let card = hosted.card.to_card(&config.agent_url(&hosted.id));
            let agent = build_agent(&config, hosted, &card.name, &registry)?;
            let manager = AgentTaskManager::new(card, Arc::new(InMemoryTaskStore::new()), agent)
                .with_invoke_timeout(config.invoke_timeout());
            builder = builder.with_agent(hosted.id.clone(), Arc::new(manager));
        }
        if let Some(default) = &config.default_agent {
            builder = builder.with_default_agent(default.clone());
        }
        let server = builder.build()?;

        if let Some(discovery) = discovery_client(&config) {
            registry.refresh(&discovery).await;
        } else {
            tracing::info!("no discovery sources configured");
        }

        Ok(Self {
            config,
            registry,
            server,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    pub fn into_router(self) -> Router {
        self.server.into_router()
    }

    /// Bind the configured address and serve until `signal` resolves.
    /// Periodic rediscovery, when configured, stops with the server.
    pub async fn serve<F>(self, signal: F) -> std::io::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_address()).await?;

        let refresher = match (discovery_client(&self.config), self.config.discovery_refresh()) {
            (Some(discovery), Some(period)) => {
                tracing::info!(period_secs = period.as_secs(), "periodic rediscovery enabled");
                Some(self.registry.clone().spawn_periodic_refresh(discovery, period))
            }
            _ => None,
        };

        let result = self.server.serve_with_shutdown(listener, signal).await;
        if let Some(handle) = refresher {
            handle.abort();
        }
        result
    }
}

fn discovery_client(config: &NodeConfig) -> Option<DiscoveryClient> {
    let sources = config.discovery_sources();
    if sources.is_empty() {
        return None;
    }
    Some(DiscoveryClient::new(sources).with_timeout(config.discovery_timeout()))
}

fn build_agent(
    config: &NodeConfig,
    hosted: &HostedAgentConfig,
    name: &str,
    registry: &Arc<AgentRegistry>,
) -> Result<Arc<dyn Agent>> {
    let agent: Arc<dyn Agent> = match hosted.kind {
        AgentKind::Greeting => Arc::new(GreetingAgent::new().with_name(name)),
        AgentKind::Moderator => Arc::new(ModeratorAgent::new().with_name(name)),
        AgentKind::Orchestrator => {
            let mut orchestrator = OrchestratorAgent::new(name, registry.clone())
                .excluding(hosted.id.clone())
                .with_delegate_timeout(config.delegate_timeout());
            if let Some(fallback) = &hosted.fallback_agent {
                orchestrator = orchestrator.with_default_agent(fallback.clone());
            }
            Arc::new(orchestrator)
        }
        AgentKind::Remote => {
            let endpoint = hosted.endpoint.as_deref().ok_or_else(|| {
                Error::Configuration(format!("remote agent '{}' has no endpoint", hosted.id))
            })?;
            let client = A2AClient::new(endpoint)
                .map_err(|e| Error::Configuration(format!("remote agent '{}': {e}", hosted.id)))?
                .with_timeout(config.delegate_timeout());
            Arc::new(RemoteAgent::new(name, client))
        }
    };
    Ok(agent)
}
