//! Node configuration: the agents a process hosts, where it listens and
//! where it looks for other agents.

pub mod loader;
pub mod types;

pub use loader::{load_registry, ConfigLoader};
pub use types::{AgentKind, CardConfig, HostedAgentConfig, NodeConfig};

impl NodeConfig {
    /// Discovery base URLs: the registry file's entries followed by the
    /// inline `discovery_urls`.
    pub fn discovery_sources(&self) -> Vec<String> {
        let mut urls = self
            .registry_file
            .as_ref()
            .map(load_registry)
            .unwrap_or_default();
        urls.extend(self.discovery_urls.iter().cloned());
        urls
    }
}
