use a2a_types::{AgentCapabilities, AgentCard, AgentSkill};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Complete node configuration from YAML/JSON
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// URL peers should use to reach this node. Defaults to `http://{host}:{port}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,

    /// JSON file holding a list of discovery base URLs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_file: Option<PathBuf>,

    /// Discovery base URLs given inline, queried after those from `registry_file`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discovery_urls: Vec<String>,

    #[serde(default = "default_discovery_timeout_ms")]
    pub discovery_timeout_ms: u64,

    #[serde(default = "default_delegate_timeout_ms")]
    pub delegate_timeout_ms: u64,

    #[serde(default = "default_invoke_timeout_ms")]
    pub invoke_timeout_ms: u64,

    /// Re-run discovery on this interval; unset means discover once at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_refresh_secs: Option<u64>,

    /// Hosted agent the root path falls back to on a multi-agent node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_agent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    pub agents: Vec<HostedAgentConfig>,
}

/// One agent hosted by the node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostedAgentConfig {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: AgentKind,

    pub card: CardConfig,

    /// For orchestrators: the delegate used when no skill matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_agent: Option<String>,

    /// For remote agents: the task endpoint every query is forwarded to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Built-in capability variants that can be hosted from configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Greeting,
    Moderator,
    Orchestrator,
    Remote,
}

/// Agent card as written in configuration; `url` is filled in from the node
/// address when omitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardConfig {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default)]
    pub capabilities: AgentCapabilities,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<AgentSkill>,
}

impl CardConfig {
    /// Build the advertised card, using `default_url` when none is configured.
    pub fn to_card(&self, default_url: &str) -> AgentCard {
        let url = self.url.clone().unwrap_or_else(|| default_url.to_string());
        let mut card = AgentCard::new(&self.name, &self.description, &self.version, url);
        card.capabilities = self.capabilities.clone();
        card.skills = self.skills.clone();
        card
    }
}

impl NodeConfig {
    /// Socket address string the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn base_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }

    /// True when the node binds every interface but has no `public_url`, so
    /// the cards it advertises would carry an address peers cannot dial.
    pub fn advertises_wildcard_host(&self) -> bool {
        self.public_url.is_none() && matches!(self.host.as_str(), "0.0.0.0" | "::" | "[::]")
    }

    pub fn is_multi_agent(&self) -> bool {
        self.agents.len() > 1
    }

    /// Endpoint advertised for a hosted agent: the root path on a single-agent
    /// node, `/agents/{id}` otherwise.
    pub fn agent_url(&self, agent_id: &str) -> String {
        if self.is_multi_agent() {
            format!("{}/agents/{}", self.base_url(), agent_id)
        } else {
            format!("{}/", self.base_url())
        }
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }

    pub fn delegate_timeout(&self) -> Duration {
        Duration::from_millis(self.delegate_timeout_ms)
    }

    pub fn invoke_timeout(&self) -> Duration {
        Duration::from_millis(self.invoke_timeout_ms)
    }

    pub fn discovery_refresh(&self) -> Option<Duration> {
        self.discovery_refresh_secs.map(Duration::from_secs)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    10000
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_discovery_timeout_ms() -> u64 {
    5_000
}

fn default_delegate_timeout_ms() -> u64 {
    30_000
}

fn default_invoke_timeout_ms() -> u64 {
    60_000
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosted(id: &str) -> HostedAgentConfig {
        HostedAgentConfig {
            id: id.to_string(),
            kind: AgentKind::Greeting,
            card: CardConfig {
                name: id.to_string(),
                description: String::new(),
                version: default_version(),
                url: None,
                capabilities: AgentCapabilities::default(),
                skills: Vec::new(),
            },
            fallback_agent: None,
            endpoint: None,
        }
    }

    fn node(agents: Vec<HostedAgentConfig>) -> NodeConfig {
        NodeConfig {
            host: "localhost".to_string(),
            port: 10001,
            public_url: None,
            registry_file: None,
            discovery_urls: Vec::new(),
            discovery_timeout_ms: default_discovery_timeout_ms(),
            delegate_timeout_ms: default_delegate_timeout_ms(),
            invoke_timeout_ms: default_invoke_timeout_ms(),
            discovery_refresh_secs: None,
            default_agent: None,
            log_level: None,
            agents,
        }
    }

    #[test]
    fn test_agent_urls_follow_binding() {
        let single = node(vec![hosted("greeter")]);
        assert_eq!(single.agent_url("greeter"), "http://localhost:10001/");

        let mut multi = node(vec![hosted("greeter"), hosted("moderator")]);
        multi.public_url = Some("https://mesh.example.com/".to_string());
        assert_eq!(
            multi.agent_url("moderator"),
            "https://mesh.example.com/agents/moderator"
        );
    }

    #[test]
    fn test_wildcard_host_needs_public_url() {
        let mut config = node(vec![hosted("greeter")]);
        assert!(!config.advertises_wildcard_host());

        config.host = "0.0.0.0".to_string();
        assert!(config.advertises_wildcard_host());
        assert_eq!(config.agent_url("greeter"), "http://0.0.0.0:10001/");

        config.public_url = Some("http://mesh.internal:10001".to_string());
        assert!(!config.advertises_wildcard_host());
        assert_eq!(config.agent_url("greeter"), "http://mesh.internal:10001/");

        config.public_url = None;
        config.host = "::".to_string();
        assert!(config.advertises_wildcard_host());
    }

    #[test]
    fn test_card_config_fills_url() {
        let config = hosted("greeter").card;
        assert_eq!(config.to_card("http://h/").url, "http://h/");

        let explicit = CardConfig {
            url: Some("http://elsewhere/".to_string()),
            ..config
        };
        assert_eq!(explicit.to_card("http://h/").url, "http://elsewhere/");
    }
}
