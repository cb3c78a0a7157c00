use super::types::{AgentKind, NodeConfig};
use crate::errors::LoaderError;
use std::collections::HashSet;
use std::path::Path;

/// Loads node configuration from YAML/JSON files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate config from YAML string
    pub fn from_yaml(yaml: &str) -> Result<NodeConfig, LoaderError> {
        let config: NodeConfig = serde_yaml::from_str(yaml)?;
        Self::validate_business_logic(&config)?;
        Ok(config)
    }

    /// Load and validate config from JSON string
    pub fn from_json(json: &str) -> Result<NodeConfig, LoaderError> {
        let config: NodeConfig = serde_json::from_str(json)?;
        Self::validate_business_logic(&config)?;
        Ok(config)
    }

    /// Load a config file, picking the parser from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<NodeConfig, LoaderError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            other => Err(LoaderError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    fn validate_business_logic(config: &NodeConfig) -> Result<(), LoaderError> {
        if config.agents.is_empty() {
            return Err(LoaderError::validation(
                "At least one hosted agent must be configured",
            ));
        }

        let mut ids = HashSet::new();
        for agent in &config.agents {
            if agent.id.trim().is_empty() {
                return Err(LoaderError::validation("Agent id cannot be empty"));
            }
            if agent.card.name.trim().is_empty() {
                return Err(LoaderError::validation(format!(
                    "Agent '{}' has an empty card name",
                    agent.id
                )));
            }
            if !ids.insert(agent.id.as_str()) {
                return Err(LoaderError::validation(format!(
                    "Duplicate agent id '{}'",
                    agent.id
                )));
            }
            if agent.fallback_agent.is_some() && agent.kind != AgentKind::Orchestrator {
                return Err(LoaderError::validation(format!(
                    "Agent '{}': fallback_agent only applies to orchestrators",
                    agent.id
                )));
            }
            match (agent.kind, agent.endpoint.as_deref()) {
                (AgentKind::Remote, None) => {
                    return Err(LoaderError::validation(format!(
                        "Agent '{}': remote agents need an endpoint",
                        agent.id
                    )));
                }
                (AgentKind::Remote, Some(endpoint)) if endpoint.trim().is_empty() => {
                    return Err(LoaderError::validation(format!(
                        "Agent '{}': endpoint cannot be empty",
                        agent.id
                    )));
                }
                (AgentKind::Remote, Some(_)) | (_, None) => {}
                (_, Some(_)) => {
                    return Err(LoaderError::validation(format!(
                        "Agent '{}': endpoint only applies to remote agents",
                        agent.id
                    )));
                }
            }
        }

        if let Some(default) = &config.default_agent {
            if !ids.contains(default.as_str()) {
                return Err(LoaderError::validation(format!(
                    "default_agent '{default}' is not a hosted agent"
                )));
            }
        }

        for (field, value) in [
            ("discovery_timeout_ms", config.discovery_timeout_ms),
            ("delegate_timeout_ms", config.delegate_timeout_ms),
            ("invoke_timeout_ms", config.invoke_timeout_ms),
        ] {
            if value == 0 {
                return Err(LoaderError::validation(format!(
                    "{field} must be greater than 0"
                )));
            }
        }

        if config.discovery_refresh_secs == Some(0) {
            return Err(LoaderError::validation(
                "discovery_refresh_secs must be greater than 0",
            ));
        }

        Ok(())
    }
}

/// Read the discovery registry: a JSON list of base URLs.
///
/// Never fails. A missing file is logged as a warning and a malformed one as
/// an error; both yield an empty list so the node still starts.
pub fn load_registry(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "registry file not found");
            return Vec::new();
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read registry file");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<String>>(&content) {
        Ok(urls) => urls,
        Err(e) => {
            tracing::error!(
                path = %path.display(),
                error = %e,
                "registry file must contain a JSON list of URLs"
            );
            Vec::new()
        }
    }
}
