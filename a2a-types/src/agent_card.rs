use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
// ============================================================================
// Agent Card and Discovery Types
// ============================================================================

/// Defines optional interaction modes supported by an agent.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AgentCapabilities {
    /// Indicates if the agent can stream partial responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming: Option<bool>,
    /// Indicates if the agent supports push notifications for task updates.
    #[serde(skip_serializing_if = "Option::is_none", rename = "pushNotifications")]
    pub push_notifications: Option<bool>,
    /// Indicates if the agent keeps a history of state transitions for a task.
    #[serde(
        skip_serializing_if = "Option::is_none",
        rename = "stateTransitionHistory"
    )]
    pub state_transition_history: Option<bool>,
    /// Indicates if the agent can answer with structured (JSON) output.
    #[serde(skip_serializing_if = "Option::is_none", rename = "structuredOutput")]
    pub structured_output: Option<bool>,
}

/// Represents the service provider of an agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentProvider {
    pub organization: String,
    pub url: String,
}

/// A distinct capability an agent advertises. Skills are advisory; they are
/// used for delegate selection, never enforced at dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSkill {
    /// A unique identifier for the agent's skill.
    pub id: String,
    /// A human-readable name for the skill.
    pub name: String,
    /// A detailed description of the skill.
    #[serde(default)]
    pub description: String,
    /// Keywords describing the skill's capabilities.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Example prompts this skill can handle.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub examples: Vec<String>,
}

/// The self-describing manifest an agent process exposes at
/// `/.well-known/agent.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentCard {
    /// Unique human-readable identifier of the agent.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// The endpoint task envelopes are POSTed to.
    pub url: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub capabilities: AgentCapabilities,
    #[serde(rename = "defaultInputModes", default = "default_modes")]
    pub default_input_modes: Vec<String>,
    #[serde(rename = "defaultOutputModes", default = "default_modes")]
    pub default_output_modes: Vec<String>,
    #[serde(default)]
    pub skills: Vec<AgentSkill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<AgentProvider>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "documentationUrl")]
    pub documentation_url: Option<String>,
}

fn default_modes() -> Vec<String> {
    vec!["text".to_string(), "text/plain".to_string()]
}

impl AgentCard {
    /// Create a new AgentCard with minimal required fields
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            url: url.into(),
            version: version.into(),
            capabilities: AgentCapabilities::default(),
            default_input_modes: default_modes(),
            default_output_modes: default_modes(),
            skills: Vec::new(),
            provider: None,
            documentation_url: None,
        }
    }

    /// The URL task envelopes are POSTed to.
    pub fn endpoint(&self) -> &str {
        &self.url
    }

    pub fn with_streaming(mut self, enabled: bool) -> Self {
        self.capabilities.streaming = Some(enabled);
        self
    }

    pub fn with_structured_output(mut self, enabled: bool) -> Self {
        self.capabilities.structured_output = Some(enabled);
        self
    }

    /// Create a skill using a builder pattern and add it
    pub fn add_skill_with<F>(mut self, id: impl Into<String>, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(AgentSkill) -> AgentSkill,
    {
        let skill = AgentSkill::new(id.into(), name.into());
        self.skills.push(f(skill));
        self
    }
}

impl AgentSkill {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            description: String::new(),
            tags: Vec::new(),
            examples: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn add_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn add_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }
}

/// Body of a discovery response.
///
/// A single-agent host answers with one card, a multi-agent host with a map of
/// hosted id to card. Some hosts answer with a bare list of cards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AgentCardDocument {
    Single(AgentCard),
    Keyed(BTreeMap<String, AgentCard>),
    List(Vec<AgentCard>),
}

impl AgentCardDocument {
    /// Flattens the document into `(agent id, card)` entries.
    ///
    /// Keyed documents use their map keys; single cards and lists are keyed by
    /// card name.
    pub fn into_entries(self) -> Vec<(String, AgentCard)> {
        match self {
            AgentCardDocument::Single(card) => vec![(card.name.clone(), card)],
            AgentCardDocument::Keyed(cards) => cards.into_iter().collect(),
            AgentCardDocument::List(cards) => cards
                .into_iter()
                .map(|card| (card.name.clone(), card))
                .collect(),
        }
    }
}
