/// Main error type for the task runtime
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    // === Task Management Errors ===
    #[error("Task not found: {task_id}")]
    TaskNotFound { task_id: String },

    // === Routing Errors ===
    #[error("Agent not found: {agent_id}")]
    AgentNotFound { agent_id: String },

    #[error("No agents available for routing")]
    NoAgentsAvailable,

    #[error("No agent matches the query and no default agent is configured")]
    NoMatchingAgent,

    #[error("Delegate {agent} failed: {reason}")]
    Delegate { agent: String, reason: String },

    // === General System Errors ===
    #[error("Internal error: {component}: {reason}")]
    Internal { component: String, reason: String },

    #[error("Operation timed out: {operation} after {duration_ms}ms")]
    Timeout { operation: String, duration_ms: u64 },
}

impl AgentError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::TaskNotFound { .. } => "task",

            Self::AgentNotFound { .. }
            | Self::NoAgentsAvailable
            | Self::NoMatchingAgent
            | Self::Delegate { .. } => "routing",

            Self::Internal { .. } | Self::Timeout { .. } => "system",
        }
    }

    /// Check if this error should be logged as an error vs warning
    pub fn is_error_level(&self) -> bool {
        match self {
            Self::Delegate { .. } => true,
            Self::Internal { .. } => true,

            Self::TaskNotFound { .. }
            | Self::AgentNotFound { .. }
            | Self::NoAgentsAvailable
            | Self::NoMatchingAgent
            | Self::Timeout { .. } => false,
        }
    }
}

/// Convenience type alias
pub type AgentResult<T> = std::result::Result<T, AgentError>;

/// Errors raised while loading node configuration
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl LoaderError {
    pub fn validation(message: impl Into<String>) -> Self {
        LoaderError::Validation(message.into())
    }
}
