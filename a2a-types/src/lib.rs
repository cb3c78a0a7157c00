//! # Task Envelope Protocol Types
//!
//! Rust data structures for the request/response envelope exchanged between
//! agents. All types are designed for serialization with `serde` and accept
//! the field spellings produced by older peers (`sessionId`, `historyLength`,
//! text parts tagged with `"type": "text"`).
//!
//! The protocol revolves around three ideas:
//! - A [`Task`] is a unit of routed work with an append-only message history.
//! - A request envelope ([`TaskSendParams`]) carries one user [`Message`] for a task.
//! - A response envelope ([`TaskResponse`]) carries either a [`Task`] or an [`RpcError`],
//!   never both.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

pub mod agent_card;
pub use agent_card::{AgentCapabilities, AgentCard, AgentCardDocument, AgentProvider, AgentSkill};

/// JSON-RPC protocol version accepted and emitted by every peer.
pub const JSONRPC_VERSION: &str = "2.0";

/// Method name for submitting a message to a task.
pub const METHOD_SEND_TASK: &str = "tasks/send";

/// Method name for reading a task back.
pub const METHOD_GET_TASK: &str = "tasks/get";

/// Current version of the typed metadata extensions.
pub const METADATA_EXTENSION_VERSION: u32 = 1;

/// Error codes carried in [`RpcError::code`].
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    /// Unknown task id or unknown hosted agent.
    pub const NOT_FOUND: i32 = -32001;
}

// ============================================================================
// Identifiers
// ============================================================================

/// Correlation identifier of an envelope. It can be a string, a number, or null.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum JSONRPCId {
    String(String),
    Integer(i64),
    Null,
}

impl From<&str> for JSONRPCId {
    fn from(value: &str) -> Self {
        JSONRPCId::String(value.to_string())
    }
}

impl From<String> for JSONRPCId {
    fn from(value: String) -> Self {
        JSONRPCId::String(value)
    }
}

impl From<i64> for JSONRPCId {
    fn from(value: i64) -> Self {
        JSONRPCId::Integer(value)
    }
}

impl fmt::Display for JSONRPCId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JSONRPCId::String(s) => write!(f, "{s}"),
            JSONRPCId::Integer(i) => write!(f, "{i}"),
            JSONRPCId::Null => write!(f, "null"),
        }
    }
}

// ============================================================================
// Task Lifecycle
// ============================================================================

/// Lifecycle state of a [`Task`].
///
/// A task starts `SUBMITTED` and moves to exactly one terminal state. It never
/// returns to `SUBMITTED`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// The task has been recorded and is awaiting its handler.
    #[serde(alias = "submitted")]
    Submitted,
    /// The handler finished normally.
    #[serde(alias = "completed")]
    Completed,
    /// The bound capability raised, timed out, or its delegate failed.
    #[serde(alias = "failed")]
    Failed,
}

impl TaskState {
    /// Returns true for `COMPLETED` and `FAILED`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }

    /// Whether a task in this state may be moved to `next`.
    ///
    /// Re-asserting the current state is allowed so that a follow-up message on
    /// a completed task can complete it again.
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        match (self, next) {
            (current, next) if *current == next => true,
            (TaskState::Submitted, TaskState::Completed | TaskState::Failed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Submitted => "SUBMITTED",
            TaskState::Completed => "COMPLETED",
            TaskState::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// One unit of routed work: an id, a status and the running message history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier of the task, chosen by the client.
    pub id: String,
    /// Current lifecycle state.
    pub status: TaskState,
    /// Messages in the order they were appended. The originating user message is first.
    #[serde(default)]
    pub history: Vec<Message>,
}

impl Task {
    /// Creates a freshly submitted task whose history holds the originating message.
    pub fn submitted(id: impl Into<String>, message: Message) -> Self {
        Self {
            id: id.into(),
            status: TaskState::Submitted,
            history: vec![message],
        }
    }

    /// Returns a copy of this task keeping only the last `limit` history entries.
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        if let Some(limit) = limit {
            let skip = self.history.len().saturating_sub(limit);
            self.history.drain(..skip);
        }
        self
    }

    /// The most recent message produced by the agent, if any.
    pub fn last_agent_message(&self) -> Option<&Message> {
        self.history
            .iter()
            .rev()
            .find(|message| message.role == MessageRole::Agent)
    }
}

// ============================================================================
// Messages
// ============================================================================

/// Identifies the sender of a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Agent,
}

/// A single content part of a message.
///
/// Only text is modelled. Peers that tag parts with `"type": "text"` are accepted;
/// the tag is not echoed back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<HashMap<String, Value>>,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text {
            text: text.into(),
            metadata: None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text, .. } => Some(text),
        }
    }
}

/// A message exchanged within a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: MessageRole,
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

impl Message {
    pub fn new(role: MessageRole, parts: Vec<Part>) -> Self {
        Self {
            role,
            parts,
            metadata: None,
        }
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, vec![Part::text(text)])
    }

    pub fn agent_text(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Agent, vec![Part::text(text)])
    }

    /// Text of the first part, which is what handlers treat as the query.
    pub fn first_text(&self) -> Option<&str> {
        self.parts.first().and_then(Part::as_text)
    }

    /// All text parts joined with newlines.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ============================================================================
// Metadata Extensions
// ============================================================================

fn default_extension_version() -> u32 {
    METADATA_EXTENSION_VERSION
}

/// Structured side channel carried on a request envelope.
///
/// `feedback` and `utg` are the documented, versioned keys. Any other key is
/// preserved in `extra` rather than dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utg: Option<StateTransition>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl TaskMetadata {
    pub fn is_empty(&self) -> bool {
        self.feedback.is_none() && self.utg.is_none() && self.extra.is_empty()
    }
}

/// Human feedback about a previous agent turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feedback {
    #[serde(default = "default_extension_version")]
    pub version: u32,
    /// Free-form polarity such as `positive` or `negative`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negotiation: Option<Value>,
}

/// A UI state-transition record (UTG edge) observed on the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateTransition {
    #[serde(default = "default_extension_version")]
    pub version: u32,
    pub current_state: String,
    pub next_state: String,
    pub transition_reason: String,
}

impl StateTransition {
    /// Transitions reported with reason `error` are treated as abnormal.
    pub fn is_abnormal(&self) -> bool {
        self.transition_reason.eq_ignore_ascii_case("error")
    }
}

// ============================================================================
// Request Envelopes
// ============================================================================

/// Request envelope submitting one message to a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskSendParams {
    /// Task identifier; also used as the correlation id of a bare envelope.
    pub id: String,
    #[serde(alias = "sessionId")]
    pub session_id: String,
    pub message: Message,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TaskMetadata>,
}

impl TaskSendParams {
    pub fn new(id: impl Into<String>, session_id: impl Into<String>, message: Message) -> Self {
        Self {
            id: id.into(),
            session_id: session_id.into(),
            message,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: TaskMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Parameters of a `tasks/get` query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskQueryParams {
    pub id: String,
    #[serde(
        default,
        alias = "historyLength",
        skip_serializing_if = "Option::is_none"
    )]
    pub history_length: Option<usize>,
}

/// JSON-RPC 2.0 request wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JSONRPCRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default)]
    pub id: Option<JSONRPCId>,
}

impl JSONRPCRequest {
    pub fn new<T: Serialize>(
        id: impl Into<JSONRPCId>,
        method: &str,
        params: &T,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.to_string(),
            params: Some(serde_json::to_value(params)?),
            id: Some(id.into()),
        })
    }
}

// ============================================================================
// Response Envelopes
// ============================================================================

/// Error object of a response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
            data: None,
        }
    }
}

/// Payload of a response envelope: exactly one of `result` or `error`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ResponseBody {
    #[serde(rename = "result")]
    Result(Task),
    #[serde(rename = "error")]
    Error(RpcError),
}

/// Response envelope correlating a call by id.
///
/// `id` serializes as explicit `null` only when the request could not be parsed
/// or routed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<JSONRPCId>,
    #[serde(flatten)]
    pub body: ResponseBody,
}

impl TaskResponse {
    pub fn success(id: Option<JSONRPCId>, task: Task) -> Self {
        Self {
            jsonrpc: None,
            id,
            body: ResponseBody::Result(task),
        }
    }

    pub fn failure(id: Option<JSONRPCId>, error: RpcError) -> Self {
        Self {
            jsonrpc: None,
            id,
            body: ResponseBody::Error(error),
        }
    }

    /// Marks the envelope as a JSON-RPC 2.0 response.
    pub fn with_jsonrpc(mut self) -> Self {
        self.jsonrpc = Some(JSONRPC_VERSION.to_string());
        self
    }

    pub fn result(&self) -> Option<&Task> {
        match &self.body {
            ResponseBody::Result(task) => Some(task),
            ResponseBody::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&RpcError> {
        match &self.body {
            ResponseBody::Error(error) => Some(error),
            ResponseBody::Result(_) => None,
        }
    }

    pub fn into_result(self) -> Result<Task, RpcError> {
        match self.body {
            ResponseBody::Result(task) => Ok(task),
            ResponseBody::Error(error) => Err(error),
        }
    }
}
