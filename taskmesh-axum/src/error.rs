use a2a_types::{error_codes, JSONRPCId, RpcError, TaskResponse};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use taskmesh::AgentError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Agent error: {0}")]
    Agent(AgentError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("No route for {0}")]
    UnknownRoute(String),

    #[error("Invalid server configuration: {0}")]
    Configuration(String),
}

impl From<AgentError> for Error {
    fn from(error: AgentError) -> Self {
        match error {
            AgentError::TaskNotFound { task_id } => Error::TaskNotFound(task_id),
            other => Error::Agent(other),
        }
    }
}

impl Error {
    /// HTTP status and JSON-RPC code for this error.
    ///
    /// Everything raised while dispatching is a 4xx; an unknown task on
    /// `tasks/get` is a logical result and travels with HTTP 200.
    pub fn status_and_code(&self) -> (StatusCode, i32) {
        match self {
            Error::Agent(_) => (StatusCode::BAD_REQUEST, error_codes::INTERNAL_ERROR),
            Error::Json(_) => (StatusCode::BAD_REQUEST, error_codes::PARSE_ERROR),
            Error::InvalidRequest(_) => (StatusCode::BAD_REQUEST, error_codes::INVALID_REQUEST),
            Error::MethodNotFound(_) => (StatusCode::BAD_REQUEST, error_codes::METHOD_NOT_FOUND),
            Error::InvalidParams(_) => (StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMS),
            Error::TaskNotFound(_) => (StatusCode::OK, error_codes::NOT_FOUND),
            Error::AgentNotFound(_) => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND),
            Error::UnknownRoute(_) => (StatusCode::NOT_FOUND, error_codes::METHOD_NOT_FOUND),
            Error::Configuration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
            }
        }
    }

    pub fn to_rpc_error(&self) -> RpcError {
        let (_, code) = self.status_and_code();
        let message = match self {
            Error::Json(_) => "Parse error".to_string(),
            Error::Agent(e) => e.to_string(),
            Error::InvalidRequest(msg) | Error::InvalidParams(msg) => msg.clone(),
            other => other.to_string(),
        };
        RpcError::new(code, message)
    }

    /// Attach the correlation id of the request that caused this error.
    pub fn with_id(self, id: Option<JSONRPCId>, jsonrpc: bool) -> Rejection {
        Rejection {
            id,
            jsonrpc,
            error: self,
        }
    }
}

/// An [`Error`] bound to the request it answers.
#[derive(Debug)]
pub struct Rejection {
    pub id: Option<JSONRPCId>,
    pub jsonrpc: bool,
    pub error: Error,
}

impl Rejection {
    pub fn envelope(&self) -> TaskResponse {
        let id = Some(self.id.clone().unwrap_or(JSONRPCId::Null));
        let response = TaskResponse::failure(id, self.error.to_rpc_error());
        if self.jsonrpc {
            response.with_jsonrpc()
        } else {
            response
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let (status, _) = self.error.status_and_code();
        if status.is_client_error() {
            tracing::warn!(id = ?self.id, error = %self.error, "request rejected");
        }
        (status, Json(self.envelope())).into_response()
    }
}

/// Errors raised before a request could be parsed or routed answer with a
/// null id.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.with_id(None, true).into_response()
    }
}
