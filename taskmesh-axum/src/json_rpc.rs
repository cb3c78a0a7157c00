//! Inbound request parsing.
//!
//! A body carrying a `method` member is a JSON-RPC 2.0 request; anything else
//! is read as a bare task envelope `{id, session_id, message, metadata?}`.

use a2a_types::{
    JSONRPCId, JSONRPCRequest, MessageRole, TaskQueryParams, TaskSendParams, JSONRPC_VERSION,
    METHOD_GET_TASK, METHOD_SEND_TASK,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Rejection};

/// The operation an inbound request asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Send(TaskSendParams),
    Get(TaskQueryParams),
}

/// A parsed, validated request.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundRequest {
    pub id: Option<JSONRPCId>,
    /// Whether the caller used the JSON-RPC form, so the reply should too.
    pub jsonrpc: bool,
    pub call: Call,
}

pub fn parse_request(body: &[u8]) -> Result<InboundRequest, Rejection> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| Error::Json(e).with_id(None, true))?;

    if value.get("method").is_some() {
        parse_json_rpc(value)
    } else {
        parse_bare(value)
    }
}

fn parse_json_rpc(value: Value) -> Result<InboundRequest, Rejection> {
    let id = peek_id(&value);
    let request: JSONRPCRequest = serde_json::from_value(value)
        .map_err(|e| Error::InvalidRequest(e.to_string()).with_id(id.clone(), true))?;
    validate_request(&request).map_err(|e| e.with_id(id.clone(), true))?;

    let call = method_call(&request.method, request.params)
        .map_err(|e| e.with_id(request.id.clone(), true))?;

    Ok(InboundRequest {
        id: request.id,
        jsonrpc: true,
        call,
    })
}

fn method_call(method: &str, raw: Option<Value>) -> Result<Call, Error> {
    match method {
        METHOD_SEND_TASK => {
            let send: TaskSendParams = params(raw)?;
            validate_send(&send)?;
            Ok(Call::Send(send))
        }
        METHOD_GET_TASK => Ok(Call::Get(params(raw)?)),
        other => Err(Error::MethodNotFound(other.to_string())),
    }
}

fn parse_bare(value: Value) -> Result<InboundRequest, Rejection> {
    let id = peek_id(&value);
    let params: TaskSendParams = serde_json::from_value(value)
        .map_err(|e| Error::InvalidRequest(e.to_string()).with_id(id, false))?;

    let id = Some(JSONRPCId::from(params.id.clone()));
    validate_send(&params).map_err(|e| e.with_id(id.clone(), false))?;

    Ok(InboundRequest {
        id,
        jsonrpc: false,
        call: Call::Send(params),
    })
}

/// Helper function to validate JSON-RPC request
pub fn validate_request(req: &JSONRPCRequest) -> Result<(), Error> {
    if req.jsonrpc != JSONRPC_VERSION {
        return Err(Error::InvalidRequest(
            "Invalid JSON-RPC version".to_string(),
        ));
    }
    Ok(())
}

/// A task envelope needs an id, a session and a non-empty user message.
pub fn validate_send(params: &TaskSendParams) -> Result<(), Error> {
    if params.id.trim().is_empty() {
        return Err(Error::InvalidParams("Task id cannot be empty".to_string()));
    }
    if params.session_id.trim().is_empty() {
        return Err(Error::InvalidParams(
            "Session id cannot be empty".to_string(),
        ));
    }
    if params.message.role != MessageRole::User {
        return Err(Error::InvalidParams(
            "Message must come from the user".to_string(),
        ));
    }
    if params.message.parts.is_empty() {
        return Err(Error::InvalidParams(
            "Message must contain at least one part".to_string(),
        ));
    }
    Ok(())
}

fn params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, Error> {
    match params {
        Some(p) => serde_json::from_value(p).map_err(|e| Error::InvalidParams(e.to_string())),
        None => Err(Error::InvalidParams("Missing params".to_string())),
    }
}

/// Best-effort id of a request that failed to deserialize.
fn peek_id(value: &Value) -> Option<JSONRPCId> {
    value
        .get("id")
        .and_then(|id| serde_json::from_value(id.clone()).ok())
}
