//! HTTP surface for taskmesh.
//!
//! Serves task envelopes on `POST /` and `POST /agents/{agent_id}`, accepting
//! both the bare envelope and the JSON-RPC `tasks/send` / `tasks/get` forms,
//! and advertises hosted agent cards on `GET /.well-known/agent.json`.

pub mod dispatch;
pub mod error;
pub mod json_rpc;
pub mod node;
pub mod routes;
pub mod server;

pub use dispatch::AgentBindings;
pub use error::{Error, Rejection, Result};
pub use node::MeshNode;
pub use server::{A2AServer, A2AServerBuilder};
