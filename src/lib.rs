//! Task lifecycle runtime for agent meshes.
//!
//! Agents expose one task-submission contract. This crate holds everything
//! behind it that is independent of the HTTP surface:
//!
//! - [`task`]: the task store and the task manager that drives an agent
//! - [`agents`]: the agent capability trait and built-in capabilities
//! - [`registry`]: the discovered agent table
//! - [`orchestrator`]: delegate selection and the routing capability
//! - [`config`]: node configuration loading
//! - [`telemetry`]: tracing setup

pub mod agents;
pub mod config;
pub mod errors;
pub mod orchestrator;
pub mod registry;
pub mod task;
pub mod telemetry;

// Re-export key task management types for easier access
pub use task::{AgentTaskManager, InMemoryTaskStore, TaskManager, TaskStore};

pub use agents::{Agent, AgentOutput};
pub use orchestrator::OrchestratorAgent;
pub use registry::AgentRegistry;

// Re-export key error types for easier access
pub use errors::{AgentError, AgentResult, LoaderError};
