//! Delegate selection and the orchestrator capability built on it.

pub mod agent;
pub mod selector;

pub use agent::OrchestratorAgent;
pub use selector::{DelegateSelector, Selection};
