//! Task Management
//!
//! - `TaskStore`: storage abstraction with atomic create-or-append
//! - `InMemoryTaskStore`: the single-mutex in-process implementation
//! - `TaskManager`: the handler the router dispatches envelopes to
//! - `AgentTaskManager`: binds one agent capability to a store

pub mod in_memory_task_store;
pub mod task_manager;
pub mod task_store;

pub use in_memory_task_store::InMemoryTaskStore;
pub use task_manager::{AgentTaskManager, TaskManager, DEFAULT_INVOKE_TIMEOUT};
pub use task_store::TaskStore;
