//! Agent capabilities a task manager can bind to.

pub mod agent;
pub mod function_agent;
pub mod greeting;
pub mod moderator;
pub mod remote_agent;

pub use agent::{Agent, AgentOutput};
pub use function_agent::FunctionAgent;
pub use greeting::GreetingAgent;
pub use moderator::{FeedbackEntry, ModeratorAgent, TransitionEntry};
pub use remote_agent::RemoteAgent;
