use crate::errors::AgentResult;
use a2a_types::{Message, Task, TaskState};
use async_trait::async_trait;

/// Storage abstraction for task records.
///
/// Every operation is atomic with respect to a single task id: two concurrent
/// upserts of an unknown id create exactly one task, and appends to the same
/// id land in the order the calls were issued. Returned tasks are copies; no
/// caller ever holds a reference into the store.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Create the task if `task_id` is new, otherwise append `message` to its
    /// history. Returns a copy of the task after the write.
    ///
    /// A new task starts `SUBMITTED` with `message` as its only history entry.
    /// An existing task keeps its status.
    async fn upsert(&self, task_id: &str, session_id: &str, message: Message) -> AgentResult<Task>;

    /// Retrieve a copy of a task. With `history_limit`, only the last
    /// `history_limit` messages are returned; the stored task is untouched.
    /// Returns `None` for an unknown id.
    async fn get(&self, task_id: &str, history_limit: Option<usize>) -> AgentResult<Option<Task>>;

    /// Append the agent's reply and move the task to `state`.
    ///
    /// A task that is already terminal keeps its status when `state` differs;
    /// the message is still appended so no reply is lost.
    async fn finalize(&self, task_id: &str, state: TaskState, message: Message)
        -> AgentResult<Task>;

    /// Ids of the tasks a session has touched, in first-seen order.
    async fn session_tasks(&self, session_id: &str) -> AgentResult<Vec<String>>;

    /// Check if a task exists without copying its history.
    async fn task_exists(&self, task_id: &str) -> AgentResult<bool> {
        Ok(self.get(task_id, Some(0)).await?.is_some())
    }
}
