use crate::errors::{AgentError, AgentResult};
use a2a_types::{Message, Task, TaskState};
use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing;

use super::task_store::TaskStore;

/// In-memory implementation of TaskStore.
///
/// All state sits behind one mutex per store instance, so every mutation and
/// every copy-on-read is serialized. The lock is never held across I/O.
/// `tokio::sync::Mutex` hands the lock out in FIFO order, which keeps
/// same-id upserts in the order they were issued.
///
/// Storage Structure:
/// ```text
/// tasks:    HashMap<task_id, Task>
/// sessions: HashMap<session_id, Vec<task_id>>
/// ```
///
/// Tasks are never evicted; they live as long as the process.
pub struct InMemoryTaskStore {
    state: Arc<Mutex<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    tasks: HashMap<String, Task>,
    sessions: HashMap<String, Vec<String>>,
}

impl InMemoryTaskStore {
    /// Create a new empty in-memory task store
    pub fn new() -> Self {
        tracing::warn!(
            "InMemoryTaskStore created - tasks are kept for the lifetime of the process and never evicted"
        );

        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
        }
    }

    /// Clear all tasks from storage.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.tasks.clear();
        state.sessions.clear();
    }

    /// Returns (total_sessions, total_tasks)
    pub async fn stats(&self) -> (usize, usize) {
        let state = self.state.lock().await;
        (state.sessions.len(), state.tasks.len())
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn upsert(&self, task_id: &str, session_id: &str, message: Message) -> AgentResult<Task> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let session = state.sessions.entry(session_id.to_string()).or_default();
        if !session.iter().any(|id| id == task_id) {
            session.push(task_id.to_string());
        }

        let task = match state.tasks.entry(task_id.to_string()) {
            Entry::Occupied(mut entry) => {
                let task = entry.get_mut();
                task.history.push(message);
                tracing::debug!(task_id, history = task.history.len(), "appended to task");
                task.clone()
            }
            Entry::Vacant(entry) => {
                tracing::debug!(task_id, session_id, "created task");
                entry.insert(Task::submitted(task_id, message)).clone()
            }
        };

        Ok(task)
    }

    async fn get(&self, task_id: &str, history_limit: Option<usize>) -> AgentResult<Option<Task>> {
        let state = self.state.lock().await;
        Ok(state
            .tasks
            .get(task_id)
            .map(|task| task.clone().with_history_limit(history_limit)))
    }

    async fn finalize(
        &self,
        task_id: &str,
        next: TaskState,
        message: Message,
    ) -> AgentResult<Task> {
        let mut state = self.state.lock().await;

        let task = state
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| AgentError::TaskNotFound {
                task_id: task_id.to_string(),
            })?;

        task.history.push(message);
        if task.status.can_transition_to(next) {
            task.status = next;
        } else {
            tracing::warn!(
                task_id,
                from = %task.status,
                to = %next,
                "ignoring transition out of terminal state"
            );
        }

        Ok(task.clone())
    }

    async fn session_tasks(&self, session_id: &str) -> AgentResult<Vec<String>> {
        let state = self.state.lock().await;
        Ok(state.sessions.get(session_id).cloned().unwrap_or_default())
    }

    async fn task_exists(&self, task_id: &str) -> AgentResult<bool> {
        let state = self.state.lock().await;
        Ok(state.tasks.contains_key(task_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a2a_types::MessageRole;
    use futures::future::join_all;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_upsert_new_task_is_submitted() {
        let store = InMemoryTaskStore::new();
        let task = store
            .upsert("t1", "s1", Message::user_text("hello"))
            .await
            .unwrap();

        assert_eq!(task.id, "t1");
        assert_eq!(task.status, TaskState::Submitted);
        assert_eq!(task.history.len(), 1);
        assert_eq!(task.history[0].role, MessageRole::User);
    }

    #[tokio::test]
    async fn test_upsert_existing_task_appends_one_message() {
        let store = InMemoryTaskStore::new();
        store.upsert("t1", "s1", Message::user_text("one")).await.unwrap();
        store.upsert("t1", "s1", Message::user_text("two")).await.unwrap();
        let task = store
            .upsert("t1", "s1", Message::user_text("three"))
            .await
            .unwrap();

        let texts: Vec<String> = task.history.iter().map(Message::text).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_get_with_history_limit_does_not_mutate() {
        let store = InMemoryTaskStore::new();
        for text in ["a", "b", "c", "d"] {
            store.upsert("t1", "s1", Message::user_text(text)).await.unwrap();
        }

        let tail = store.get("t1", Some(2)).await.unwrap().unwrap();
        let texts: Vec<String> = tail.history.iter().map(Message::text).collect();
        assert_eq!(texts, vec!["c", "d"]);

        let empty = store.get("t1", Some(0)).await.unwrap().unwrap();
        assert!(empty.history.is_empty());

        let full = store.get("t1", None).await.unwrap().unwrap();
        assert_eq!(full.history.len(), 4);

        let oversized = store.get("t1", Some(100)).await.unwrap().unwrap();
        assert_eq!(oversized.history.len(), 4);
    }

    #[tokio::test]
    async fn test_get_unknown_task_is_none() {
        let store = InMemoryTaskStore::new();
        assert!(store.get("missing", None).await.unwrap().is_none());
        assert!(!store.task_exists("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_returned_copy_is_isolated() {
        let store = InMemoryTaskStore::new();
        let mut copy = store.upsert("t1", "s1", Message::user_text("hi")).await.unwrap();
        copy.history.clear();
        copy.status = TaskState::Failed;

        let stored = store.get("t1", None).await.unwrap().unwrap();
        assert_eq!(stored.history.len(), 1);
        assert_eq!(stored.status, TaskState::Submitted);
    }

    #[tokio::test]
    async fn test_concurrent_upserts_keep_issue_order() {
        let store = Arc::new(InMemoryTaskStore::new());

        let upserts = (0..50).map(|i| {
            let store = store.clone();
            async move {
                store
                    .upsert("shared", "s1", Message::user_text(format!("msg-{i}")))
                    .await
                    .unwrap()
            }
        });
        join_all(upserts).await;

        let task = store.get("shared", None).await.unwrap().unwrap();
        assert_eq!(task.history.len(), 50);
        assert_eq!(task.status, TaskState::Submitted);
        for (i, message) in task.history.iter().enumerate() {
            assert_eq!(message.text(), format!("msg-{i}"));
        }
        assert_eq!(store.stats().await, (1, 1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_contended_upserts_on_one_id_lose_nothing() {
        let store = Arc::new(InMemoryTaskStore::new());

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .upsert("shared", "s1", Message::user_text(format!("msg-{i}")))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let task = store.get("shared", None).await.unwrap().unwrap();
        assert_eq!(task.history.len(), 50);
        assert_eq!(task.status, TaskState::Submitted);
        let texts: HashSet<String> = task.history.iter().map(Message::text).collect();
        assert_eq!(texts.len(), 50);
        assert_eq!(store.stats().await, (1, 1));
        assert_eq!(store.session_tasks("s1").await.unwrap(), vec!["shared".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_upserts_on_different_ids_are_independent() {
        let store = Arc::new(InMemoryTaskStore::new());

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .upsert(&format!("t{i}"), "s1", Message::user_text("hi"))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            let task = handle.await.unwrap();
            assert_eq!(task.history.len(), 1);
        }

        assert_eq!(store.session_tasks("s1").await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_finalize_sets_terminal_state_once() {
        let store = InMemoryTaskStore::new();
        store.upsert("t1", "s1", Message::user_text("hi")).await.unwrap();

        let done = store
            .finalize("t1", TaskState::Completed, Message::agent_text("hello"))
            .await
            .unwrap();
        assert_eq!(done.status, TaskState::Completed);
        assert_eq!(done.history.len(), 2);

        // A terminal task keeps its status; the reply is still recorded.
        let after = store
            .finalize("t1", TaskState::Failed, Message::agent_text("late failure"))
            .await
            .unwrap();
        assert_eq!(after.status, TaskState::Completed);
        assert_eq!(after.history.len(), 3);
    }

    #[tokio::test]
    async fn test_finalize_unknown_task() {
        let store = InMemoryTaskStore::new();
        let err = store
            .finalize("nope", TaskState::Completed, Message::agent_text("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::TaskNotFound { .. }));
    }

    #[tokio::test]
    async fn test_session_index_tracks_first_seen_order() {
        let store = InMemoryTaskStore::new();
        store.upsert("t2", "s1", Message::user_text("a")).await.unwrap();
        store.upsert("t1", "s1", Message::user_text("b")).await.unwrap();
        store.upsert("t2", "s1", Message::user_text("c")).await.unwrap();
        store.upsert("t3", "s2", Message::user_text("d")).await.unwrap();

        assert_eq!(store.session_tasks("s1").await.unwrap(), vec!["t2", "t1"]);
        assert_eq!(store.session_tasks("s2").await.unwrap(), vec!["t3"]);
        assert!(store.session_tasks("unknown").await.unwrap().is_empty());

        store.clear().await;
        assert_eq!(store.stats().await, (0, 0));
    }
}
