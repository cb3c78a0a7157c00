//! Agent registry: the table of agent id to card an orchestrator routes over.
//!
//! The table is swapped as a whole. Readers take a snapshot (`Arc` clone) and
//! never observe a partially refreshed table.

use a2a_client::DiscoveryClient;
use a2a_types::AgentCard;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

pub type AgentTable = BTreeMap<String, AgentCard>;

#[derive(Default)]
pub struct AgentRegistry {
    table: RwLock<Arc<AgentTable>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: AgentTable) -> Self {
        Self {
            table: RwLock::new(Arc::new(cards)),
        }
    }

    /// Replace the whole table.
    pub async fn replace(&self, cards: AgentTable) {
        let mut table = self.table.write().await;
        *table = Arc::new(cards);
    }

    /// Current table. Later replacements do not affect the returned snapshot.
    pub async fn snapshot(&self) -> Arc<AgentTable> {
        self.table.read().await.clone()
    }

    pub async fn get(&self, agent_id: &str) -> Option<AgentCard> {
        self.table.read().await.get(agent_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.table.read().await.is_empty()
    }

    /// Run discovery once and install its result, even when it is empty.
    /// Returns the number of agents now registered.
    pub async fn refresh(&self, discovery: &DiscoveryClient) -> usize {
        let report = discovery.discover().await;
        let count = report.cards.len();
        self.replace(report.cards).await;
        tracing::info!(agents = count, "agent registry refreshed");
        count
    }

    /// Re-run discovery every `period` on a background task.
    ///
    /// The first refresh happens one full period after the call.
    pub fn spawn_periodic_refresh(
        self: Arc<Self>,
        discovery: DiscoveryClient,
        period: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.refresh(&discovery).await;
            }
        })
    }
}
