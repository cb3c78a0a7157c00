//! Best-effort agent discovery.
//!
//! Every base URL is asked for its discovery document once, concurrently, with
//! a short timeout. A URL that cannot be reached or that answers with something
//! other than a card document is logged and skipped; the run never fails as a
//! whole. An empty result is a valid outcome.

use crate::constants::{AGENT_CARD_PATH, DEFAULT_DISCOVERY_TIMEOUT};
use crate::error::{A2AError, A2AResult};
use a2a_types::{AgentCard, AgentCardDocument};
use futures::future::join_all;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;

/// A base URL that was skipped during a discovery run.
#[derive(Debug)]
pub struct DiscoveryFailure {
    pub url: String,
    pub error: A2AError,
}

/// Outcome of one discovery run.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    /// Cards keyed by agent id.
    pub cards: BTreeMap<String, AgentCard>,
    pub failures: Vec<DiscoveryFailure>,
}

impl DiscoveryReport {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Fetches discovery documents from a fixed list of base URLs.
#[derive(Clone)]
pub struct DiscoveryClient {
    client: Client,
    base_urls: Vec<String>,
    timeout: Duration,
}

impl DiscoveryClient {
    pub fn new(base_urls: Vec<String>) -> Self {
        Self::with_client(base_urls, Client::new())
    }

    pub fn with_client(base_urls: Vec<String>, client: Client) -> Self {
        Self {
            client,
            base_urls,
            timeout: DEFAULT_DISCOVERY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_urls(&self) -> &[String] {
        &self.base_urls
    }

    /// Location of the discovery document for `base_url`.
    pub fn discovery_url(base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), AGENT_CARD_PATH)
    }

    /// Fetch and parse one discovery document.
    pub async fn fetch_document(&self, base_url: &str) -> A2AResult<AgentCardDocument> {
        let url = Self::discovery_url(base_url);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.fetch_error(&url, e))?;

        if !response.status().is_success() {
            return Err(A2AError::NetworkError {
                message: format!("HTTP error {} fetching {}", response.status(), url),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.fetch_error(&url, e))?;

        serde_json::from_str(&body).map_err(|e| A2AError::SerializationError {
            message: format!("Malformed discovery document at {}: {}", url, e),
        })
    }

    /// Query every base URL and merge the cards that came back.
    ///
    /// Results are merged in base-URL order, so when two sources advertise the
    /// same agent id the later source wins.
    pub async fn discover(&self) -> DiscoveryReport {
        let fetches = self.base_urls.iter().map(|base| async move {
            let outcome = self.fetch_document(base).await;
            (base.clone(), outcome)
        });

        let mut report = DiscoveryReport::default();
        for (base, outcome) in join_all(fetches).await {
            match outcome {
                Ok(document) => {
                    for (id, card) in document.into_entries() {
                        if let Some(previous) = report.cards.insert(id.clone(), card) {
                            tracing::debug!(
                                agent_id = %id,
                                replaced_url = %previous.url,
                                source = %base,
                                "duplicate agent id, keeping later source"
                            );
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!(url = %base, error = %error, "skipping agent during discovery");
                    report.failures.push(DiscoveryFailure { url: base, error });
                }
            }
        }

        tracing::info!(
            discovered = report.cards.len(),
            skipped = report.failures.len(),
            "discovery run finished"
        );
        report
    }

    /// Convenience wrapper returning only the discovered cards.
    pub async fn list_agent_cards(&self) -> BTreeMap<String, AgentCard> {
        self.discover().await.cards
    }

    fn fetch_error(&self, url: &str, error: reqwest::Error) -> A2AError {
        if error.is_timeout() {
            A2AError::Timeout {
                url: url.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            A2AError::NetworkError {
                message: format!("Failed to fetch {}: {}", url, error),
            }
        }
    }
}
