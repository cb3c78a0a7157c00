//! # Task Envelope Client
//!
//! This crate provides the outbound half of the agent protocol: a client for
//! submitting task envelopes to a remote agent, and a best-effort discovery
//! client that collects agent cards from a list of base URLs.
//!
//! ## Features
//!
//! - Bare-envelope `tasks/send` and JSON-RPC `tasks/get`
//! - Bounded per-request timeouts, reported as [`A2AError::Timeout`]
//! - Discovery that tolerates unreachable or malformed sources
//!
//! ## Example
//!
//! ```rust,no_run
//! use a2a_client::{A2AClient, DiscoveryClient};
//! use a2a_types::{Message, TaskSendParams};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let discovery = DiscoveryClient::new(vec!["http://localhost:10001".to_string()]);
//! let cards = discovery.list_agent_cards().await;
//!
//! if let Some(card) = cards.values().next() {
//!     let client = A2AClient::from_card(card.clone())?.with_timeout(Duration::from_secs(10));
//!     let params = TaskSendParams::new("t1", "s1", Message::user_text("hello"));
//!     let task = client.send_task(params).await?;
//!     println!("{} -> {}", task.id, task.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod constants;
pub mod discovery;
pub mod error;

pub use client::A2AClient;
pub use discovery::{DiscoveryClient, DiscoveryFailure, DiscoveryReport};
pub use error::{A2AError, A2AResult};
