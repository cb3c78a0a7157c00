//! Constants for the A2A client

use std::time::Duration;

/// Path of the discovery document, relative to an agent's base URL
pub const AGENT_CARD_PATH: &str = ".well-known/agent.json";

/// Per-URL timeout used while fetching discovery documents
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout applied to a task envelope sent to a delegate
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
