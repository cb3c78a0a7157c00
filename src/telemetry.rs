//! Tracing subscriber setup shared by every binary in the workspace.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor an explicit level is given.
pub const DEFAULT_FILTER: &str =
    "taskmesh=info,taskmesh_axum=info,a2a_client=info,tower_http=info";

/// Build the filter: `RUST_LOG` wins, then `level` applied to the workspace
/// crates, then [`DEFAULT_FILTER`].
pub fn env_filter(level: Option<&str>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    match level {
        Some(level) => EnvFilter::new(format!(
            "taskmesh={level},taskmesh_axum={level},a2a_client={level},tower_http={level}"
        )),
        None => EnvFilter::new(DEFAULT_FILTER),
    }
}

/// Install the global subscriber. Calling it again is a no-op, so tests and
/// embedding applications can call it freely.
pub fn init_tracing(level: Option<&str>) {
    let installed = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("tracing initialized");
    }
}
