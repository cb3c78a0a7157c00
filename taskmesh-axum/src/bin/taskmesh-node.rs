//! Runs one taskmesh node from a YAML or JSON configuration file.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use taskmesh::config::ConfigLoader;
use taskmesh::telemetry::init_tracing;
use taskmesh_axum::MeshNode;

#[derive(Parser, Debug)]
#[command(name = "taskmesh-node")]
#[command(author, version, about = "Host task-handling agents behind an envelope endpoint")]
struct Cli {
    /// Node configuration file (.yaml, .yml or .json)
    #[arg(short, long)]
    config: PathBuf,

    /// Override the configured bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the configured port
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level for the workspace crates (RUST_LOG takes precedence)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::from_path(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.log_level.is_some() {
        config.log_level = cli.log_level;
    }

    init_tracing(config.log_level.as_deref());
    tracing::info!(config = %cli.config.display(), agents = config.agents.len(), "starting node");

    let node = MeshNode::from_config(config).await?;
    node.serve(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        tracing::info!("shutdown requested");
    })
    .await?;

    Ok(())
}
