//! Instance gateway server entry point.
//!
//! Initialises tracing, loads configuration from environment variables, wires
//! the AWS CLI adapters behind the port traits, and serves the single-entry
//! router.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use instance_gateway::config::Config;
use instance_gateway::gateway::{self, AppState};
use instance_gateway::infra::{AwsCliCompute, DynamoCliStore, TokioCommandRunner};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config: Config =
        envy::from_env().context("loading configuration from environment variables")?;

    tracing::info!(
        listen_addr = %config.listen_addr,
        region = %config.aws_region,
        table = %config.instances_table,
        image_override = config.ami_id.is_some(),
        idp_configured = config.idp().is_some(),
        "configuration loaded",
    );

    let cloud = AwsCliCompute::new(TokioCommandRunner::default(), config.aws_region.clone());
    let store = DynamoCliStore::new(
        TokioCommandRunner::default(),
        config.aws_region.clone(),
        config.instances_table.clone(),
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!("instance gateway listening on http://{}", config.listen_addr);

    let state = Arc::new(AppState {
        config,
        cloud: Arc::new(cloud),
        store: Arc::new(store),
    });

    axum::serve(listener, gateway::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("instance gateway shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) for graceful shutdown.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl-C handler");
    tracing::info!("received shutdown signal");
}
