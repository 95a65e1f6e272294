//! # Agora Node
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize logging and metrics
//! 3. Validate configuration
//! 4. Connect the broker (or fall back to local-only) and build services
//! 5. Run until Ctrl+C, then shut down gracefully

use anyhow::{Context, Result};
use tracing::info;

use agora_telemetry::init_telemetry;
use node_runtime::{NodeConfig, NodeRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env();

    let _telemetry =
        init_telemetry(config.telemetry.clone()).context("Failed to initialize telemetry")?;

    config.validate().context("Invalid configuration")?;

    let runtime = NodeRuntime::start(config)
        .await
        .context("Failed to start node")?;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;
    Ok(())
}
