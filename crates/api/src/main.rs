//! SkyTrack - headless entry point
//!
//! Loads configuration, starts the application context and keeps it running
//! until Ctrl-C.

use anyhow::Context;
use skytrack_lib::utils::logging::init_tracing;
use skytrack_lib::AppContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading the logging configuration from it
    let _ = dotenvy::dotenv();
    let config = skytrack_infra::config::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let ctx = AppContext::new_with_config(config)
        .await
        .context("failed to initialise application context")?;

    let health = ctx.health_check().await;
    tracing::info!(healthy = health.is_healthy, score = health.score, "SkyTrack running");

    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;

    ctx.shutdown().await.context("shutdown failed")?;
    Ok(())
}
