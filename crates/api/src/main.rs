//! Mileage Prediction Service - Main Entry Point

use anyhow::Context;
use api::{init_logging, init_metrics, run_server, AppConfig, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_logging(&config.logging)?;

    info!("=== Mileage Predictor v{} ===", env!("CARGO_PKG_VERSION"));

    let metrics = init_metrics()?;
    let state = AppState::load(&config)
        .context("cannot serve predictions without all three models")?
        .with_metrics(metrics);

    run_server(&config, Arc::new(state)).await?;

    Ok(())
}
