//! Drink ordering server
//!
//! Reads `AppConfig` (YAML file from `ORDERSYSTEM_CONFIG` plus environment
//! overrides), brings up the selected store and serves REST (and gRPC when
//! built with the `grpc` feature) on one address.

use anyhow::Result;
use ordersystem::config::AppConfig;
use ordersystem::server::ServerBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::load()?;
    tracing::info!(backend = ?config.backend, addr = %config.addr, "starting ordersystem");

    let builder = ServerBuilder::from_config(&config).await?;
    builder.serve(&config.addr).await
}
