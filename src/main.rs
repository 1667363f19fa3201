//! Invoice dashboard server
//!
//! ```sh
//! DASHBOARD_CONFIG=dashboard.yaml cargo run
//! DASHBOARD_STORAGE=postgres DATABASE_URL=postgres://... cargo run --features postgres
//! ```

use anyhow::Result;
use dashboard::config::DashboardConfig;
use dashboard::core::DashboardError;
use dashboard::server::ServerBuilder;
use dashboard::storage;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::var("DASHBOARD_CONFIG") {
        Ok(path) => DashboardConfig::from_yaml_file(&path)
            .map_err(|e| DashboardError::Config(format!("failed to load '{}': {}", path, e)))?,
        Err(_) => DashboardConfig::default(),
    }
    .apply_env_overrides()
    .map_err(|e| DashboardError::Config(e.to_string()))?;
    config
        .validate()
        .map_err(|e| DashboardError::Config(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    tracing::info!(backend = %config.storage.backend, "Starting invoice dashboard");

    let store = storage::open(&config.storage).await?;

    ServerBuilder::new()
        .with_shared_store(store)
        .serve(&config.bind_address())
        .await
}
