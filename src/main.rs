use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use hypescan::api::routes::create_router;
use hypescan::config::Config;
use hypescan::services::provider::HttpProvider;
use hypescan::{FetchOrchestrator, ViewModelStore};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Using providers at {}", config.provider_url);

    let providers = HttpProvider::from_config(&config).context("Failed to build HTTP client")?;
    let store = Arc::new(ViewModelStore::new());
    let orchestrator = Arc::new(FetchOrchestrator::new(store, providers, config.provider_timeout));

    let app = create_router(orchestrator);

    tracing::info!("Listening on {}", config.listen_addr);
    let listener = TcpListener::bind(config.listen_addr).await?;

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("Failed to serve API: {:?}", e);
    }

    Ok(())
}
