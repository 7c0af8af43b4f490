use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pulse::analytics::AnalyticsService;
use pulse::api::create_api_router;
use pulse::config::Config;
use pulse::storage;
use pulse::ui::UiState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize record store
    let store = storage::connect(&config.store).await?;
    info!("Initializing record store...");
    store.init().await.context("failed to initialize record store")?;
    info!("Record store initialized successfully");

    let analytics = Arc::new(AnalyticsService::new(store));
    let ui = UiState::new();

    let router = create_api_router(Arc::clone(&analytics), ui.clone(), &config.cors);

    let api_addr = format!("{}:{}", config.api_server.host, config.api_server.port);
    let listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind {api_addr}"))?;
    info!("🚀 API server listening on http://{}", api_addr);
    info!("   - Analytics snapshot at http://{}/api/analytics", api_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down, clearing UI state");
    ui.clear().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
