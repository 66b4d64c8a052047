use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use reelscout::{
    api::{create_router, AppState},
    config::Config,
    services::providers::TmdbClient,
    store::{FavoritesStore, JsonFileStorage},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reelscout=info,tower_http=info")),
        )
        .init();

    // Invalid configuration is fatal
    let config = Config::from_env().context("Failed to load config")?;

    let provider = Arc::new(TmdbClient::from_config(&config));
    let storage = JsonFileStorage::new(config.data_dir.clone())
        .with_context(|| format!("Failed to open data directory {:?}", config.data_dir))?;
    let favorites = FavoritesStore::load(Arc::new(storage));

    let state = AppState::new(provider, favorites);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app).await?;

    Ok(())
}
