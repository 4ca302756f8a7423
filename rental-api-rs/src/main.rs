//! rental-api binary
//!
//! Binds the HTTP server over the seeded in-memory dataset. All
//! tuning comes from the environment (see [`rental_api::config`]).

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use rental_api::config::ServiceConfig;
use rental_api::http::{router, AppState};
use rental_api::store::MemoryStore;
use rental_sdk::Guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServiceConfig::from_env();
    tracing::info!(
        addr = %config.bind_addr,
        timeout_ms = config.guard.timeout.as_millis() as u64,
        cooldown_ms = config.guard.breaker.cooldown.as_millis() as u64,
        "starting rental-api"
    );

    let store = Arc::new(MemoryStore::seeded());
    let guard = Arc::new(Guard::new(config.guard.clone()));
    let app = router(AppState::new(store, guard));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
