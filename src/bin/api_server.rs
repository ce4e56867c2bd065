// API Server Binary Entry Point
//
// Purpose: Start the Axum API server over the tiered bloom calculator
// Usage: cargo run --features api --bin api_server

use bloom_planner::{AppState, PlannerConfig, create_router};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "bloom_planner=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = PlannerConfig::from_env();

    tracing::info!("Configuration:");
    tracing::info!("  BLOOM_DATASET: {}", config.dataset_path.display());
    tracing::info!("  RECORD_STORE_URL: {}", config.record_store_url.as_deref().unwrap_or("(unset)"));
    tracing::info!("  SUGGEST_URL: {}", config.suggest_url.as_deref().unwrap_or("(unset)"));
    tracing::info!("  TIER_TIMEOUT_MS: {}", config.tier_timeout_ms);
    tracing::info!("  PORT: {}", config.port);

    // Loads the local dataset and wires collaborators
    let state = AppState::new(&config).await?;
    tracing::info!("Application state initialized successfully");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
