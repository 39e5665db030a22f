//! Main Entrypoint for the Hirevox API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Wiring the session store, LLM gateway, and orchestrator.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use hirevox_api::{config::Config, router::create_router, state::AppState};
use hirevox_core::{
    gateway::HttpLlmGateway, orchestrator::InterviewOrchestrator, session::SessionStore,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();
    info!("Configuration loaded. Initializing application state...");

    let store = Arc::new(SessionStore::new());
    let gateway = Arc::new(HttpLlmGateway::new());
    let orchestrator = Arc::new(InterviewOrchestrator::new(
        store,
        gateway,
        config.turn_limit,
    ));

    let app_state = Arc::new(AppState { orchestrator });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    info!(
        bind_address = %config.bind_address,
        turn_limit = config.turn_limit,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server has shut down.");
    Ok(())
}
