// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Waxworm Tracker API Server
//!
//! Logs egg harvest weights, tracks the weekly collection goal and serves
//! the container placement schedule.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waxworm_tracker::{
    config::{Config, StorageBackend},
    db::{JsonFileDb, LogRepository, MemoryDb},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        harvest_policy = %config.harvest_policy,
        "Starting Waxworm Tracker API"
    );

    // Pick the persistence backend
    let repo: Arc<dyn LogRepository> = match config.storage_backend {
        StorageBackend::File => {
            tracing::info!(path = %config.data_file.display(), "Using JSON file storage");
            Arc::new(JsonFileDb::new(&config.data_file))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(MemoryDb::new())
        }
    };

    let state = Arc::new(AppState::new(config.clone(), repo).await?);
    tracing::info!(
        sheets_configured = state.sheets.status().await.configured,
        "Spreadsheet sync initialized"
    );

    // Build router
    let app = waxworm_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("waxworm_tracker=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
