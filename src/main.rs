// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Employee Service API Server

use employee_service::{config::Config, db::Db, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Employee Service API");

    // Open the database and create tables
    let db = Db::connect(&config.database_url).await?;
    db.migrate().await?;
    tracing::info!(url = %config.database_url, "Database ready");

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let state = Arc::new(AppState::new(config.clone(), db));

    if let Some((email, password)) = config.admin_seed() {
        state.directory.ensure_admin(email, password).await?;
    } else {
        tracing::debug!("ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping administrator seed");
    }

    // Build router
    let app = employee_service::routes::create_router(state.clone());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.db.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("employee_service=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
