//! OrderSheet - order webhook to spreadsheet ledger
//!
//! Main entry point for the HTTP service.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use ordersheet_api::utils::logging::init_tracing;
use ordersheet_api::{router, AppContext};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the subscriber reads RUST_LOG
    let dotenv = dotenvy::dotenv();
    init_tracing().map_err(|err| anyhow!("failed to initialise tracing: {err}"))?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(err) => debug!(error = %err, "No .env file loaded"),
    }

    let config = ordersheet_infra::config::load().context("failed to load configuration")?;
    let ctx = Arc::new(AppContext::new(&config));

    let listener = TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_address))?;
    info!(address = %listener.local_addr()?, "OrderSheet listening");

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("OrderSheet stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => {
            error!(error = %err, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
