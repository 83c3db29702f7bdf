// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::{load_backend_config, load_pages_config};
use crate::infrastructure::http_repository::HttpRepository;
use crate::presentation::app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sprayline_dashboard=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let backend_config = load_backend_config().context("Failed to load config/backend")?;
    let pages_config = load_pages_config().context("Failed to load config/pages")?;

    // Create repository (infrastructure layer)
    let base_url = backend_config.backend.base_url();
    let repository = Arc::new(HttpRepository::new(base_url.clone()));

    // Create services (application layer)
    let state = Arc::new(AppState::new(repository, &pages_config));
    state
        .maintenance
        .start_refresh(Duration::from_millis(backend_config.maintenance.refresh_ms));

    // Build router (presentation layer)
    let router = presentation::router(state.clone());

    // Start server
    let addr: SocketAddr = backend_config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid server bind address {}", backend_config.server.bind))?;
    tracing::info!(%addr, backend = %base_url, pages = state.live_pages.len(), "Starting sprayline-dashboard");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await?;

    state.maintenance.stop_refresh();
    tracing::info!("Shut down");

    Ok(())
}
