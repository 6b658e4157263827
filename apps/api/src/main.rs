//! # Smart Kiosk API
//!
//! HTTP server for shop-counter billing.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kiosk API Server                                 │
//! │                                                                         │
//! │  env ──► AppConfig ──► Database (SQLite, migrations) ──► bootstrap     │
//! │                                                          (owner row,   │
//! │                                                           admin login) │
//! │                                                              │          │
//! │  Web client ───► HTTP (5000) ───► Router ───► kiosk-db ◄─────┘          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;
use kiosk_api::{bootstrap, build_router, AppConfig, AppState};
use kiosk_db::{Database, DbConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,kiosk_api=debug,kiosk_db=debug")),
        )
        .with_target(true)
        .init();

    info!("Starting Smart Kiosk API server...");

    // Load configuration
    let config = AppConfig::load()?;
    info!(
        addr = %config.bind_addr(),
        db_url = %config.database_url,
        "Configuration loaded"
    );
    if config.uses_dev_secret() {
        warn!("JWT_SECRET not set, signing tokens with the development secret");
    }

    // Connect to database (migrations run on connect)
    let mut db_config = DbConfig::from_url(&config.database_url);
    // An in-memory database lives on a single connection
    if db_config.database_path.as_os_str() != ":memory:" {
        db_config = db_config.max_connections(config.db_max_connections);
    }
    let db = Database::new(db_config)
        .await
        .context("failed to open database")?;
    info!("Database ready");

    let state = Arc::new(AppState::new(db, config));
    bootstrap(&state).await.context("failed to seed initial data")?;

    let addr = state.config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "Starting HTTP server");

    axum::serve(listener, build_router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
