//! # Smart Kiosk API
//!
//! HTTP service for shop-counter billing.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Kiosk API Routes                               │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  /auth         │  │  /products     │  │  /billing                  ││
//! │  │                │  │                │  │                            ││
//! │  │ • login        │  │ • list (?q=)   │  │ • sale (atomic, INV-xxxxx) ││
//! │  │ • me           │  │ • create       │  │ • sale/{id} (reprint)      ││
//! │  │                │  │ • update       │  │ • upi-qr                   ││
//! │  │                │  │ • delete       │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐            │
//! │  │  /owner        │  │  /reports      │  │  /health       │            │
//! │  │                │  │                │  │                │            │
//! │  │ • get / update │  │ • summary      │  │ • db ping      │            │
//! │  │                │  │ • csv / excel  │  │ (no auth)      │            │
//! │  └────────────────┘  └────────────────┘  └────────────────┘            │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │  kiosk-db    │  │  kiosk-core  │  │    JWT Auth              ││  │
//! │  │  │              │  │              │  │                          ││  │
//! │  │  │ SQLite (WAL) │  │ Pricing, UPI │  │ Principal extractor      ││  │
//! │  │  │ repositories │  │ report rules │  │ on protected routes      ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (see [`config::AppConfig`]):
//! - `DATABASE_URL` - SQLite URL or file path (default: sqlite://kiosk.db)
//! - `JWT_SECRET` - Secret for JWT signing
//! - `JWT_LIFETIME_SECS` - Token lifetime (default: 43200)
//! - `OWNER_DEFAULT_GST` - Initial owner GST rate (default: 0.18)
//! - `HTTP_HOST` / `HTTP_PORT` - Bind address (default: 0.0.0.0:5000)
//! - `ADMIN_PHONE` / `ADMIN_PASSWORD` - First login (default: admin / admin123)

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod export;
pub mod qr;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use kiosk_db::Database;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

// Re-exports
pub use auth::{JwtManager, Principal};
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    pub db: Database,
    pub jwt: JwtManager,
    pub config: AppConfig,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        let jwt = JwtManager::new(&config.jwt_secret, config.jwt_lifetime_secs);
        AppState { db, jwt, config }
    }
}

/// Creates the owner profile row and, on an empty users table, the initial
/// admin login.
pub async fn bootstrap(state: &AppState) -> ApiResult<()> {
    state.db.owner().ensure(state.config.owner_default_gst).await?;

    if state.db.users().count().await? == 0 {
        let hash = auth::hash_password(&state.config.admin_password)?;
        if state
            .db
            .users()
            .create_if_absent(&state.config.admin_phone, &hash)
            .await?
        {
            info!(phone = %state.config.admin_phone, "Created initial admin user");
        }
    }

    Ok(())
}

/// Builds the full HTTP router.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::auth::router())
        .merge(routes::owner::router())
        .merge(routes::products::router())
        .merge(routes::billing::router())
        .merge(routes::reports::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
