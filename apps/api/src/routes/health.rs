//! Liveness probe.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::SharedState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub db: bool,
}

pub fn router() -> Router<SharedState> {
    Router::new().route("/health", get(health))
}

/// Always answers `ok`; `db` reports whether SQLite responds.
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        db: state.db.health_check().await,
    })
}
