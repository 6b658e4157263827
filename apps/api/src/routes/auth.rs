//! Login and session introspection.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, warn};

use crate::auth::{verify_password, Principal};
use crate::dto::{LoginRequest, LoginResponse};
use crate::error::{ApiError, ApiResult};
use crate::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}

/// Exchanges phone + password for a session token.
async fn login(
    State(state): State<SharedState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(request) = payload?;
    let phone = request.phone.unwrap_or_default().trim().to_string();
    let password = request.password.unwrap_or_default();

    let user = match state.db.users().find_by_phone(&phone).await? {
        Some(user) if verify_password(&password, &user.password_hash) => user,
        _ => {
            warn!(phone = %phone, "Login rejected");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let token = state.jwt.issue(&user)?;
    info!(uid = user.id, "User logged in");

    Ok(Json(LoginResponse {
        user: Principal {
            id: user.id,
            phone: user.phone,
            role: user.role,
        },
        token,
    }))
}

async fn me(principal: Principal) -> Json<Principal> {
    Json(principal)
}
