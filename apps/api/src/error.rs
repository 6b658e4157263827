//! Error types for the Kiosk API.
//!
//! Every failure leaves the service as `{"error": "<message>", "code": "<CODE>"}`
//! with a matching status:
//!
//! ```text
//! ValidationError ──► CoreError ──► DbError ──► ApiError ──► HTTP
//!                                                 │
//!                          401  Unauthorized / InvalidCredentials
//!                          404  NotFound
//!                          400  BadRequest (codes per rule)
//!                          500  Persistence (details logged only)
//! ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kiosk_core::{CoreError, ValidationError};
use kiosk_db::DbError;
use serde::Serialize;
use tracing::error;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    /// Storage or internal failure. The detail is logged, never returned.
    #[error("Internal server error")]
    Persistence(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest { code, .. } => *code,
            ApiError::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Persistence(detail) = &self {
            error!(%detail, "Request failed on storage");
        }

        let body = ErrorBody {
            error: self.to_string(),
            code: self.code(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::bad_request("VALIDATION_ERROR", error.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        let code = match &error {
            CoreError::ProductNotFound(_) => return ApiError::NotFound(error.to_string()),
            CoreError::Validation(inner) => return ApiError::bad_request("VALIDATION_ERROR", inner.to_string()),
            CoreError::EmptyOrder => "EMPTY_ORDER",
            CoreError::InvalidQuantity { .. } => "INVALID_QUANTITY",
            CoreError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            CoreError::InvalidAmount => "INVALID_AMOUNT",
            CoreError::PaymentAddressNotConfigured => "PAYMENT_ADDRESS_NOT_CONFIGURED",
        };
        ApiError::bad_request(code, error.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::NotFound { .. } => ApiError::NotFound(error.to_string()),
            DbError::Core(core) => core.into(),
            DbError::UniqueViolation { .. } => ApiError::bad_request("DUPLICATE", error.to_string()),
            other => ApiError::Persistence(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request("INVALID_BODY", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request("INVALID_PATH", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request("INVALID_QUERY", rejection.body_text())
    }
}
