//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Kasir API                              │
//! │                                                                         │
//! │  Handler: Result<ApiResponse<T>, ApiError>                             │
//! │         │                                                               │
//! │         ├── JsonRejection / PathRejection ───────────► 400             │
//! │         ├── ValidationError ─────────────────────────► 400             │
//! │         ├── CheckoutError ── InvalidRequest ─────────► 400             │
//! │         │                 ── ItemNotFound ───────────► 404             │
//! │         │                 ── InsufficientStock ──────► 422             │
//! │         │                 ── ConcurrentStockConflict ► 409             │
//! │         │                 ── StorageFailure (busy) ──► 503             │
//! │         │                 ── StorageFailure ─────────► 500 (logged)    │
//! │         └── DbError ── NotFound ─────────────────────► 404             │
//! │                     ── ForeignKeyViolation ──────────► 409             │
//! │                     ── Busy / PoolExhausted ─────────► 503             │
//! │                     ── anything else ────────────────► 500 (logged)    │
//! │                                                                         │
//! │  Storage details never reach the client; they go to the log.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use kasir_core::ValidationError;
use kasir_db::{CheckoutError, DbError};

use crate::response::ApiResponse;

/// API error returned from handlers.
///
/// Serialized inside the standard envelope:
/// ```json
/// { "success": false, "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for item 2: available 1, requested 3" }
/// ```
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed body or path, or a rule on the input failed (400)
    ValidationError,

    /// Resource not found (404)
    NotFound,

    /// Not enough stock for a checkout line (422)
    InsufficientStock,

    /// Another checkout changed the stock mid-flight; retry (409)
    StockConflict,

    /// Request conflicts with existing records (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,

    /// Dependency not ready (503)
    Unavailable,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InsufficientStock => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::StockConflict | ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        ApiResponse::failure(self.status(), self.code, self.message).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::new(
                    ErrorCode::Conflict,
                    "Record is referenced by recorded transactions",
                )
            }
            DbError::Busy(e) => {
                tracing::warn!("Database busy: {}", e);
                ApiError::new(ErrorCode::Unavailable, "Database busy, please retry")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::Unavailable, "Database is overloaded, please retry")
            }
            other => {
                // Log the actual error but return a generic message
                tracing::error!(error = %other, "Database operation failed");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts checkout failures to API errors.
impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::InvalidRequest(e) => ApiError::validation(e.to_string()),
            CheckoutError::ItemNotFound(id) => ApiError::not_found("Item", id),
            e @ CheckoutError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, e.to_string())
            }
            e @ CheckoutError::ConcurrentStockConflict(_) => {
                ApiError::new(ErrorCode::StockConflict, e.to_string())
            }
            CheckoutError::StorageFailure(e) if e.is_busy() => {
                tracing::warn!(error = %e, "Checkout timed out waiting for the write lock");
                ApiError::new(ErrorCode::Unavailable, "Store is busy, nothing was charged")
            }
            CheckoutError::StorageFailure(e) => {
                tracing::error!(error = %e, "Checkout failed in storage");
                ApiError::new(ErrorCode::DatabaseError, "Checkout failed, nothing was charged")
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
