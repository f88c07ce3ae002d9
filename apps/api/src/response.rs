//! # Response Envelope
//!
//! Every JSON body this API returns, success or failure, has the same shape:
//!
//! ```json
//! { "success": true,  "message": "Checkout successful", "data": { ... } }
//! { "success": false, "message": "Item not found: 7", "code": "NOT_FOUND" }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::ErrorCode;

/// JSON envelope plus the HTTP status it is sent with.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip)]
    status: StatusCode,

    pub success: bool,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// `200 OK` with a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::success(StatusCode::OK, message, data)
    }

    /// `201 Created` with the created resource.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::success(StatusCode::CREATED, message, data)
    }

    fn success(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            status,
            success: true,
            message: message.into(),
            data: Some(data),
            code: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl ApiResponse<()> {
    /// Success without a payload.
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        ApiResponse {
            status,
            success: true,
            message: message.into(),
            data: None,
            code: None,
        }
    }

    /// Failure body; used by [`crate::error::ApiError`].
    pub fn failure(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            status,
            success: false,
            message: message.into(),
            data: None,
            code: Some(code),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}
