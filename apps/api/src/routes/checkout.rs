//! # Checkout Routes
//!
//! `POST /api/checkout` runs the atomic checkout and answers `201` with the
//! recorded transaction. `GET /api/transactions/{id}` reads one back.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;

use kasir_core::{CheckoutRequest, Transaction};

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn checkout(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> ApiResult<Transaction> {
    let Json(request) = payload?;

    let record = state.db.checkout_engine().checkout(&request.items).await?;

    Ok(ApiResponse::created("Checkout successful", record))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Transaction> {
    let Path(id) = id?;

    let record = state
        .db
        .transactions()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction", id))?;

    Ok(ApiResponse::ok("Transaction found", record))
}
