//! # Item Routes
//!
//! CRUD over the inventory ledger.
//!
//! ```text
//! GET    /api/items?name=teh   list (optional name filter)
//! POST   /api/items            create          → 201
//! GET    /api/items/{id}       fetch           → 404 if missing
//! PUT    /api/items/{id}       replace         → 404 if missing
//! DELETE /api/items/{id}       delete          → 409 if ever sold
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use kasir_core::validation::validate_new_item;
use kasir_core::{Item, NewItem};

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ItemFilter {
    pub name: Option<String>,
}

pub async fn list_items(
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
) -> ApiResult<Vec<Item>> {
    let items = state.db.items().list(filter.name.as_deref()).await?;
    Ok(ApiResponse::ok("Items retrieved successfully", items))
}

pub async fn get_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Item> {
    let Path(id) = id?;

    let item = state
        .db
        .items()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item", id))?;

    Ok(ApiResponse::ok("Item found", item))
}

pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> ApiResult<Item> {
    let Json(payload) = payload?;
    validate_new_item(&payload)?;

    let item = state.db.items().insert(&payload).await?;
    info!(item_id = item.id, name = %item.name, "Item created");

    Ok(ApiResponse::created("Item created successfully", item))
}

pub async fn update_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> ApiResult<Item> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    validate_new_item(&payload)?;

    let item = state.db.items().update(id, &payload).await?;
    info!(item_id = item.id, "Item updated");

    Ok(ApiResponse::ok("Item updated successfully", item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;

    state.db.items().delete(id).await?;
    info!(item_id = id, "Item deleted");

    Ok(ApiResponse::message(StatusCode::OK, "Item deleted successfully"))
}
