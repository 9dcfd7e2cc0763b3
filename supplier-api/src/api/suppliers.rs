//! Supplier endpoints
//!
//! - POST /suppliers: validate, insert, report the new id
//! - GET /suppliers: every supplier
//! - GET /suppliers/:id: one supplier or 404

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::get,
    Json, Router,
};
use serde::Serialize;
use supplier_common::db::Supplier;
use tracing::info;

use crate::validation::{json_body, path_id, validate_supplier, SupplierPayload};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct CreateSupplierResponse {
    pub status: String,
    pub message: String,
    pub id: i64,
}

/// POST /suppliers
pub async fn create_supplier(
    State(state): State<AppState>,
    payload: Result<Json<SupplierPayload>, JsonRejection>,
) -> ApiResult<Json<CreateSupplierResponse>> {
    let supplier = validate_supplier(json_body(payload)?)?;
    let store = state.store()?;

    let id = store
        .create_supplier(&supplier)
        .await
        .map_err(ApiError::persistence("Failed to add supplier"))?;

    info!(supplier_id = id, name = %supplier.name, "Supplier added");

    Ok(Json(CreateSupplierResponse {
        status: "success".to_string(),
        message: "Supplier added successfully".to_string(),
        id,
    }))
}

/// GET /suppliers
pub async fn list_suppliers(State(state): State<AppState>) -> ApiResult<Json<Vec<Supplier>>> {
    let suppliers = state
        .store()?
        .list_suppliers()
        .await
        .map_err(ApiError::persistence("Failed to retrieve suppliers"))?;

    Ok(Json(suppliers))
}

/// GET /suppliers/:id
pub async fn get_supplier(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Supplier>> {
    let id = path_id("supplier_id", id)?;
    let store = state.store()?;

    store
        .get_supplier(id)
        .await
        .map_err(ApiError::persistence("Failed to retrieve supplier"))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Supplier not found".to_string()))
}

pub fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list_suppliers).post(create_supplier))
        .route("/suppliers/:id", get(get_supplier))
}
