//! Compliance check endpoints
//!
//! A check persists its metrics first and only then asks the text model
//! for a summary. A model failure does not undo the saved records.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use supplier_common::db::ComplianceRecord;
use tracing::info;

use crate::validation::{json_body, path_id, validate_compliance_request, ComplianceRequest};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct ComplianceCheckResponse {
    /// Model output, unparsed
    pub response: String,
    /// Always empty
    pub alerts: Vec<String>,
}

/// POST /suppliers/check-compliance
pub async fn check_compliance(
    State(state): State<AppState>,
    payload: Result<Json<ComplianceRequest>, JsonRejection>,
) -> ApiResult<Json<ComplianceCheckResponse>> {
    let batch = validate_compliance_request(json_body(payload)?)?;
    let store = state.store()?;

    store
        .insert_compliance_records(batch.supplier_id, batch.date_recorded, &batch.metrics)
        .await
        .map_err(ApiError::persistence("Failed to store compliance records"))?;

    info!(
        supplier_id = batch.supplier_id,
        date = %batch.date_recorded,
        records = batch.metrics.len(),
        "Compliance records stored"
    );

    let response = state
        .insights
        .summarize_metrics(batch.supplier_id, batch.date_recorded, &batch.metrics)
        .await
        .map_err(ApiError::ExternalService)?;

    Ok(Json(ComplianceCheckResponse {
        response,
        alerts: Vec::new(),
    }))
}

/// GET /compliance_records/:supplier_id
pub async fn list_compliance_records(
    State(state): State<AppState>,
    supplier_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<ComplianceRecord>>> {
    let supplier_id = path_id("supplier_id", supplier_id)?;
    let store = state.store()?;

    let records = store
        .list_compliance_records(supplier_id)
        .await
        .map_err(ApiError::persistence("Failed to retrieve compliance records"))?;

    Ok(Json(records))
}

pub fn compliance_routes() -> Router<AppState> {
    Router::new()
        .route("/suppliers/check-compliance", post(check_compliance))
        .route("/compliance_records/:supplier_id", get(list_compliance_records))
}
