//! Historical insight endpoint

use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::validation::path_id;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub supplier_id: i64,
    pub insights: String,
}

/// GET /suppliers/insights/:supplier_id
///
/// 404 when the supplier has no compliance history; the text model is
/// not called in that case.
pub async fn get_insights(
    State(state): State<AppState>,
    supplier_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<InsightsResponse>> {
    let supplier_id = path_id("supplier_id", supplier_id)?;
    let store = state.store()?;

    let history = store
        .list_compliance_records(supplier_id)
        .await
        .map_err(ApiError::persistence("Failed to generate insights"))?;

    if history.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No compliance records found for supplier ID {}.",
            supplier_id
        )));
    }

    let insights = state
        .insights
        .summarize_history(supplier_id, &history)
        .await
        .map_err(ApiError::ExternalService)?;

    Ok(Json(InsightsResponse {
        supplier_id,
        insights,
    }))
}

pub fn insight_routes() -> Router<AppState> {
    Router::new().route("/suppliers/insights/:supplier_id", get(get_insights))
}
