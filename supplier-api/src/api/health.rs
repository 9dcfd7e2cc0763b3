//! Root status endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

/// GET /
///
/// Reports whether the store was reachable at startup. Always 200.
pub async fn root_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let response = if state.store_available() {
        StatusResponse {
            status: "success".to_string(),
            message: "Welcome to the Supplier API".to_string(),
        }
    } else {
        StatusResponse {
            status: "error".to_string(),
            message: "Database connection not established.".to_string(),
        }
    };
    Json(response)
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(root_status))
}
