//! supplier-api library - supplier compliance HTTP service
//!
//! Exposes the router and application state for the binary and for
//! integration tests.

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod services;
pub mod validation;

pub use crate::error::{ApiError, ApiResult};

use crate::db::ComplianceStore;
use crate::services::InsightGenerator;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway; `None` when the store could not be opened
    /// at startup. There is no reconnection.
    store: Option<Arc<dyn ComplianceStore>>,
    /// External text generation
    pub insights: InsightGenerator,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Option<Arc<dyn ComplianceStore>>, insights: InsightGenerator) -> Self {
        Self { store, insights }
    }

    pub fn store_available(&self) -> bool {
        self.store.is_some()
    }

    /// The store, or a fail-fast error when running without one
    pub fn store(&self) -> ApiResult<&dyn ComplianceStore> {
        self.store.as_deref().ok_or(ApiError::StoreUnavailable)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::supplier_routes())
        .merge(api::compliance_routes())
        .merge(api::insight_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
