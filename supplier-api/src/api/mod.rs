//! HTTP API handlers for supplier-api

pub mod compliance;
pub mod health;
pub mod insights;
pub mod suppliers;

pub use compliance::compliance_routes;
pub use health::health_routes;
pub use insights::insight_routes;
pub use suppliers::supplier_routes;
