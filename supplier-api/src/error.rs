//! Error types for supplier-api
//!
//! Every variant maps to one HTTP status. Failures are logged here, once,
//! before being turned into a response: client errors at `warn`, server
//! errors at `error`. The response body carries only `{"detail": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed value in an otherwise well-formed request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Missing fields, wrong types, out-of-range path ids (422)
    #[error("{0}")]
    Unprocessable(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Store could not be opened at startup; no call is attempted (500)
    #[error("Database not connected")]
    StoreUnavailable,

    /// A store operation failed (500); the cause is returned to the client
    #[error("{context}: {source}")]
    Persistence {
        context: String,
        #[source]
        source: supplier_common::Error,
    },

    /// External text generation failed (500); the cause is only logged
    #[error("GenAI analysis failed.")]
    ExternalService(#[source] crate::services::InsightError),
}

impl ApiError {
    /// Wrap a store error with a description of the failed operation
    pub fn persistence(context: impl Into<String>) -> impl FnOnce(supplier_common::Error) -> Self {
        let context = context.into();
        move |source| ApiError::Persistence { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::StoreUnavailable
            | ApiError::Persistence { .. }
            | ApiError::ExternalService(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<supplier_common::Error> for ApiError {
    fn from(err: supplier_common::Error) -> Self {
        match err {
            supplier_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            supplier_common::Error::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Persistence {
                context: "Database operation failed".to_string(),
                source: other,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::ExternalService(cause) => {
                error!(cause = %cause, "External text generation failed");
            }
            _ if status.is_server_error() => error!(status = status.as_u16(), "{}", self),
            _ => warn!(status = status.as_u16(), "{}", self),
        }

        let body = Json(json!({
            "detail": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
