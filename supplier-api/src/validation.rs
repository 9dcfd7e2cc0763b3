//! Request validation
//!
//! Turns raw request payloads into validated domain values before any
//! store access. Shape and type problems (missing fields, non-numeric
//! score, non-object contract terms, out-of-range ids) are 422; dates
//! that do not parse as `YYYY-MM-DD` are 400.

use crate::{ApiError, ApiResult};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use supplier_common::dates::parse_date;
use supplier_common::db::{ComplianceMetric, ContractTerms, NewSupplier};

/// POST /suppliers body
#[derive(Debug, Deserialize)]
pub struct SupplierPayload {
    pub name: String,
    pub country: String,
    pub contract_terms: ContractTerms,
    pub compliance_score: f64,
    /// `YYYY-MM-DD`
    pub last_audit: String,
}

/// POST /suppliers/check-compliance body
#[derive(Debug, Deserialize)]
pub struct ComplianceRequest {
    pub supplier_id: i64,
    /// `YYYY-MM-DD`
    pub compliance_date: String,
    pub metrics: Vec<ComplianceMetric>,
}

/// Compliance check ready for persistence
#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceBatch {
    pub supplier_id: i64,
    pub date_recorded: NaiveDate,
    pub metrics: Vec<ComplianceMetric>,
}

/// Unwrap an extracted JSON body, mapping extractor rejections to 422
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::Unprocessable(rejection.body_text())),
    }
}

/// Unwrap an extracted path id, mapping non-integer segments to 422
pub fn path_id(field: &str, id: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    match id {
        Ok(Path(id)) => positive_id(field, id),
        Err(rejection) => Err(ApiError::Unprocessable(format!(
            "{} must be an integer: {}",
            field,
            rejection.body_text()
        ))),
    }
}

/// Path ids start at 1
pub fn positive_id(field: &str, id: i64) -> ApiResult<i64> {
    if id < 1 {
        return Err(ApiError::Unprocessable(format!(
            "{} must be greater than or equal to 1",
            field
        )));
    }
    Ok(id)
}

pub fn validate_supplier(payload: SupplierPayload) -> ApiResult<NewSupplier> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Unprocessable("name must not be empty".to_string()));
    }
    if !payload.compliance_score.is_finite() {
        return Err(ApiError::Unprocessable(
            "compliance_score must be a finite number".to_string(),
        ));
    }

    let last_audit = parse_date("last_audit", &payload.last_audit)?;

    Ok(NewSupplier {
        name: payload.name,
        country: payload.country,
        contract_terms: payload.contract_terms,
        compliance_score: payload.compliance_score,
        last_audit,
    })
}

pub fn validate_compliance_request(request: ComplianceRequest) -> ApiResult<ComplianceBatch> {
    let date_recorded = parse_date("compliance_date", &request.compliance_date)?;

    Ok(ComplianceBatch {
        supplier_id: request.supplier_id,
        date_recorded,
        metrics: request.metrics,
    })
}
