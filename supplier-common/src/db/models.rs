//! Database models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form contract terms, stored as an opaque JSON blob
pub type ContractTerms = BTreeMap<String, String>;

/// Supplier profile as stored
///
/// `last_audit` serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub contract_terms: ContractTerms,
    pub compliance_score: f64,
    pub last_audit: NaiveDate,
}

/// Validated supplier awaiting insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewSupplier {
    pub name: String,
    pub country: String,
    pub contract_terms: ContractTerms,
    pub compliance_score: f64,
    pub last_audit: NaiveDate,
}

/// One metric observation submitted in a compliance check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceMetric {
    pub metric: String,
    pub result: String,
    pub status: String,
}

/// Stored compliance observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub id: i64,
    pub supplier_id: i64,
    pub metric: String,
    pub date_recorded: NaiveDate,
    pub result: String,
    pub status: String,
}
