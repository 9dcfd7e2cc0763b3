//! Supplier database operations

use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::{FromRow, Pool, Sqlite};
use supplier_common::db::{ContractTerms, NewSupplier, Supplier};
use supplier_common::Result;

#[derive(Debug, FromRow)]
struct SupplierRow {
    id: i64,
    name: String,
    country: String,
    contract_terms: Json<ContractTerms>,
    compliance_score: f64,
    last_audit: NaiveDate,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            id: row.id,
            name: row.name,
            country: row.country,
            contract_terms: row.contract_terms.0,
            compliance_score: row.compliance_score,
            last_audit: row.last_audit,
        }
    }
}

/// Insert a supplier and return its generated id
pub async fn insert_supplier(db: &Pool<Sqlite>, supplier: &NewSupplier) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO suppliers (name, country, contract_terms, compliance_score, last_audit)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&supplier.name)
    .bind(&supplier.country)
    .bind(Json(&supplier.contract_terms))
    .bind(supplier.compliance_score)
    .bind(supplier.last_audit)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Load every supplier, oldest first
pub async fn load_suppliers(db: &Pool<Sqlite>) -> Result<Vec<Supplier>> {
    let rows = sqlx::query_as::<_, SupplierRow>(
        r#"
        SELECT id, name, country, contract_terms, compliance_score, last_audit
        FROM suppliers
        ORDER BY id ASC
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(Supplier::from).collect())
}

/// Load one supplier by id
pub async fn load_supplier(db: &Pool<Sqlite>, id: i64) -> Result<Option<Supplier>> {
    let row = sqlx::query_as::<_, SupplierRow>(
        r#"
        SELECT id, name, country, contract_terms, compliance_score, last_audit
        FROM suppliers
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row.map(Supplier::from))
}
