//! Compliance record database operations

use chrono::NaiveDate;
use sqlx::{FromRow, Pool, Sqlite};
use supplier_common::db::{ComplianceMetric, ComplianceRecord};
use supplier_common::Result;
use tracing::debug;

#[derive(Debug, FromRow)]
struct ComplianceRecordRow {
    id: i64,
    supplier_id: i64,
    metric: String,
    date_recorded: NaiveDate,
    result: String,
    status: String,
}

impl From<ComplianceRecordRow> for ComplianceRecord {
    fn from(row: ComplianceRecordRow) -> Self {
        ComplianceRecord {
            id: row.id,
            supplier_id: row.supplier_id,
            metric: row.metric,
            date_recorded: row.date_recorded,
            result: row.result,
            status: row.status,
        }
    }
}

/// Insert one batch of metrics for a supplier, all dated `date_recorded`
///
/// The batch runs in a single transaction: either every row commits or
/// none does. A missing supplier fails on the foreign key.
pub async fn insert_batch(
    db: &Pool<Sqlite>,
    supplier_id: i64,
    date_recorded: NaiveDate,
    metrics: &[ComplianceMetric],
) -> Result<()> {
    let mut tx = db.begin().await?;

    for metric in metrics {
        sqlx::query(
            r#"
            INSERT INTO compliance_records (supplier_id, metric, date_recorded, result, status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(supplier_id)
        .bind(&metric.metric)
        .bind(date_recorded)
        .bind(&metric.result)
        .bind(&metric.status)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    debug!(
        supplier_id,
        %date_recorded,
        rows = metrics.len(),
        "Committed compliance batch"
    );
    Ok(())
}

/// Load a supplier's records, newest date first
pub async fn load_for_supplier(db: &Pool<Sqlite>, supplier_id: i64) -> Result<Vec<ComplianceRecord>> {
    let rows = sqlx::query_as::<_, ComplianceRecordRow>(
        r#"
        SELECT id, supplier_id, metric, date_recorded, result, status
        FROM compliance_records
        WHERE supplier_id = ?
        ORDER BY date_recorded DESC, id DESC
        "#,
    )
    .bind(supplier_id)
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(ComplianceRecord::from).collect())
}
