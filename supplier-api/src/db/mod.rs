//! Persistence gateway
//!
//! Handlers talk to the store only through [`ComplianceStore`], so the
//! connection pool is injected at startup and tests can swap in a pool
//! of their own. All statements are parameterized.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use supplier_common::db::{ComplianceMetric, ComplianceRecord, NewSupplier, Supplier};
use supplier_common::Result;

pub mod compliance_records;
pub mod suppliers;

/// Create/read access to suppliers and their compliance records
#[async_trait]
pub trait ComplianceStore: Send + Sync {
    /// Insert a supplier and return its generated id
    async fn create_supplier(&self, supplier: &NewSupplier) -> Result<i64>;

    async fn list_suppliers(&self) -> Result<Vec<Supplier>>;

    /// `None` when no supplier has this id
    async fn get_supplier(&self, id: i64) -> Result<Option<Supplier>>;

    /// Insert one dated batch atomically
    async fn insert_compliance_records(
        &self,
        supplier_id: i64,
        date_recorded: NaiveDate,
        metrics: &[ComplianceMetric],
    ) -> Result<()>;

    /// Newest `date_recorded` first
    async fn list_compliance_records(&self, supplier_id: i64) -> Result<Vec<ComplianceRecord>>;
}

/// [`ComplianceStore`] backed by a SQLite connection pool
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComplianceStore for SqliteStore {
    async fn create_supplier(&self, supplier: &NewSupplier) -> Result<i64> {
        suppliers::insert_supplier(&self.pool, supplier).await
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>> {
        suppliers::load_suppliers(&self.pool).await
    }

    async fn get_supplier(&self, id: i64) -> Result<Option<Supplier>> {
        suppliers::load_supplier(&self.pool, id).await
    }

    async fn insert_compliance_records(
        &self,
        supplier_id: i64,
        date_recorded: NaiveDate,
        metrics: &[ComplianceMetric],
    ) -> Result<()> {
        compliance_records::insert_batch(&self.pool, supplier_id, date_recorded, metrics).await
    }

    async fn list_compliance_records(&self, supplier_id: i64) -> Result<Vec<ComplianceRecord>> {
        compliance_records::load_for_supplier(&self.pool, supplier_id).await
    }
}
