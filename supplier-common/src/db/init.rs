//! Database initialization
//!
//! Opens the SQLite store (creating the file on first run) and provisions
//! the `suppliers` and `compliance_records` tables. Table creation is
//! idempotent and safe to run on every startup.

use crate::config::DatabaseConfig;
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const MAX_CONNECTIONS: u32 = 10;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the configured store and create tables if needed
pub async fn init_database(config: &DatabaseConfig) -> Result<SqlitePool> {
    if config.url.is_none() {
        std::fs::create_dir_all(&config.root_folder)?;
    }

    let url = config.connection_url();
    let pool = connect(&url).await?;
    info!("Opened database: {}", url);

    create_schema(&pool).await?;
    info!("'suppliers' and 'compliance_records' tables checked/created");

    Ok(pool)
}

/// Open a private in-memory store with the schema applied
///
/// The pool holds exactly one connection that never expires, since every
/// SQLite memory connection is its own database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = connect("sqlite::memory:").await?;
    create_schema(&pool).await?;
    Ok(pool)
}

async fn connect(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = if url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?
    };

    Ok(pool)
}

/// Create both tables (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_suppliers_table(pool).await?;
    create_compliance_records_table(pool).await?;
    Ok(())
}

/// Create the suppliers table
///
/// `contract_terms` holds a JSON object; `last_audit` holds `YYYY-MM-DD`.
pub async fn create_suppliers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS suppliers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            country TEXT NOT NULL,
            contract_terms TEXT NOT NULL DEFAULT '{}',
            compliance_score REAL NOT NULL,
            last_audit DATE NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the compliance_records table
///
/// Rows must reference an existing supplier.
pub async fn create_compliance_records_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS compliance_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            supplier_id INTEGER NOT NULL,
            metric TEXT NOT NULL,
            date_recorded DATE NOT NULL,
            result TEXT NOT NULL,
            status TEXT NOT NULL,
            FOREIGN KEY (supplier_id) REFERENCES suppliers(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_compliance_records_supplier_date
        ON compliance_records (supplier_id, date_recorded)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
