//! supplier-api - Supplier compliance record service
//!
//! Stores supplier profiles and compliance observations and asks an
//! external text model for audit summaries and recommendations.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use supplier_api::db::{ComplianceStore, SqliteStore};
use supplier_api::services::{GeminiClient, InsightGenerator};
use supplier_api::{build_router, AppState};
use supplier_common::config::ServiceConfig;
use supplier_common::db::init::init_database;
use tracing::{error, info, warn};

/// Command-line overrides (highest priority)
#[derive(Debug, Parser)]
#[command(name = "supplier-api", version, about = "Supplier compliance record service")]
struct Args {
    /// TOML config file (default: <config dir>/supplier-compliance/config.toml)
    #[arg(long, env = "SUPPLIER_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:8000
    #[arg(long)]
    bind: Option<String>,

    /// Folder holding the database file
    #[arg(long)]
    root_folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Build identification first, before any slow startup work
    info!(
        "Starting supplier-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let mut config = ServiceConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(root_folder) = args.root_folder {
        config.database.root_folder = root_folder;
    }

    let unused = config.database.unused_network_settings();
    if !unused.is_empty() {
        warn!(
            "Database settings {} are ignored by the embedded SQLite store",
            unused.join(", ")
        );
    }

    // A failed open leaves the service up in store-unavailable mode
    let store: Option<Arc<dyn ComplianceStore>> = match init_database(&config.database).await {
        Ok(pool) => {
            info!("✓ Database connection successful");
            Some(Arc::new(SqliteStore::new(pool)))
        }
        Err(e) => {
            error!("Database connection or table creation failed: {}", e);
            None
        }
    };

    if config.genai.api_key.is_none() {
        warn!("GOOGLE_API_KEY not configured; insight requests will fail");
    }
    let gemini = GeminiClient::new(&config.genai)?;
    info!("GenAI endpoint: {}", gemini.endpoint());
    let insights = InsightGenerator::new(
        Arc::new(gemini),
        Duration::from_secs(config.genai.timeout_secs),
    );

    let state = AppState::new(store, insights);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("supplier-api listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
