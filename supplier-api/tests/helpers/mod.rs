//! Shared helpers for supplier-api integration tests

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use supplier_api::db::{ComplianceStore, SqliteStore};
use supplier_api::services::{InsightError, InsightGenerator, TextGenerator};
use supplier_api::{build_router, AppState};
use supplier_common::db::init::init_memory_database;
use tower::util::ServiceExt; // for `oneshot` method

/// Stand-in text model that records every prompt it receives
pub struct RecordingModel {
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingModel {
    pub fn replying() -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for RecordingModel {
    async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            Err(InsightError::Api(503, "model overloaded".to_string()))
        } else {
            Ok(format!("- analysed {} lines", prompt.lines().filter(|l| l.starts_with("- ")).count()))
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: Option<SqlitePool>,
    pub model: Arc<RecordingModel>,
}

impl TestApp {
    /// App over a fresh in-memory store
    pub async fn new(model: Arc<RecordingModel>) -> Self {
        let pool = init_memory_database().await.expect("Should create in-memory store");
        let store: Arc<dyn ComplianceStore> = Arc::new(SqliteStore::new(pool.clone()));
        let insights = InsightGenerator::new(model.clone(), Duration::from_secs(5));
        let router = build_router(AppState::new(Some(store), insights));
        Self {
            router,
            pool: Some(pool),
            model,
        }
    }

    /// App whose store failed to open at startup
    pub fn without_store(model: Arc<RecordingModel>) -> Self {
        let insights = InsightGenerator::new(model.clone(), Duration::from_secs(5));
        let router = build_router(AppState::new(None, insights));
        Self {
            router,
            pool: None,
            model,
        }
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> Response<Body> {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: String) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn compliance_row_count(&self) -> i64 {
        let pool = self.pool.as_ref().expect("store-backed app");
        sqlx::query_scalar("SELECT COUNT(*) FROM compliance_records")
            .fetch_one(pool)
            .await
            .unwrap()
    }
}

/// Extract JSON body from response
pub async fn extract_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
