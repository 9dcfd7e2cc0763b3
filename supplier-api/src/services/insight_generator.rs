//! Insight generation
//!
//! Builds natural-language prompts from compliance metrics and hands them
//! to an external text model. The model's reply is returned verbatim.
//! There is no retry, no fallback text and no caching: identical inputs
//! trigger a fresh call every time.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use supplier_common::dates::format_date;
use supplier_common::db::{ComplianceMetric, ComplianceRecord};
use thiserror::Error;
use tracing::{debug, info};

/// External text generation errors
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("No response within {0:?}")]
    Timeout(Duration),
}

/// A text model that answers a single prompt
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, InsightError>;
}

/// Prompt builder + bounded call to a [`TextGenerator`]
#[derive(Clone)]
pub struct InsightGenerator {
    backend: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl InsightGenerator {
    pub fn new(backend: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Audit summary of one freshly submitted compliance check
    pub async fn summarize_metrics(
        &self,
        supplier_id: i64,
        date: NaiveDate,
        metrics: &[ComplianceMetric],
    ) -> Result<String, InsightError> {
        let prompt = metrics_prompt(supplier_id, date, metrics);
        self.generate(&prompt).await
    }

    /// Strategic recommendations from a supplier's full history
    pub async fn summarize_history(
        &self,
        supplier_id: i64,
        history: &[ComplianceRecord],
    ) -> Result<String, InsightError> {
        let prompt = history_prompt(supplier_id, history);
        self.generate(&prompt).await
    }

    async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        debug!(prompt_chars = prompt.len(), "Requesting text generation");

        let text = tokio::time::timeout(self.timeout, self.backend.generate(prompt))
            .await
            .map_err(|_| InsightError::Timeout(self.timeout))??;

        info!(response_chars = text.len(), "Text generation complete");
        Ok(text)
    }
}

/// One line per submitted metric: `- <metric>: <result> (<status>)`
pub fn metrics_prompt(supplier_id: i64, date: NaiveDate, metrics: &[ComplianceMetric]) -> String {
    let metrics_text = metrics
        .iter()
        .map(|m| format!("- {}: {} ({})", m.metric, m.result, m.status))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\nYou are a supplier compliance auditor. Analyze the following compliance metrics \
         for supplier ID {}, recorded on {}:\n\n{}\n\nIdentify any patterns, potential risks, \
         or issues such as frequent late deliveries or inconsistent quality. Give a summary \
         in bullet points.\n",
        supplier_id,
        format_date(date),
        metrics_text
    )
}

/// One line per stored record, in the order given
pub fn history_prompt(supplier_id: i64, history: &[ComplianceRecord]) -> String {
    let history_text = history
        .iter()
        .map(|r| {
            format!(
                "- Date: {}, Metric: {}, Result: {}, Status: {}",
                format_date(r.date_recorded),
                r.metric,
                r.result,
                r.status
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\nYou are a supply chain analyst providing strategic insights.\n\
         Analyze the following historical compliance data for supplier ID {}:\n\n\
         Compliance History:\n{}\n\n\
         Based on this data, provide actionable suggestions in bullet points to:\n\
         1.  Improve the supplier's overall compliance.\n\
         2.  Adjust future contract terms to mitigate identified risks or incentivize better performance.\n\
         Be concise and focus on concrete recommendations.\n",
        supplier_id, history_text
    )
}
