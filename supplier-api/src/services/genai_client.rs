//! Gemini `generateContent` client
//!
//! Sends one prompt per request with the thinking budget set to zero and
//! returns the concatenated text parts of the first candidate.

use super::insight_generator::{InsightError, TextGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use supplier_common::config::GenAiConfig;

const USER_AGENT: &str = concat!("supplier-api/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Gemini API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &GenAiConfig) -> Result<Self, InsightError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InsightError::Network(e.to_string()))?;

        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            http_client,
            endpoint,
            api_key: config.api_key.clone().unwrap_or_default(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        };

        tracing::debug!(endpoint = %self.endpoint, "Calling Gemini API");

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(InsightError::Api(status.as_u16(), error_text));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| InsightError::Parse(e.to_string()))?;

        body.into_text().ok_or(InsightError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    /// Serve `app` on an ephemeral local port and return its base URL
    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1beta", addr)
    }

    fn config(base_url: String) -> GenAiConfig {
        GenAiConfig {
            api_key: Some("test-key".to_string()),
            model: "gemini-2.5-flash".to_string(),
            base_url,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_endpoint_layout() {
        let client = GeminiClient::new(&config("https://example.test/v1beta/".to_string())).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["generationConfig"]["thinkingConfig"]["thinkingBudget"], 0);
    }

    #[tokio::test]
    async fn test_generate_returns_joined_text() {
        let app = Router::new().route(
            "/v1beta/models/:call",
            post(|Path(call): Path<String>, headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(call, "gemini-2.5-flash:generateContent");
                assert_eq!(headers.get("x-goog-api-key").unwrap(), "test-key");
                assert_eq!(body["generationConfig"]["thinkingConfig"]["thinkingBudget"], 0);
                let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap().to_string();
                Json(json!({
                    "candidates": [{
                        "content": {"parts": [{"text": "Echo: "}, {"text": prompt}]}
                    }]
                }))
            }),
        );
        let client = GeminiClient::new(&config(serve(app).await)).unwrap();

        let text = client.generate("late deliveries").await.unwrap();
        assert_eq!(text, "Echo: late deliveries");
    }

    #[tokio::test]
    async fn test_auth_failure_is_api_error() {
        let app = Router::new().route(
            "/v1beta/models/:call",
            post(|| async { (StatusCode::UNAUTHORIZED, "API key not valid") }),
        );
        let client = GeminiClient::new(&config(serve(app).await)).unwrap();

        let err = client.generate("x").await.unwrap_err();
        assert!(matches!(err, InsightError::Api(401, _)));
    }

    #[tokio::test]
    async fn test_missing_candidates_is_empty_response() {
        let app = Router::new().route(
            "/v1beta/models/:call",
            post(|| async { Json(json!({"candidates": []})) }),
        );
        let client = GeminiClient::new(&config(serve(app).await)).unwrap();

        let err = client.generate("x").await.unwrap_err();
        assert!(matches!(err, InsightError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_non_json_body_is_parse_error() {
        let app = Router::new().route("/v1beta/models/:call", post(|| async { "not json" }));
        let client = GeminiClient::new(&config(serve(app).await)).unwrap();

        let err = client.generate("x").await.unwrap_err();
        assert!(matches!(err, InsightError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Bind then drop to get a port with nothing listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = GeminiClient::new(&config(format!("http://{}/v1beta", addr))).unwrap();
        let err = client.generate("x").await.unwrap_err();
        assert!(matches!(err, InsightError::Network(_)));
    }
}
