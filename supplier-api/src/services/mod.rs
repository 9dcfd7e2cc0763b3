//! Outbound services

pub mod genai_client;
pub mod insight_generator;

pub use genai_client::GeminiClient;
pub use insight_generator::{InsightError, InsightGenerator, TextGenerator};
