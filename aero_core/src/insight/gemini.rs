//! Insight provider backed by the Google Generative Language API.
//!
//! One `generateContent` call per request, no retries. Every failure is
//! logged and reported to the caller as [`INSIGHT_UNAVAILABLE`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{InsightProvider, InsightRequest, INSIGHT_UNAVAILABLE, NO_INSIGHT};
use crate::config::InsightConfig;
use crate::errors::{AeroError, AeroResult};

/// Application version sent in the user agent
const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
enum GeminiFailure {
    #[error("API key not found")]
    MissingApiKey,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API returned {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// HTTP client for `models/{model}:generateContent`.
#[derive(Debug, Clone)]
pub struct GeminiInsightProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl GeminiInsightProvider {
    pub fn new(config: &InsightConfig) -> AeroResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("AeroDynamics/{}", CURRENT_VERSION))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AeroError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    async fn generate(&self, prompt: &str) -> Result<String, GeminiFailure> {
        let api_key = self.api_key.as_deref().ok_or(GeminiFailure::MissingApiKey)?;

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeminiFailure::Status(response.status()));
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.text())
    }
}

#[async_trait]
impl InsightProvider for GeminiInsightProvider {
    async fn explain(&self, request: &InsightRequest) -> String {
        log::debug!("Requesting insight for '{}' from {}", request.formula_title, self.model);
        match self.generate(&request.prompt()).await {
            Ok(text) if text.trim().is_empty() => NO_INSIGHT.to_string(),
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                log::error!("Insight request failed: {}", e);
                INSIGHT_UNAVAILABLE.to_string()
            }
        }
    }
}
