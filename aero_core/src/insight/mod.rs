//! # Insight Providers
//!
//! An insight is a short natural-language interpretation of a computed
//! result, produced by an external text-generation service.
//!
//! The provider boundary is infallible: implementations catch every fault
//! and return [`INSIGHT_UNAVAILABLE`] instead of an error, so sessions never
//! have to handle provider failures.
//!
//! ## Providers
//!
//! - [`gemini::GeminiInsightProvider`] - Google Generative Language API over HTTPS
//! - [`FallbackInsightProvider`] - used when no API key is configured

pub mod gemini;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::InsightConfig;
use crate::errors::AeroResult;

pub use gemini::GeminiInsightProvider;

/// Returned when the provider fails for any reason
pub const INSIGHT_UNAVAILABLE: &str = "AI insight temporarily unavailable.";

/// Returned when the provider answered with no text
pub const NO_INSIGHT: &str = "No insight available.";

/// Everything a provider is told about one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRequest {
    /// Formula title, e.g. "Lift Force"
    pub formula_title: String,
    /// Input values in display order
    pub inputs: Vec<(String, f64)>,
    /// Evaluated result
    pub result: f64,
    /// Unit of `result`
    pub result_unit: String,
}

impl InsightRequest {
    /// Prompt text sent to a text-generation model.
    pub fn prompt(&self) -> String {
        let inputs = self
            .inputs
            .iter()
            .map(|(id, value)| format!("{}: {}", id, value))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "You are an expert aerodynamics engineer and flight instructor.\n\
             \n\
             Context:\n\
             The user just calculated \"{title}\".\n\
             Inputs provided: {inputs}.\n\
             Result: {result:.2} {unit}.\n\
             \n\
             Task:\n\
             Provide a brief, high-level insight (max 2-3 sentences) about what this result \
             means for the aircraft's performance.\n\
             Is it efficient? Dangerous? Standard?\n\
             Keep it professional but accessible. Do not repeat the formula. Focus on the implication.",
            title = self.formula_title,
            inputs = inputs,
            result = self.result,
            unit = self.result_unit,
        )
    }
}

/// External collaborator that interprets a result.
///
/// Implementations must not fail: map every error to
/// [`INSIGHT_UNAVAILABLE`] (and log it).
#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn explain(&self, request: &InsightRequest) -> String;
}

/// Provider for when no text-generation service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackInsightProvider;

#[async_trait]
impl InsightProvider for FallbackInsightProvider {
    async fn explain(&self, request: &InsightRequest) -> String {
        log::debug!("No insight provider configured for '{}'", request.formula_title);
        INSIGHT_UNAVAILABLE.to_string()
    }
}

/// Pick a provider for the given configuration.
///
/// Without an API key the [`FallbackInsightProvider`] is returned.
pub fn provider_from_config(config: &InsightConfig) -> AeroResult<Box<dyn InsightProvider>> {
    if config.api_key.is_none() {
        log::warn!("No API key configured; insights are disabled");
        return Ok(Box::new(FallbackInsightProvider));
    }
    Ok(Box::new(GeminiInsightProvider::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lift_request() -> InsightRequest {
        InsightRequest {
            formula_title: "Lift Force".to_string(),
            inputs: vec![
                ("rho".to_string(), 1.225),
                ("v".to_string(), 50.0),
                ("S".to_string(), 20.0),
                ("Cl".to_string(), 1.2),
            ],
            result: 36750.0,
            result_unit: "N".to_string(),
        }
    }

    #[test]
    fn test_prompt_contents() {
        let prompt = lift_request().prompt();
        assert!(prompt.contains("The user just calculated \"Lift Force\"."));
        assert!(prompt.contains("Inputs provided: rho: 1.225, v: 50, S: 20, Cl: 1.2."));
        assert!(prompt.contains("Result: 36750.00 N."));
        assert!(prompt.contains("max 2-3 sentences"));
    }

    #[tokio::test]
    async fn test_fallback_provider() {
        let text = FallbackInsightProvider.explain(&lift_request()).await;
        assert_eq!(text, INSIGHT_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_provider_from_config_without_key() {
        let config = InsightConfig::default();
        let provider = provider_from_config(&config).unwrap();
        assert_eq!(provider.explain(&lift_request()).await, INSIGHT_UNAVAILABLE);
    }
}
