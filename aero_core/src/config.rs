//! # Configuration
//!
//! Process configuration is read from the environment once at startup.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `AERO_UNIT_SYSTEM` | `SI` | Display unit system (`SI` or `Imperial`) |
//! | `GEMINI_API_KEY` / `API_KEY` | unset | Insight provider credential |
//! | `AERO_INSIGHT_MODEL` | `gemini-2.5-flash` | Text-generation model |
//! | `AERO_INSIGHT_ENDPOINT` | Generative Language v1beta | API base URL |
//! | `AERO_INSIGHT_TIMEOUT_SECS` | `20` | Per-request timeout |

use serde::{Deserialize, Serialize};

use crate::errors::{AeroError, AeroResult};
use crate::units::UnitSystem;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Settings consumed by the insight provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Never serialized
    #[serde(skip)]
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Top-level application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub unit_system: UnitSystem,
    pub insight: InsightConfig,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> AeroResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> AeroResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = AppConfig::default();

        if let Some(system) = get("AERO_UNIT_SYSTEM") {
            config.unit_system = system.parse()?;
            if config.unit_system.is_placeholder() {
                log::warn!("{} units are not implemented; values stay in SI", config.unit_system);
            }
        }

        config.insight.api_key = get("GEMINI_API_KEY").or_else(|| get("API_KEY"));

        if let Some(model) = get("AERO_INSIGHT_MODEL") {
            config.insight.model = model;
        }
        if let Some(endpoint) = get("AERO_INSIGHT_ENDPOINT") {
            config.insight.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = get("AERO_INSIGHT_TIMEOUT_SECS") {
            config.insight.timeout_secs = match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(AeroError::config(format!(
                        "AERO_INSIGHT_TIMEOUT_SECS must be a positive integer, got '{}'",
                        timeout
                    )))
                }
            };
        }

        Ok(config)
    }
}
