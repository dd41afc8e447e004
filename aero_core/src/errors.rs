//! # Error Types
//!
//! Structured error types for aero_core. Every variant carries the ids
//! involved so a front-end (or an LLM driving one) can report the problem
//! without parsing the message.
//!
//! Two conditions are deliberately *not* errors:
//! - an unparsable input value, which reads as `0.0`
//!   (see [`crate::session::parse_input_value`])
//! - an insight provider failure, which the provider turns into a fallback
//!   string (see [`crate::insight`])
//!
//! ## Example
//!
//! ```rust
//! use aero_core::errors::{AeroError, AeroResult};
//!
//! fn find(id: &str) -> AeroResult<()> {
//!     Err(AeroError::unknown_formula(id))
//! }
//!
//! let err = find("does-not-exist").unwrap_err();
//! assert_eq!(err.error_code(), "UNKNOWN_FORMULA");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for aero_core operations
pub type AeroResult<T> = Result<T, AeroError>;

/// Structured error type for registry, session and configuration operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum AeroError {
    /// Registry lookup miss
    #[error("Unknown formula: '{id}'")]
    UnknownFormula { id: String },

    /// An input id that the formula does not declare
    #[error("Invalid input key '{input_id}' for formula '{formula_id}'")]
    InvalidInputKey { formula_id: String, input_id: String },

    /// Two formulas in one registry share an id
    #[error("Duplicate formula id: '{id}'")]
    DuplicateFormulaId { id: String },

    /// Two inputs of one formula share an id
    #[error("Duplicate input id '{input_id}' in formula '{formula_id}'")]
    DuplicateInputId { formula_id: String, input_id: String },

    /// Invalid environment configuration
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

impl AeroError {
    /// Create an UnknownFormula error
    pub fn unknown_formula(id: impl Into<String>) -> Self {
        AeroError::UnknownFormula { id: id.into() }
    }

    /// Create an InvalidInputKey error
    pub fn invalid_input_key(formula_id: impl Into<String>, input_id: impl Into<String>) -> Self {
        AeroError::InvalidInputKey {
            formula_id: formula_id.into(),
            input_id: input_id.into(),
        }
    }

    /// Create a DuplicateFormulaId error
    pub fn duplicate_formula(id: impl Into<String>) -> Self {
        AeroError::DuplicateFormulaId { id: id.into() }
    }

    /// Create a DuplicateInputId error
    pub fn duplicate_input(formula_id: impl Into<String>, input_id: impl Into<String>) -> Self {
        AeroError::DuplicateInputId {
            formula_id: formula_id.into(),
            input_id: input_id.into(),
        }
    }

    /// Create a Config error
    pub fn config(reason: impl Into<String>) -> Self {
        AeroError::Config { reason: reason.into() }
    }

    /// Construction conflicts mean the catalog itself is broken; callers
    /// should refuse to start rather than continue with a partial registry.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AeroError::DuplicateFormulaId { .. } | AeroError::DuplicateInputId { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            AeroError::UnknownFormula { .. } => "UNKNOWN_FORMULA",
            AeroError::InvalidInputKey { .. } => "INVALID_INPUT_KEY",
            AeroError::DuplicateFormulaId { .. } => "DUPLICATE_FORMULA_ID",
            AeroError::DuplicateInputId { .. } => "DUPLICATE_INPUT_ID",
            AeroError::Config { .. } => "CONFIG_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = AeroError::invalid_input_key("lift-force", "Cd");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInputKey\""));
        let roundtrip: AeroError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AeroError::unknown_formula("x").error_code(), "UNKNOWN_FORMULA");
        assert_eq!(AeroError::duplicate_input("f", "p").error_code(), "DUPLICATE_INPUT_ID");
        assert_eq!(AeroError::config("bad").error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_fatal_errors() {
        assert!(AeroError::duplicate_formula("lift-force").is_fatal());
        assert!(AeroError::duplicate_input("lift-force", "v").is_fatal());
        assert!(!AeroError::unknown_formula("x").is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = AeroError::duplicate_input("drag-force", "S");
        assert_eq!(err.to_string(), "Duplicate input id 'S' in formula 'drag-force'");
    }
}
