//! # aero_core - Aircraft Performance Formula Engine
//!
//! `aero_core` holds the catalog of flight-performance formulas and the
//! evaluation model behind the AeroDynamics calculator. Descriptors and
//! session snapshots serialize to JSON, so any front-end (terminal, web,
//! an LLM tool) can render them.
//!
//! ## Design Philosophy
//!
//! - **Pure formulas**: every transfer function is `fn(&InputValues) -> f64`
//! - **Validated once**: the registry refuses duplicate ids at construction
//! - **Always computable**: unparsable input reads as zero, results are finite
//! - **Fresh insights only**: an insight never outlives the inputs it describes
//!
//! ## Quick Start
//!
//! ```rust
//! use aero_core::{EvaluationSession, FormulaRegistry};
//!
//! let registry = FormulaRegistry::standard().unwrap();
//! let mut session = EvaluationSession::new(registry.get("lift-force").unwrap());
//! assert!((session.result() - 36_750.0).abs() < 1e-9);
//!
//! session.set_input("v", "60").unwrap();
//! assert!(session.result() > 36_750.0);
//! ```
//!
//! ## Modules
//!
//! - [`formulas`] - Descriptor types and the formulas themselves
//! - [`registry`] - Validated formula catalog
//! - [`session`] - Live inputs, derived result, insight cache
//! - [`insight`] - Natural-language interpretation providers
//! - [`config`] - Environment configuration
//! - [`units`] - Unit system selection
//! - [`errors`] - Structured error types

pub mod config;
pub mod errors;
pub mod formulas;
pub mod insight;
pub mod registry;
pub mod session;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use config::{AppConfig, InsightConfig};
pub use errors::{AeroError, AeroResult};
pub use formulas::{FormulaDescriptor, FormulaGroup, InputField, InputValues};
pub use insight::{InsightProvider, InsightRequest};
pub use registry::FormulaRegistry;
pub use session::{EvaluationSession, InsightOutcome, InsightState};
pub use units::UnitSystem;
