//! # Flight Performance Formulas
//!
//! Descriptor types for the formula catalog plus the formulas themselves.
//! A [`FormulaDescriptor`] bundles:
//! - identity and presentation metadata (title, formula text, result unit)
//! - an ordered list of [`InputField`]s with SI defaults
//! - a pure evaluation function with the uniform signature [`EvalFn`]
//!
//! ## Modules
//!
//! - [`atmosphere`] - Air density and ISA pressure altitude
//! - [`forces`] - Lift and drag forces
//! - [`drag`] - Drag breakdown and aerodynamic efficiency
//!
//! ## Example
//!
//! ```rust
//! use aero_core::formulas::{forces, InputValues};
//!
//! let lift = forces::lift_force_formula().unwrap();
//! let result = lift.evaluate(&lift.default_values());
//! assert!((result - 36750.0).abs() < 1e-9);
//!
//! // Missing inputs fall back to their defaults
//! let partial: InputValues = [("v", 25.0)].into_iter().collect();
//! assert!((lift.evaluate(&partial) - 9187.5).abs() < 1e-9);
//! ```

pub mod atmosphere;
pub mod drag;
pub mod forces;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::errors::{AeroError, AeroResult};

// ============================================================================
// Input Values
// ============================================================================

/// Mapping from input id to its current value.
///
/// Evaluation is keyed by id, so ordering here carries no meaning; display
/// order comes from the descriptor's input list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputValues(BTreeMap<String, f64>);

impl InputValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `id` as read by an evaluation function.
    ///
    /// Reading an id the formula does not declare is a bug in the formula
    /// definition. Debug builds assert; release builds read `0.0`.
    pub fn get(&self, id: &str) -> f64 {
        debug_assert!(self.0.contains_key(id), "formula reads undeclared input '{}'", id);
        self.0.get(id).copied().unwrap_or(0.0)
    }

    /// Non-asserting lookup
    pub fn try_get(&self, id: &str) -> Option<f64> {
        self.0.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Insert or replace a value, returning the previous one
    pub fn insert(&mut self, id: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(id.into(), value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for InputValues {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        InputValues(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Uniform signature of every formula's transfer function.
pub type EvalFn = fn(&InputValues) -> f64;

// ============================================================================
// Input Field
// ============================================================================

/// One scalar parameter of a formula.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputField {
    /// Key used by the evaluation function (e.g., "rho")
    pub id: &'static str,
    /// Human label (e.g., "Air Density")
    pub label: &'static str,
    /// Symbol as printed in the formula (e.g., "ρ")
    pub symbol: &'static str,
    /// Unit string (e.g., "kg/m³")
    pub unit: &'static str,
    /// Initial value for new sessions and for absent inputs
    pub default_value: f64,
    /// Optional longer explanation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

impl InputField {
    pub const fn new(
        id: &'static str,
        label: &'static str,
        symbol: &'static str,
        unit: &'static str,
        default_value: f64,
    ) -> Self {
        Self {
            id,
            label,
            symbol,
            unit,
            default_value,
            description: None,
        }
    }

    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

// ============================================================================
// Formula Groups
// ============================================================================

/// Presentation grouping. Carries no computational meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormulaGroup {
    /// Air density, altitude
    AtmosphericState,
    /// Lift and drag forces
    FlightForces,
    /// Drag breakdown and L/D
    DragAnalysis,
}

impl FormulaGroup {
    /// Section heading for the group
    pub fn display_name(&self) -> &'static str {
        match self {
            FormulaGroup::AtmosphericState => "Atmospheric State",
            FormulaGroup::FlightForces => "Flight Forces",
            FormulaGroup::DragAnalysis => "Drag Analysis & Efficiency",
        }
    }

    /// Sort order for presentation (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            FormulaGroup::AtmosphericState => 1,
            FormulaGroup::FlightForces => 2,
            FormulaGroup::DragAnalysis => 3,
        }
    }
}

// ============================================================================
// Formula Descriptor
// ============================================================================

/// Immutable definition of one computable relationship.
///
/// Construct with [`FormulaDescriptor::builder`]; `build()` rejects duplicate
/// input ids, so a descriptor that exists is always consistent.
#[derive(Debug, Clone, Serialize)]
pub struct FormulaDescriptor {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    formula_text: &'static str,
    result_unit: &'static str,
    presentation_tag: &'static str,
    group: FormulaGroup,
    inputs: Vec<InputField>,
    #[serde(skip)]
    evaluate: EvalFn,
}

impl FormulaDescriptor {
    /// Start a descriptor for `id` with its transfer function.
    pub fn builder(id: &'static str, group: FormulaGroup, evaluate: EvalFn) -> FormulaBuilder {
        FormulaBuilder {
            id,
            title: id,
            description: "",
            formula_text: "",
            result_unit: "",
            presentation_tag: "",
            group,
            inputs: Vec::new(),
            evaluate,
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Human-readable formula, e.g. "L = ½ ρ v² S C_L"
    pub fn formula_text(&self) -> &'static str {
        self.formula_text
    }

    pub fn result_unit(&self) -> &'static str {
        self.result_unit
    }

    /// Accent tag for front-ends (e.g. "sky", "emerald")
    pub fn presentation_tag(&self) -> &'static str {
        self.presentation_tag
    }

    pub fn group(&self) -> FormulaGroup {
        self.group
    }

    /// Inputs in display order
    pub fn inputs(&self) -> &[InputField] {
        &self.inputs
    }

    pub fn input(&self, id: &str) -> Option<&InputField> {
        self.inputs.iter().find(|field| field.id == id)
    }

    pub fn has_input(&self, id: &str) -> bool {
        self.input(id).is_some()
    }

    /// Mapping of every input id to its default value
    pub fn default_values(&self) -> InputValues {
        self.inputs
            .iter()
            .map(|field| (field.id, field.default_value))
            .collect()
    }

    /// Evaluate the formula.
    ///
    /// Inputs absent from `values` take their default; extra keys are
    /// ignored. A non-finite outcome (division by zero, root of a negative,
    /// overflow) is reported as `0.0` so the result is always a finite real.
    pub fn evaluate(&self, values: &InputValues) -> f64 {
        let complete = self.inputs.iter().all(|field| values.contains(field.id));
        let result = if complete {
            (self.evaluate)(values)
        } else {
            let mut filled = values.clone();
            for field in &self.inputs {
                if !filled.contains(field.id) {
                    filled.insert(field.id, field.default_value);
                }
            }
            (self.evaluate)(&filled)
        };

        if result.is_finite() {
            result
        } else {
            log::debug!("{} evaluated to {}, reporting 0", self.id, result);
            0.0
        }
    }
}

/// Builder for [`FormulaDescriptor`].
#[derive(Debug, Clone)]
pub struct FormulaBuilder {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    formula_text: &'static str,
    result_unit: &'static str,
    presentation_tag: &'static str,
    group: FormulaGroup,
    inputs: Vec<InputField>,
    evaluate: EvalFn,
}

impl FormulaBuilder {
    pub fn title(mut self, title: &'static str) -> Self {
        self.title = title;
        self
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn formula_text(mut self, formula_text: &'static str) -> Self {
        self.formula_text = formula_text;
        self
    }

    pub fn result_unit(mut self, result_unit: &'static str) -> Self {
        self.result_unit = result_unit;
        self
    }

    pub fn presentation_tag(mut self, tag: &'static str) -> Self {
        self.presentation_tag = tag;
        self
    }

    /// Append an input; order of calls is display order.
    pub fn input(mut self, field: InputField) -> Self {
        self.inputs.push(field);
        self
    }

    /// Finish the descriptor, rejecting duplicate input ids.
    pub fn build(self) -> AeroResult<FormulaDescriptor> {
        let mut seen = HashSet::new();
        for field in &self.inputs {
            if !seen.insert(field.id) {
                return Err(AeroError::duplicate_input(self.id, field.id));
            }
        }

        Ok(FormulaDescriptor {
            id: self.id,
            title: self.title,
            description: self.description,
            formula_text: self.formula_text,
            result_unit: self.result_unit,
            presentation_tag: self.presentation_tag,
            group: self.group,
            inputs: self.inputs,
            evaluate: self.evaluate,
        })
    }
}

// ============================================================================
// Standard Catalog
// ============================================================================

/// Every supported formula in presentation order.
///
/// Index ranges match the groups: `[0, 2)` atmospheric state, `[2, 4)` flight
/// forces, `[4, 8)` drag analysis and efficiency.
pub fn standard_catalog() -> AeroResult<Vec<FormulaDescriptor>> {
    Ok(vec![
        atmosphere::air_density_formula()?,
        atmosphere::pressure_altitude_formula()?,
        forces::lift_force_formula()?,
        forces::drag_force_formula()?,
        drag::induced_drag_formula()?,
        drag::parasite_drag_formula()?,
        drag::lift_to_drag_formula()?,
        drag::max_lift_to_drag_formula()?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(values: &InputValues) -> f64 {
        values.get("a") + values.get("b")
    }

    fn ratio(values: &InputValues) -> f64 {
        values.get("a") / values.get("b")
    }

    fn test_formula(evaluate: EvalFn) -> FormulaDescriptor {
        FormulaDescriptor::builder("test", FormulaGroup::FlightForces, evaluate)
            .title("Test")
            .result_unit("N")
            .input(InputField::new("a", "A", "a", "N", 2.0))
            .input(InputField::new("b", "B", "b", "N", 3.0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_duplicate_input_rejected() {
        let err = FormulaDescriptor::builder("dup", FormulaGroup::FlightForces, sum)
            .input(InputField::new("a", "A", "a", "", 1.0))
            .input(InputField::new("a", "A again", "a", "", 2.0))
            .build()
            .unwrap_err();
        assert_eq!(err, AeroError::duplicate_input("dup", "a"));
    }

    #[test]
    fn test_default_values() {
        let formula = test_formula(sum);
        let defaults = formula.default_values();
        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults.try_get("a"), Some(2.0));
        assert_eq!(formula.evaluate(&defaults), 5.0);
    }

    #[test]
    fn test_missing_inputs_use_defaults() {
        let formula = test_formula(sum);
        let values: InputValues = [("a", 10.0), ("extra", 99.0)].into_iter().collect();
        assert_eq!(formula.evaluate(&values), 13.0);
    }

    #[test]
    fn test_non_finite_reported_as_zero() {
        let formula = test_formula(ratio);
        let values: InputValues = [("a", 1.0), ("b", 0.0)].into_iter().collect();
        assert_eq!(formula.evaluate(&values), 0.0);

        let values: InputValues = [("a", 0.0), ("b", 0.0)].into_iter().collect();
        assert_eq!(formula.evaluate(&values), 0.0);
    }

    #[test]
    fn test_input_lookup() {
        let formula = test_formula(sum);
        assert!(formula.has_input("b"));
        assert!(!formula.has_input("c"));
        assert_eq!(formula.input("a").map(|f| f.label), Some("A"));
    }

    #[test]
    fn test_descriptor_serialization_skips_function() {
        let formula = test_formula(sum);
        let json = serde_json::to_value(&formula).unwrap();
        assert_eq!(json["id"], "test");
        assert_eq!(json["inputs"][1]["default_value"], 3.0);
        assert!(json.get("evaluate").is_none());
        assert!(json["inputs"][0].get("description").is_none());
    }

    #[test]
    fn test_standard_catalog_groups_by_index() {
        let catalog = standard_catalog().unwrap();
        assert_eq!(catalog.len(), 8);
        assert!(catalog[0..2].iter().all(|f| f.group() == FormulaGroup::AtmosphericState));
        assert!(catalog[2..4].iter().all(|f| f.group() == FormulaGroup::FlightForces));
        assert!(catalog[4..8].iter().all(|f| f.group() == FormulaGroup::DragAnalysis));
    }

    #[test]
    fn test_catalog_formulas_read_only_declared_inputs() {
        // InputValues::get asserts in debug builds on undeclared reads, so
        // evaluating with exactly the declared inputs exercises every key.
        for formula in standard_catalog().unwrap() {
            let defaults = formula.default_values();
            let first = formula.evaluate(&defaults);
            let second = formula.evaluate(&defaults);
            assert_eq!(first.to_bits(), second.to_bits(), "{} not deterministic", formula.id());
            assert!(first.is_finite());
        }
    }

    #[test]
    fn test_catalog_total_on_zero_and_negative_inputs() {
        for formula in standard_catalog().unwrap() {
            for fill in [0.0, -1.0, 1e300] {
                let values: InputValues = formula.inputs().iter().map(|f| (f.id, fill)).collect();
                let result = formula.evaluate(&values);
                assert!(result.is_finite(), "{} produced {} for {}", formula.id(), result, fill);
            }
        }
    }
}
