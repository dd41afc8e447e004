//! # Formula Registry
//!
//! The validated, immutable catalog of every supported computation.
//! Construct it once at startup and pass it by reference; there is no global
//! instance.
//!
//! ## Usage
//!
//! ```rust
//! use aero_core::registry::FormulaRegistry;
//!
//! let registry = FormulaRegistry::standard().unwrap();
//! let lift = registry.get("lift-force").unwrap();
//! assert_eq!(lift.result_unit(), "N");
//!
//! assert!(registry.get("does-not-exist").is_err());
//! ```

use std::collections::HashSet;

use crate::errors::{AeroError, AeroResult};
use crate::formulas::{standard_catalog, FormulaDescriptor, FormulaGroup};

/// Ordered, id-unique collection of formula descriptors.
#[derive(Debug, Clone)]
pub struct FormulaRegistry {
    formulas: Vec<FormulaDescriptor>,
}

impl FormulaRegistry {
    /// Build a registry, refusing any formula id collision.
    ///
    /// Input id uniqueness is already guaranteed by
    /// [`FormulaBuilder::build`](crate::formulas::FormulaBuilder::build).
    pub fn new(formulas: Vec<FormulaDescriptor>) -> AeroResult<Self> {
        let mut seen = HashSet::new();
        for formula in &formulas {
            if !seen.insert(formula.id()) {
                return Err(AeroError::duplicate_formula(formula.id()));
            }
        }
        log::debug!("Formula registry built with {} formulas", formulas.len());
        Ok(Self { formulas })
    }

    /// Registry holding the standard aircraft performance catalog
    pub fn standard() -> AeroResult<Self> {
        Self::new(standard_catalog()?)
    }

    /// All formulas in presentation order
    pub fn list(&self) -> &[FormulaDescriptor] {
        &self.formulas
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormulaDescriptor> {
        self.formulas.iter()
    }

    /// Look up a formula by id. A miss is always an error, never a default.
    pub fn get(&self, id: &str) -> AeroResult<&FormulaDescriptor> {
        self.formulas
            .iter()
            .find(|formula| formula.id() == id)
            .ok_or_else(|| AeroError::unknown_formula(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.formulas.iter().any(|formula| formula.id() == id)
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    /// Formulas grouped for display, groups ordered by
    /// [`FormulaGroup::sort_order`], formulas in registry order within a group.
    pub fn groups(&self) -> Vec<(FormulaGroup, Vec<&FormulaDescriptor>)> {
        let mut groups: Vec<(FormulaGroup, Vec<&FormulaDescriptor>)> = Vec::new();
        for formula in &self.formulas {
            match groups.iter_mut().find(|(group, _)| *group == formula.group()) {
                Some((_, members)) => members.push(formula),
                None => groups.push((formula.group(), vec![formula])),
            }
        }
        groups.sort_by_key(|(group, _)| group.sort_order());
        groups
    }
}
