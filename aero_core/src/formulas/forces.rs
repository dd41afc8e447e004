//! # Flight Force Formulas
//!
//! Lift and drag share the same shape: dynamic pressure times reference area
//! times a dimensionless coefficient.
//!
//! ```text
//!            L ↑
//!              │
//!    D ←───────●───────→ v
//!              │
//!            W ↓
//! ```
//!
//! ## References
//!
//! - Anderson, Introduction to Flight, 8th Edition, Section 5.3

use super::{FormulaDescriptor, FormulaGroup, InputField, InputValues};
use crate::errors::AeroResult;
use crate::formulas::atmosphere::SEA_LEVEL_DENSITY;

/// Dynamic pressure
///
/// # Formula
/// q = ½ · ρ · v²
///
/// # Example
/// ```rust
/// use aero_core::formulas::forces::dynamic_pressure;
///
/// assert!((dynamic_pressure(1.225, 50.0) - 1531.25).abs() < 1e-9);
/// ```
#[inline]
pub fn dynamic_pressure(density: f64, velocity: f64) -> f64 {
    0.5 * density * velocity * velocity
}

/// Lift force
///
/// # Formula
/// L = ½ · ρ · v² · S · C_L
///
/// # Arguments
/// * `density` - Air density (kg/m³)
/// * `velocity` - True airspeed (m/s)
/// * `wing_area` - Wing reference area (m²)
/// * `lift_coefficient` - C_L (dimensionless)
///
/// # Returns
/// Lift in newtons
///
/// # Example
/// ```rust
/// use aero_core::formulas::forces::lift_force;
///
/// let lift = lift_force(1.225, 50.0, 20.0, 1.2);
/// assert!((lift - 36_750.0).abs() < 1e-9);
/// ```
#[inline]
pub fn lift_force(density: f64, velocity: f64, wing_area: f64, lift_coefficient: f64) -> f64 {
    dynamic_pressure(density, velocity) * wing_area * lift_coefficient
}

/// Drag force
///
/// # Formula
/// D = ½ · ρ · v² · S · C_D
///
/// # Example
/// ```rust
/// use aero_core::formulas::forces::drag_force;
///
/// let drag = drag_force(1.225, 50.0, 20.0, 0.03);
/// assert!((drag - 918.75).abs() < 1e-9);
/// ```
#[inline]
pub fn drag_force(density: f64, velocity: f64, wing_area: f64, drag_coefficient: f64) -> f64 {
    dynamic_pressure(density, velocity) * wing_area * drag_coefficient
}

fn evaluate_lift(values: &InputValues) -> f64 {
    lift_force(values.get("rho"), values.get("v"), values.get("S"), values.get("Cl"))
}

fn evaluate_drag(values: &InputValues) -> f64 {
    drag_force(values.get("rho"), values.get("v"), values.get("S"), values.get("Cd"))
}

const DENSITY: InputField = InputField::new("rho", "Air Density", "ρ", "kg/m³", SEA_LEVEL_DENSITY);
const VELOCITY: InputField = InputField::new("v", "True Airspeed", "v", "m/s", 50.0);
const WING_AREA: InputField = InputField::new("S", "Wing Area", "S", "m²", 20.0);

/// Descriptor for L = ½ρv²SC_L
pub fn lift_force_formula() -> AeroResult<FormulaDescriptor> {
    FormulaDescriptor::builder("lift-force", FormulaGroup::FlightForces, evaluate_lift)
        .title("Lift Force")
        .formula_text("L = ½ · ρ · v² · S · C_L")
        .description(
            "Aerodynamic force perpendicular to the relative wind. \
             Level flight requires lift equal to weight.",
        )
        .result_unit("N")
        .presentation_tag("emerald")
        .input(DENSITY)
        .input(VELOCITY)
        .input(WING_AREA)
        .input(
            InputField::new("Cl", "Lift Coefficient", "C_L", "", 1.2)
                .with_description("Depends on airfoil shape and angle of attack"),
        )
        .build()
}

/// Descriptor for D = ½ρv²SC_D
pub fn drag_force_formula() -> AeroResult<FormulaDescriptor> {
    FormulaDescriptor::builder("drag-force", FormulaGroup::FlightForces, evaluate_drag)
        .title("Drag Force")
        .formula_text("D = ½ · ρ · v² · S · C_D")
        .description(
            "Aerodynamic force opposing motion through the air. \
             Thrust must match drag to hold a steady airspeed.",
        )
        .result_unit("N")
        .presentation_tag("rose")
        .input(DENSITY)
        .input(VELOCITY)
        .input(WING_AREA)
        .input(InputField::new("Cd", "Drag Coefficient", "C_D", "", 0.03))
        .build()
}
