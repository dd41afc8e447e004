//! # Drag Analysis & Efficiency
//!
//! Drag polar formulas for a wing with parabolic drag:
//! C_D = C_D0 + C_L² / (π · e · AR)
//!
//! ## Notation
//!
//! - `q` = Dynamic pressure (Pa)
//! - `S` = Wing reference area (m²)
//! - `C_D0` = Zero-lift (parasite) drag coefficient
//! - `AR` = Aspect ratio (b² / S)
//! - `e` = Oswald span efficiency factor
//!
//! ## References
//!
//! - Anderson, Aircraft Performance and Design, Chapter 2.9
//! - Raymer, Aircraft Design: A Conceptual Approach, Section 12.6

use std::f64::consts::PI;

use super::{FormulaDescriptor, FormulaGroup, InputField, InputValues};
use crate::errors::AeroResult;

/// Induced drag coefficient
///
/// # Formula
/// C_Di = C_L² / (π · e · AR)
#[inline]
pub fn induced_drag_coefficient(lift_coefficient: f64, aspect_ratio: f64, oswald: f64) -> f64 {
    lift_coefficient * lift_coefficient / (PI * oswald * aspect_ratio)
}

/// Induced drag force (drag due to lift)
///
/// # Formula
/// D_i = q · S · C_L² / (π · e · AR)
///
/// # Example
/// ```rust
/// use aero_core::formulas::drag::induced_drag;
///
/// let di = induced_drag(1531.25, 20.0, 0.5, 8.0, 0.8);
/// assert!((di - 380.79).abs() < 0.01);
/// ```
#[inline]
pub fn induced_drag(
    dynamic_pressure: f64,
    wing_area: f64,
    lift_coefficient: f64,
    aspect_ratio: f64,
    oswald: f64,
) -> f64 {
    dynamic_pressure * wing_area * induced_drag_coefficient(lift_coefficient, aspect_ratio, oswald)
}

/// Parasite (zero-lift) drag force
///
/// # Formula
/// D_p = q · S · C_D0
#[inline]
pub fn parasite_drag(dynamic_pressure: f64, wing_area: f64, zero_lift_drag: f64) -> f64 {
    dynamic_pressure * wing_area * zero_lift_drag
}

/// Lift-to-drag ratio for a given operating C_L
///
/// # Formula
/// L/D = C_L / (C_D0 + C_L² / (π · e · AR))
///
/// # Example
/// ```rust
/// use aero_core::formulas::drag::lift_to_drag;
///
/// let ld = lift_to_drag(0.5, 0.025, 8.0, 0.8);
/// assert!((ld - 13.357).abs() < 0.001);
/// ```
#[inline]
pub fn lift_to_drag(lift_coefficient: f64, zero_lift_drag: f64, aspect_ratio: f64, oswald: f64) -> f64 {
    lift_coefficient / (zero_lift_drag + induced_drag_coefficient(lift_coefficient, aspect_ratio, oswald))
}

/// Maximum lift-to-drag ratio
///
/// Reached where induced drag equals parasite drag.
///
/// # Formula
/// (L/D)max = ½ · √(π · e · AR / C_D0)
///
/// # Example
/// ```rust
/// use aero_core::formulas::drag::max_lift_to_drag;
///
/// let ld_max = max_lift_to_drag(8.0, 0.8, 0.025);
/// assert!((ld_max - 14.18).abs() < 0.01);
/// ```
#[inline]
pub fn max_lift_to_drag(aspect_ratio: f64, oswald: f64, zero_lift_drag: f64) -> f64 {
    0.5 * (PI * oswald * aspect_ratio / zero_lift_drag).sqrt()
}

fn evaluate_induced(values: &InputValues) -> f64 {
    induced_drag(
        values.get("q"),
        values.get("S"),
        values.get("Cl"),
        values.get("AR"),
        values.get("e"),
    )
}

fn evaluate_parasite(values: &InputValues) -> f64 {
    parasite_drag(values.get("q"), values.get("S"), values.get("Cd0"))
}

fn evaluate_lift_to_drag(values: &InputValues) -> f64 {
    lift_to_drag(values.get("Cl"), values.get("Cd0"), values.get("AR"), values.get("e"))
}

fn evaluate_max_lift_to_drag(values: &InputValues) -> f64 {
    max_lift_to_drag(values.get("AR"), values.get("e"), values.get("Cd0"))
}

const DYNAMIC_PRESSURE: InputField = InputField::new("q", "Dynamic Pressure", "q", "Pa", 1531.25)
    .with_description("½ρv², 1531.25 Pa is 50 m/s at sea level");
const WING_AREA: InputField = InputField::new("S", "Wing Area", "S", "m²", 20.0);
const LIFT_COEFFICIENT: InputField = InputField::new("Cl", "Lift Coefficient", "C_L", "", 0.5);
const ZERO_LIFT_DRAG: InputField = InputField::new("Cd0", "Zero-Lift Drag Coefficient", "C_D0", "", 0.025);
const ASPECT_RATIO: InputField = InputField::new("AR", "Aspect Ratio", "AR", "", 8.0)
    .with_description("Span squared over wing area");
const OSWALD: InputField = InputField::new("e", "Oswald Efficiency", "e", "", 0.8)
    .with_description("1.0 for an ideal elliptical lift distribution");

/// Descriptor for induced drag
pub fn induced_drag_formula() -> AeroResult<FormulaDescriptor> {
    FormulaDescriptor::builder("induced-drag", FormulaGroup::DragAnalysis, evaluate_induced)
        .title("Induced Drag")
        .formula_text("D_i = q · S · C_L² / (π · e · AR)")
        .description(
            "Drag created by wingtip vortices as a by-product of lift. \
             Dominant at low speed and high angle of attack.",
        )
        .result_unit("N")
        .presentation_tag("amber")
        .input(DYNAMIC_PRESSURE)
        .input(WING_AREA)
        .input(LIFT_COEFFICIENT)
        .input(ASPECT_RATIO)
        .input(OSWALD)
        .build()
}

/// Descriptor for parasite drag
pub fn parasite_drag_formula() -> AeroResult<FormulaDescriptor> {
    FormulaDescriptor::builder("parasite-drag", FormulaGroup::DragAnalysis, evaluate_parasite)
        .title("Parasite Drag")
        .formula_text("D_p = q · S · C_D0")
        .description(
            "Form, skin-friction and interference drag that exists independent of lift. \
             Grows with the square of airspeed.",
        )
        .result_unit("N")
        .presentation_tag("orange")
        .input(DYNAMIC_PRESSURE)
        .input(WING_AREA)
        .input(ZERO_LIFT_DRAG)
        .build()
}

/// Descriptor for the operating L/D
pub fn lift_to_drag_formula() -> AeroResult<FormulaDescriptor> {
    FormulaDescriptor::builder("lift-to-drag", FormulaGroup::DragAnalysis, evaluate_lift_to_drag)
        .title("Lift-to-Drag Ratio")
        .formula_text("L/D = C_L / (C_D0 + C_L² / (π · e · AR))")
        .description(
            "Aerodynamic efficiency at the current lift coefficient. \
             Equal to the still-air glide ratio.",
        )
        .result_unit("ratio")
        .presentation_tag("violet")
        .input(LIFT_COEFFICIENT)
        .input(ZERO_LIFT_DRAG)
        .input(ASPECT_RATIO)
        .input(OSWALD)
        .build()
}

/// Descriptor for (L/D)max
pub fn max_lift_to_drag_formula() -> AeroResult<FormulaDescriptor> {
    FormulaDescriptor::builder(
        "max-lift-to-drag",
        FormulaGroup::DragAnalysis,
        evaluate_max_lift_to_drag,
    )
    .title("Maximum Lift-to-Drag Ratio")
    .formula_text("(L/D)max = ½ · √(π · e · AR / C_D0)")
    .description(
        "Best achievable efficiency of the airframe, flown where induced drag equals \
         parasite drag. Sets best glide and maximum endurance for jets.",
    )
    .result_unit("ratio")
    .presentation_tag("fuchsia")
    .input(ASPECT_RATIO)
    .input(OSWALD)
    .input(ZERO_LIFT_DRAG)
    .build()
}
