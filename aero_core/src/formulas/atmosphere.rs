//! # Atmospheric State Formulas
//!
//! Air density from the ideal gas law and pressure altitude from the ICAO
//! Standard Atmosphere (ISA) troposphere model.
//!
//! ## Notation
//!
//! - `p` = Static pressure (Pa)
//! - `p₀` = Reference (sea-level) pressure (Pa)
//! - `R` = Specific gas constant of dry air (J/(kg·K))
//! - `T` = Absolute temperature (K)
//! - `ρ` = Air density (kg/m³)
//! - `h` = Pressure altitude (m)
//!
//! ## References
//!
//! - ICAO Doc 7488/3: Manual of the ICAO Standard Atmosphere
//! - Anderson, Introduction to Flight, 8th Edition, Chapter 3

use super::{FormulaDescriptor, FormulaGroup, InputField, InputValues};
use crate::errors::AeroResult;

/// ISA sea-level pressure (Pa)
pub const SEA_LEVEL_PRESSURE_PA: f64 = 101_325.0;
/// ISA sea-level temperature (K)
pub const SEA_LEVEL_TEMPERATURE_K: f64 = 288.15;
/// ISA sea-level density (kg/m³)
pub const SEA_LEVEL_DENSITY: f64 = 1.225;
/// Specific gas constant of dry air as entered by users (J/(kg·K))
pub const R_DRY_AIR: f64 = 287.05;
/// Troposphere temperature lapse rate (K/m)
pub const TROPOSPHERE_LAPSE_RATE: f64 = 0.0065;
/// Standard gravitational acceleration (m/s²)
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Gas constant used to derive the ISA pressure exponent (J/(kg·K))
const R_ISA: f64 = 287.052_87;

// =============================================================================
// AIR DENSITY
// =============================================================================

/// Air density from pressure and temperature
///
/// # Formula
/// ρ = p / (R · T)
///
/// # Arguments
/// * `pressure_pa` - Static pressure
/// * `gas_constant` - Specific gas constant
/// * `temperature_k` - Absolute temperature
///
/// # Example
/// ```rust
/// use aero_core::formulas::atmosphere::air_density;
///
/// // ISA sea level
/// let rho = air_density(101_325.0, 287.05, 288.15);
/// assert!((rho - 1.225).abs() < 0.001);
/// ```
#[inline]
pub fn air_density(pressure_pa: f64, gas_constant: f64, temperature_k: f64) -> f64 {
    pressure_pa / (gas_constant * temperature_k)
}

// =============================================================================
// PRESSURE ALTITUDE
// =============================================================================

/// Pressure altitude from a static pressure and a reference pressure
///
/// Inverts the ISA troposphere pressure profile
/// `p = p₀ (1 − L h / T₀)^(g₀ / (R L))`, valid up to the tropopause (11 km).
///
/// # Formula
/// h = (T₀ / L) · (1 − (p / p₀)^(R · L / g₀))
///
/// With ISA constants this is h ≈ 44330.77 · (1 − (p / p₀)^0.190263).
///
/// # Arguments
/// * `pressure_pa` - Static pressure at the aircraft
/// * `reference_pressure_pa` - Datum pressure (101325 Pa for standard setting)
///
/// # Example
/// ```rust
/// use aero_core::formulas::atmosphere::pressure_altitude;
///
/// let h = pressure_altitude(89_874.6, 101_325.0);
/// assert!((h - 1000.0).abs() < 1.0);
/// ```
#[inline]
pub fn pressure_altitude(pressure_pa: f64, reference_pressure_pa: f64) -> f64 {
    let exponent = R_ISA * TROPOSPHERE_LAPSE_RATE / STANDARD_GRAVITY;
    let scale_height = SEA_LEVEL_TEMPERATURE_K / TROPOSPHERE_LAPSE_RATE;
    scale_height * (1.0 - (pressure_pa / reference_pressure_pa).powf(exponent))
}

fn evaluate_air_density(values: &InputValues) -> f64 {
    air_density(values.get("p"), values.get("R"), values.get("T"))
}

fn evaluate_pressure_altitude(values: &InputValues) -> f64 {
    pressure_altitude(values.get("p"), values.get("p0"))
}

/// Descriptor for ρ = p / (R·T)
pub fn air_density_formula() -> AeroResult<FormulaDescriptor> {
    FormulaDescriptor::builder("air-density", FormulaGroup::AtmosphericState, evaluate_air_density)
        .title("Air Density")
        .formula_text("ρ = p / (R · T)")
        .description(
            "Density of dry air from static pressure and temperature. \
             Density drives every aerodynamic force and falls with altitude and heat.",
        )
        .result_unit("kg/m³")
        .presentation_tag("sky")
        .input(InputField::new("p", "Static Pressure", "p", "Pa", SEA_LEVEL_PRESSURE_PA))
        .input(
            InputField::new("R", "Gas Constant", "R", "J/(kg·K)", R_DRY_AIR)
                .with_description("Specific gas constant of dry air"),
        )
        .input(InputField::new("T", "Temperature", "T", "K", SEA_LEVEL_TEMPERATURE_K))
        .build()
}

/// Descriptor for ISA pressure altitude
pub fn pressure_altitude_formula() -> AeroResult<FormulaDescriptor> {
    FormulaDescriptor::builder(
        "pressure-altitude",
        FormulaGroup::AtmosphericState,
        evaluate_pressure_altitude,
    )
    .title("Pressure Altitude")
    .formula_text("h = 44330.77 · (1 − (p / p₀)^0.190263)")
    .description(
        "Altitude in the ISA troposphere at which the standard atmosphere has the \
         given static pressure, measured from the reference pressure datum.",
    )
    .result_unit("m")
    .presentation_tag("indigo")
    .input(InputField::new("p", "Static Pressure", "p", "Pa", 89_874.6))
    .input(
        InputField::new("p0", "Reference Pressure", "p₀", "Pa", SEA_LEVEL_PRESSURE_PA)
            .with_description("Altimeter setting; 101325 Pa for the standard datum"),
    )
    .build()
}
