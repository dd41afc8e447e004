//! # Unit Systems
//!
//! All formulas are defined and evaluated in SI units:
//! - Pressure: pascals (Pa)
//! - Temperature: kelvin (K)
//! - Density: kilograms per cubic metre (kg/m³)
//! - Speed: metres per second (m/s)
//! - Area: square metres (m²)
//! - Force: newtons (N)
//!
//! [`UnitSystem::Imperial`] exists so configuration and front-ends can carry
//! the choice, but no conversion is performed anywhere.
//!
//! ## Example
//!
//! ```rust
//! use aero_core::units::UnitSystem;
//!
//! let system: UnitSystem = "imperial".parse().unwrap();
//! assert!(system.is_placeholder());
//! assert_eq!(UnitSystem::default(), UnitSystem::SI);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AeroError;

/// Unit system selection for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    /// International System of Units (the only implemented system)
    #[default]
    SI,
    /// US customary units, reserved for future expansion
    Imperial,
}

impl UnitSystem {
    /// Display name for the unit system
    pub fn display_name(&self) -> &'static str {
        match self {
            UnitSystem::SI => "SI",
            UnitSystem::Imperial => "Imperial",
        }
    }

    /// Imperial is accepted but not implemented.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, UnitSystem::Imperial)
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for UnitSystem {
    type Err = AeroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "si" | "metric" => Ok(UnitSystem::SI),
            "imperial" | "us" => Ok(UnitSystem::Imperial),
            other => Err(AeroError::config(format!(
                "unknown unit system '{}' (expected SI or Imperial)",
                other
            ))),
        }
    }
}
