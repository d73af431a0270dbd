//! Unit conversion utilities
//!
//! Floor-plan coordinates are expressed in plan units where one unit is one
//! centimetre. The 3D scene works in metres.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Plan units per scene metre.
pub const PIXELS_PER_METER: f64 = 100.0;

/// Unit system used when displaying dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Metres, two decimals (`1.50m`)
    #[serde(alias = "m")]
    Meters,
    /// Centimetres, whole numbers (`150cm`)
    #[default]
    #[serde(alias = "cm")]
    Centimeters,
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meters => write!(f, "m"),
            Self::Centimeters => write!(f, "cm"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(Self::Meters),
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => {
                Ok(Self::Centimeters)
            }
            _ => Err(format!("Unknown unit system: {}", s)),
        }
    }
}

/// Convert plan units to scene metres.
pub fn plan_to_meters(value: f64) -> f64 {
    value / PIXELS_PER_METER
}

/// Convert scene metres to plan units.
pub fn meters_to_plan(value: f64) -> f64 {
    value * PIXELS_PER_METER
}

/// Format a plan-unit length for display
///
/// * `value` - Length in plan units
/// * `system` - Target unit system
pub fn format_dimension(value: f64, system: UnitSystem) -> String {
    match system {
        UnitSystem::Meters => format!("{:.2}m", plan_to_meters(value)),
        UnitSystem::Centimeters => format!("{}cm", value.round() as i64),
    }
}

/// Format a `width × height` footprint.
pub fn format_footprint(width: f64, height: f64, system: UnitSystem) -> String {
    format!(
        "{} × {}",
        format_dimension(width, system),
        format_dimension(height, system)
    )
}
