//! Engineering unit conversion for dashboard inputs
//!
//! Linear categories (volumetric flow, pressure, mass flow, power, volume)
//! convert through a base unit with per-unit scalar factors:
//! `result = value * factor[from] / factor[to]`. Temperature is affine and
//! carries a per-unit offset/scale pair instead.
//!
//! Two entry points:
//! - [`try_convert`] reports an [`UnitError`] for unknown labels
//! - [`convert`] keeps the legacy selector contract and returns the input
//!   value unchanged when a label is not recognized
//!
//! Base units: Sm³/d, bar, °C, kg/s, kW, m³.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical quantity families exposed to the unit selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitCategory {
    VolumeFlow,
    Pressure,
    Temperature,
    MassFlow,
    Energy,
    Volume,
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitCategory::VolumeFlow => "volume_flow",
            UnitCategory::Pressure => "pressure",
            UnitCategory::Temperature => "temperature",
            UnitCategory::MassFlow => "mass_flow",
            UnitCategory::Energy => "energy",
            UnitCategory::Volume => "volume",
        };
        write!(f, "{name}")
    }
}

/// Conversion failure: the unit label is not part of the category's table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitError {
    pub category: UnitCategory,
    pub unit: String,
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} unit '{}'", self.category, self.unit)
    }
}

impl std::error::Error for UnitError {}

/// Scalars to the category base unit
const VOLUME_FLOW: &[(&str, f64)] = &[
    ("Sm³/d", 1.0),
    ("KSm³/d", 1000.0),
    ("MSm³/d", 1_000_000.0),
    ("m³/h", 24.0),
    ("m³/s", 86400.0),
    ("ft³/d", 35.3147),
    ("Mft³/d", 35314.7),
    ("L/s", 86_400_000.0),
    ("bbl/d", 6.28981),
];

const PRESSURE: &[(&str, f64)] = &[
    ("bar", 1.0),
    ("bara", 1.0),
    ("barg", 1.0),
    ("kPa", 0.01),
    ("MPa", 10.0),
    ("psi", 0.0689476),
    ("psig", 0.0689476),
    ("psia", 0.0689476),
    ("atm", 1.01325),
    ("kgf/cm²", 0.980665),
];

const MASS_FLOW: &[(&str, f64)] = &[
    ("kg/s", 1.0),
    ("kg/h", 1.0 / 3600.0),
    ("t/h", 1000.0 / 3600.0),
    ("t/d", 1000.0 / 86400.0),
    ("lb/h", 0.453592 / 3600.0),
    ("lb/s", 0.453592),
];

const ENERGY: &[(&str, f64)] = &[
    ("kW", 1.0),
    ("MW", 1000.0),
    ("HP", 0.745699),
    ("BTU/h", 0.000293071),
    ("kcal/h", 0.001163),
];

const VOLUME: &[(&str, f64)] = &[
    ("m³", 1.0),
    ("L", 0.001),
    ("bbl", 0.158987),
    ("gal", 0.00378541),
    ("ft³", 0.0283168),
];

/// Affine temperature parameters: `celsius = (value + offset) / scale`
const TEMPERATURE: &[(&str, (f64, f64))] = &[
    ("°C", (0.0, 1.0)),
    ("K", (-273.15, 1.0)),
    ("°F", (-32.0, 5.0 / 9.0)),
    ("°R", (-491.67, 5.0 / 9.0)),
];

fn linear_table(category: UnitCategory) -> Option<&'static [(&'static str, f64)]> {
    match category {
        UnitCategory::VolumeFlow => Some(VOLUME_FLOW),
        UnitCategory::Pressure => Some(PRESSURE),
        UnitCategory::MassFlow => Some(MASS_FLOW),
        UnitCategory::Energy => Some(ENERGY),
        UnitCategory::Volume => Some(VOLUME),
        UnitCategory::Temperature => None,
    }
}

fn linear_factor(category: UnitCategory, unit: &str) -> Option<f64> {
    linear_table(category)?
        .iter()
        .find(|(label, _)| *label == unit)
        .map(|(_, factor)| *factor)
}

fn temperature_params(unit: &str) -> Option<(f64, f64)> {
    TEMPERATURE
        .iter()
        .find(|(label, _)| *label == unit)
        .map(|(_, params)| *params)
}

/// List the unit labels available for a category, in selector order
pub fn units(category: UnitCategory) -> Vec<&'static str> {
    linear_table(category).map_or_else(
        || TEMPERATURE.iter().map(|(label, _)| *label).collect(),
        |table| table.iter().map(|(label, _)| *label).collect(),
    )
}

/// Convert `value` between two units of the same category
///
/// # Errors
/// Returns [`UnitError`] when either unit label is not part of the category.
pub fn try_convert(
    value: f64,
    from: &str,
    to: &str,
    category: UnitCategory,
) -> Result<f64, UnitError> {
    let unknown = |unit: &str| UnitError {
        category,
        unit: unit.to_string(),
    };

    if category == UnitCategory::Temperature {
        let (from_offset, from_scale) = temperature_params(from).ok_or_else(|| unknown(from))?;
        let (to_offset, to_scale) = temperature_params(to).ok_or_else(|| unknown(to))?;
        let celsius = (value + from_offset) / from_scale;
        return Ok(celsius * to_scale - to_offset);
    }

    let from_factor = linear_factor(category, from).ok_or_else(|| unknown(from))?;
    let to_factor = linear_factor(category, to).ok_or_else(|| unknown(to))?;
    Ok(value * from_factor / to_factor)
}

/// Convert with the legacy fallback: unknown labels return `value` unchanged
pub fn convert(value: f64, from: &str, to: &str, category: UnitCategory) -> f64 {
    try_convert(value, from, to, category).unwrap_or(value)
}

/// Convert a value into every unit of its category
pub fn convert_to_all(value: f64, from: &str, category: UnitCategory) -> Vec<(&'static str, f64)> {
    units(category)
        .into_iter()
        .map(|unit| (unit, convert(value, from, unit, category)))
        .collect()
}
