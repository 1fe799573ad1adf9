//! Input validation with a clamp-and-report policy
//!
//! Invalid input is never rejected: every check resolves to the nearest
//! in-range value plus a descriptive message the caller may surface.
//! NaN and non-finite inputs clamp to the range minimum.

use crate::core_types::FlowParameters;
use serde::{Deserialize, Serialize};

/// Outcome of a single range check
///
/// `value` always holds a usable number: the input when valid, the nearest
/// bound otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    pub message: Option<String>,
    pub value: f64,
}

impl Validation {
    fn ok(value: f64) -> Self {
        Self {
            valid: true,
            message: None,
            value,
        }
    }

    fn clamped(value: f64, message: String) -> Self {
        Self {
            valid: false,
            message: Some(message),
            value,
        }
    }
}

/// A failed field check collected during batch validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

/// Range-check `value` against `[min, max]`, clamping on failure
pub fn check_range(value: f64, min: f64, max: f64, label: &str) -> Validation {
    if value.is_nan() {
        return Validation::clamped(min, format!("{label}: value must be numeric"));
    }
    if value.is_infinite() {
        return Validation::clamped(min, format!("{label}: value must be finite"));
    }
    if value < min {
        return Validation::clamped(min, format!("{label}: minimum value is {min}"));
    }
    if value > max {
        return Validation::clamped(max, format!("{label}: maximum value is {max}"));
    }
    Validation::ok(value)
}

/// Temperature in °C, cryogenic floor to equipment ceiling
pub fn validate_temperature(value: f64, label: &str) -> Validation {
    check_range(value, -50.0, 200.0, label)
}

/// Pressure in bar, vacuum to design limit
pub fn validate_pressure(value: f64, label: &str) -> Validation {
    check_range(value, 0.0, 300.0, label)
}

/// Compressor flow in Sm³/d, idle to typical maximum capacity
pub fn validate_compressor_flow(value: f64, label: &str) -> Validation {
    check_range(value, 0.0, 500_000.0, label)
}

/// Flaring flow in Sm³/d
pub fn validate_flaring_flow(value: f64, label: &str) -> Validation {
    check_range(value, 0.0, 100_000.0, label)
}

/// Percentage in [0, 100]
pub fn validate_percentage(value: f64, label: &str) -> Validation {
    check_range(value, 0.0, 100.0, label)
}

/// Fractional rate in [0, 1] (discount, growth, recovery efficiency)
pub fn validate_rate(value: f64, label: &str) -> Validation {
    check_range(value, 0.0, 1.0, label)
}

/// Investment in USD
pub fn validate_investment(value: f64, label: &str) -> Validation {
    check_range(value, 0.0, 100_000_000.0, label)
}

/// Coerce NaN/infinite values to a default
pub fn sanitize(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        default
    }
}

/// Validate every field of a parameter set, returning a fully clamped copy
/// together with the list of issues found
pub fn validate_parameters(params: &FlowParameters) -> (FlowParameters, Vec<ValidationIssue>) {
    let mut issues = Vec::new();
    let mut apply = |validation: Validation, field: &str| -> f64 {
        if let Some(message) = validation.message {
            issues.push(ValidationIssue {
                field: field.to_string(),
                message,
            });
        }
        validation.value
    };

    let mut clamped = *params;
    clamped.hp_flare.comp1 = apply(
        validate_flaring_flow(params.hp_flare.comp1, "HP comp 1 flow"),
        "hp_flare.comp1",
    );
    clamped.hp_flare.comp2 = apply(
        validate_flaring_flow(params.hp_flare.comp2, "HP comp 2 flow"),
        "hp_flare.comp2",
    );
    clamped.lp_flare.comp3 = apply(
        validate_flaring_flow(params.lp_flare.comp3, "LP comp 3 flow"),
        "lp_flare.comp3",
    );
    clamped.lp_flare.comp4 = apply(
        validate_flaring_flow(params.lp_flare.comp4, "LP comp 4 flow"),
        "lp_flare.comp4",
    );
    clamped.hull_vent_sm3d = apply(
        validate_flaring_flow(params.hull_vent_sm3d, "Hull vent flow"),
        "hull_vent_sm3d",
    );

    for (compressor, name, field) in [
        (&mut clamped.compressors.hp, "HP", "compressors.hp"),
        (&mut clamped.compressors.lp, "LP", "compressors.lp"),
        (&mut clamped.compressors.blower, "Blower", "compressors.blower"),
    ] {
        compressor.flow_sm3d = apply(
            validate_compressor_flow(compressor.flow_sm3d, &format!("{name} flow")),
            &format!("{field}.flow_sm3d"),
        );
        compressor.pressure_bar = apply(
            validate_pressure(compressor.pressure_bar, &format!("{name} pressure")),
            &format!("{field}.pressure_bar"),
        );
        compressor.temperature_c = apply(
            validate_temperature(compressor.temperature_c, &format!("{name} temperature")),
            &format!("{field}.temperature_c"),
        );
    }

    (clamped, issues)
}
