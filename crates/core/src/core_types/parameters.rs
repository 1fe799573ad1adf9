//! Field input parameters for the flaring model
//!
//! `FlowParameters` is the root input record produced by the sidebar forms
//! after validation. Defaults are resolved once at construction instead of
//! being scattered through every consumer as per-read fallbacks.

use serde::{Deserialize, Serialize};

/// High-pressure flare stage, two metered compressor trains (Sm³/d)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HpFlare {
    pub comp1: f64,
    pub comp2: f64,
}

/// Low-pressure flare stage, two metered compressor trains (Sm³/d)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LpFlare {
    pub comp3: f64,
    pub comp4: f64,
}

/// Operating point of a single compressor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressorSpec {
    /// Volumetric flow (Sm³/d)
    pub flow_sm3d: f64,
    /// Discharge pressure (bar)
    pub pressure_bar: f64,
    /// Discharge temperature (°C)
    pub temperature_c: f64,
}

/// The three compression trains feeding the recovery system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Compressors {
    pub hp: CompressorSpec,
    pub lp: CompressorSpec,
    pub blower: CompressorSpec,
}

/// Root input record for every calculation in the engine
///
/// Hull vent flow is tracked for display and recovery sizing but is a
/// non-combustion source: it never contributes to emissions and is excluded
/// from [`FlowParameters::total_flaring`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowParameters {
    pub hp_flare: HpFlare,
    pub lp_flare: LpFlare,
    /// Hull vent release (Sm³/d), non-combustion
    pub hull_vent_sm3d: f64,
    pub compressors: Compressors,
}

impl FlowParameters {
    /// Combined high-pressure flare flow (Sm³/d)
    #[inline]
    pub fn total_hp(&self) -> f64 {
        self.hp_flare.comp1 + self.hp_flare.comp2
    }

    /// Combined low-pressure flare flow (Sm³/d)
    #[inline]
    pub fn total_lp(&self) -> f64 {
        self.lp_flare.comp3 + self.lp_flare.comp4
    }

    /// Total combusted flow (Sm³/d), hull vent excluded
    #[inline]
    pub fn total_flaring(&self) -> f64 {
        self.total_hp() + self.total_lp()
    }
}

impl Default for FlowParameters {
    /// Nominal Magnolia field operating point
    fn default() -> Self {
        Self {
            hp_flare: HpFlare {
                comp1: 4000.0,
                comp2: 3975.0,
            },
            lp_flare: LpFlare {
                comp3: 10000.0,
                comp4: 9925.0,
            },
            hull_vent_sm3d: 40000.0,
            compressors: Compressors {
                hp: CompressorSpec {
                    flow_sm3d: 250_000.0,
                    pressure_bar: 151.0,
                    temperature_c: 80.0,
                },
                lp: CompressorSpec {
                    flow_sm3d: 200_000.0,
                    pressure_bar: 10.0,
                    temperature_c: 60.0,
                },
                blower: CompressorSpec {
                    flow_sm3d: 250_000.0,
                    pressure_bar: 1.913,
                    temperature_c: 50.0,
                },
            },
        }
    }
}
