//! CO₂-equivalent emission accounting for flare sources
//!
//! Only combustion emits in this model: the HP and LP flare stacks carry the
//! full emission load, while hull vent flow is tracked but contributes zero
//! (venting is a release, not a burn). The proposed scenario routes a
//! recovery fraction of every source away from the stacks and prices the
//! recovered gas at export conditions.

use crate::core_types::FlowParameters;
use serde::{Deserialize, Serialize};

/// Natural gas combustion emission factor
/// 1 Sm³ of flared gas releases roughly 2.75 kg of CO₂-equivalent
const EMISSION_FACTOR_T_PER_SM3: f64 = 0.00275; // tCO₂eq/Sm³

/// Carbon cost applied to total emissions
const CARBON_PRICE_USD_PER_T: f64 = 84.0; // USD/tCO₂eq

/// Sales gas price
const GAS_PRICE_USD_PER_MMBTU: f64 = 5.5; // USD/MMBTU

/// Heating value of the recovered stream
const MMBTU_PER_SM3: f64 = 0.0373; // MMBTU/Sm³

/// Operating days per year
const OPERATING_DAYS: f64 = 365.0;

/// Annual emissions of a passenger car
const CAR_T_PER_YEAR: f64 = 4.6; // tCO₂eq

/// Annual sequestration of a mature tree
const TREE_T_PER_YEAR: f64 = 0.021; // tCO₂eq

/// Annual emissions of a household
const HOUSE_T_PER_YEAR: f64 = 7.5; // tCO₂eq

/// Emission and pricing constants as an explicit parameter object
///
/// Passed into every calculation call so sensitivity sweeps can vary a copy
/// without touching shared state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionConfig {
    /// Combustion emission factor (tCO₂eq/Sm³)
    pub emission_factor_t_per_sm3: f64,
    /// Carbon price (USD/tCO₂eq)
    pub carbon_price_usd_per_t: f64,
    /// Sales gas price (USD/MMBTU)
    pub gas_price_usd_per_mmbtu: f64,
    /// Heating value (MMBTU/Sm³)
    pub mmbtu_per_sm3: f64,
    /// Operating days per year
    pub operating_days: f64,
}

impl Default for EmissionConfig {
    fn default() -> Self {
        Self {
            emission_factor_t_per_sm3: EMISSION_FACTOR_T_PER_SM3,
            carbon_price_usd_per_t: CARBON_PRICE_USD_PER_T,
            gas_price_usd_per_mmbtu: GAS_PRICE_USD_PER_MMBTU,
            mmbtu_per_sm3: MMBTU_PER_SM3,
            operating_days: OPERATING_DAYS,
        }
    }
}

/// Per-source flows behind a scenario result, all in Sm³/d
///
/// For the proposed scenario these are the residual flows still reaching
/// each source after recovery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFlows {
    pub lp_flare: f64,
    pub hp_flare: f64,
    pub hull_vent: f64,
}

/// Recovery-side outcome, present only for the proposed scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryOutcome {
    /// Total flow diverted to recovery, all sources (Sm³/d)
    pub recovered_flow_sm3d: f64,
    /// Fraction of each source still flared/vented
    pub residual_fraction: f64,
    /// Annual revenue from selling the recovered gas (USD/yr)
    pub gas_revenue_usd: f64,
}

/// Immutable snapshot of one scenario's emissions and cost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub flows: ScenarioFlows,
    /// LP flare emissions (tCO₂eq/yr)
    pub emissions_lp_flare: f64,
    /// HP flare emissions (tCO₂eq/yr)
    pub emissions_hp_flare: f64,
    /// Hull vent emissions, always zero: venting is not combustion
    pub emissions_hull: f64,
    /// Total emissions, LP + HP only (tCO₂eq/yr)
    pub emissions_total: f64,
    /// Carbon cost of the total emissions (USD/yr)
    pub environmental_cost_usd: f64,
    pub recovery: Option<RecoveryOutcome>,
}

/// Everyday equivalents of an annual emission total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equivalences {
    /// Passenger cars driven for a year
    pub cars: f64,
    /// Mature trees needed to offset
    pub trees: f64,
    /// Household-years of energy use
    pub houses: f64,
}

/// Annual combustion emissions for a flared flow (tCO₂eq/yr)
#[inline]
pub fn annual_emissions(flow_sm3d: f64, config: &EmissionConfig) -> f64 {
    flow_sm3d * config.operating_days * config.emission_factor_t_per_sm3
}

/// Carbon cost of an annual emission total (USD/yr)
#[inline]
pub fn environmental_cost(emissions_t: f64, config: &EmissionConfig) -> f64 {
    emissions_t * config.carbon_price_usd_per_t
}

/// Emissions of the current operation: everything reaching the stacks burns
pub fn current_scenario(params: &FlowParameters, config: &EmissionConfig) -> ScenarioResult {
    let lp = params.total_lp();
    let hp = params.total_hp();

    let emissions_lp = annual_emissions(lp, config);
    let emissions_hp = annual_emissions(hp, config);
    let emissions_total = emissions_lp + emissions_hp;

    ScenarioResult {
        flows: ScenarioFlows {
            lp_flare: lp,
            hp_flare: hp,
            hull_vent: params.hull_vent_sm3d,
        },
        emissions_lp_flare: emissions_lp,
        emissions_hp_flare: emissions_hp,
        emissions_hull: 0.0,
        emissions_total,
        environmental_cost_usd: environmental_cost(emissions_total, config),
        recovery: None,
    }
}

/// Emissions with the recovery system in place
///
/// `efficiency` is the recovered fraction of every source, clamped to [0, 1].
/// Residual flows burn as before; the recovered stream (flare plus hull vent)
/// is sold at export conditions.
pub fn proposed_scenario(
    params: &FlowParameters,
    efficiency: f64,
    config: &EmissionConfig,
) -> ScenarioResult {
    let efficiency = crate::validation::validate_rate(efficiency, "Recovery efficiency").value;
    let residual = 1.0 - efficiency;

    let lp = params.total_lp();
    let hp = params.total_hp();
    let hull = params.hull_vent_sm3d;

    let lp_residual = lp * residual;
    let hp_residual = hp * residual;
    let hull_residual = hull * residual;
    let recovered = (lp + hp) * efficiency + hull * efficiency;

    let emissions_lp = annual_emissions(lp_residual, config);
    let emissions_hp = annual_emissions(hp_residual, config);
    let emissions_total = emissions_lp + emissions_hp;

    let gas_revenue_usd =
        recovered * config.operating_days * config.gas_price_usd_per_mmbtu * config.mmbtu_per_sm3;

    ScenarioResult {
        flows: ScenarioFlows {
            lp_flare: lp_residual,
            hp_flare: hp_residual,
            hull_vent: hull_residual,
        },
        emissions_lp_flare: emissions_lp,
        emissions_hp_flare: emissions_hp,
        emissions_hull: 0.0,
        emissions_total,
        environmental_cost_usd: environmental_cost(emissions_total, config),
        recovery: Some(RecoveryOutcome {
            recovered_flow_sm3d: recovered,
            residual_fraction: residual,
            gas_revenue_usd,
        }),
    }
}

/// Translate an annual emission total into everyday equivalents
pub fn equivalences(emissions_t: f64) -> Equivalences {
    Equivalences {
        cars: emissions_t / CAR_T_PER_YEAR,
        trees: emissions_t / TREE_T_PER_YEAR,
        houses: emissions_t / HOUSE_T_PER_YEAR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{FlowParameters, HpFlare, LpFlare};
    use approx::assert_relative_eq;

    fn params_with_totals(total_lp: f64, total_hp: f64) -> FlowParameters {
        FlowParameters {
            hp_flare: HpFlare {
                comp1: total_hp,
                comp2: 0.0,
            },
            lp_flare: LpFlare {
                comp3: total_lp,
                comp4: 0.0,
            },
            ..FlowParameters::default()
        }
    }

    #[test]
    fn test_reference_operating_point() {
        // 27 900 + 40 000 Sm³/d at the standard factor
        let params = params_with_totals(27900.0, 40000.0);
        let result = current_scenario(&params, &EmissionConfig::default());
        assert_relative_eq!(result.emissions_total, 68108.75, epsilon = 1e-9);
        assert_relative_eq!(
            result.environmental_cost_usd,
            68108.75 * 84.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_emissions_scale_linearly_with_flow() {
        let config = EmissionConfig::default();
        let single = current_scenario(&params_with_totals(10000.0, 0.0), &config);
        let double = current_scenario(&params_with_totals(20000.0, 0.0), &config);
        assert!(double.emissions_lp_flare > single.emissions_lp_flare);
        assert_relative_eq!(
            double.emissions_lp_flare,
            2.0 * single.emissions_lp_flare,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_hull_vent_never_emits() {
        let params = FlowParameters {
            hull_vent_sm3d: 500_000.0,
            ..FlowParameters::default()
        };
        let config = EmissionConfig::default();

        let current = current_scenario(&params, &config);
        assert_eq!(current.emissions_hull, 0.0);
        assert_relative_eq!(
            current.emissions_total,
            current.emissions_lp_flare + current.emissions_hp_flare,
            epsilon = 1e-12
        );

        let proposed = proposed_scenario(&params, 0.85, &config);
        assert_eq!(proposed.emissions_hull, 0.0);
    }

    #[test]
    fn test_recovery_reduces_emissions() {
        let params = FlowParameters::default();
        let config = EmissionConfig::default();
        let current = current_scenario(&params, &config);

        for efficiency in [0.1, 0.5, 0.85, 0.99] {
            let proposed = proposed_scenario(&params, efficiency, &config);
            assert!(
                proposed.emissions_total < current.emissions_total,
                "efficiency {efficiency} should cut emissions"
            );
        }
    }

    #[test]
    fn test_zero_efficiency_matches_current() {
        let params = FlowParameters::default();
        let config = EmissionConfig::default();
        let current = current_scenario(&params, &config);
        let proposed = proposed_scenario(&params, 0.0, &config);
        assert_relative_eq!(
            proposed.emissions_total,
            current.emissions_total,
            epsilon = 1e-12
        );
        assert_eq!(proposed.recovery.unwrap().recovered_flow_sm3d, 0.0);
    }

    #[test]
    fn test_efficiency_clamped_to_unit_range() {
        let params = FlowParameters::default();
        let config = EmissionConfig::default();
        let over = proposed_scenario(&params, 1.7, &config);
        assert_relative_eq!(over.emissions_total, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_recovery_includes_hull_vent() {
        let params = FlowParameters::default();
        let config = EmissionConfig::default();
        let proposed = proposed_scenario(&params, 0.85, &config);
        let recovery = proposed.recovery.unwrap();
        let expected = (params.total_flaring() + params.hull_vent_sm3d) * 0.85;
        assert_relative_eq!(recovery.recovered_flow_sm3d, expected, epsilon = 1e-9);
        assert!(recovery.gas_revenue_usd > 0.0);
    }

    #[test]
    fn test_equivalences_reference_value() {
        let eq = equivalences(68108.75);
        assert_relative_eq!(eq.cars, 68108.75 / 4.6, epsilon = 1e-9);
        assert!((eq.cars - 14806.0).abs() < 1.0);
        assert_relative_eq!(eq.trees, 68108.75 / 0.021, epsilon = 1e-9);
        assert_relative_eq!(eq.houses, 68108.75 / 7.5, epsilon = 1e-9);
    }
}
