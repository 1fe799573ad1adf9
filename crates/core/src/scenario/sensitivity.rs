//! One-at-a-time sensitivity sweeps of the project appraisal
//!
//! Each swept point re-runs the full appraisal with a modified copy of the
//! relevant configuration, so concurrent sweeps never interfere.

use crate::core_types::FlowParameters;
use crate::scenario::economics::{
    analyze_project, EconomicConfig, DEFAULT_INVESTMENT_USD,
};
use crate::scenario::emissions::{current_scenario, proposed_scenario, EmissionConfig};
use serde::{Deserialize, Serialize};

/// Recovery efficiency assumed while sweeping the other parameters
const SWEEP_EFFICIENCY: f64 = 0.85;

/// Parameters the appraisal can be swept over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensitivityParameter {
    /// Sales gas price (USD/MMBTU)
    GasPrice,
    /// Recovery rate (%)
    RecoveryRate,
    /// CAPEX (M USD)
    Investment,
    /// Discount rate (%)
    DiscountRate,
    /// OPEX as % of CAPEX
    OpexFraction,
}

impl SensitivityParameter {
    /// Axis label for the swept parameter
    pub fn label(self) -> &'static str {
        match self {
            SensitivityParameter::GasPrice => "Gas price (USD/MMBTU)",
            SensitivityParameter::RecoveryRate => "Recovery rate (%)",
            SensitivityParameter::Investment => "Investment (M USD)",
            SensitivityParameter::DiscountRate => "Discount rate (%)",
            SensitivityParameter::OpexFraction => "OPEX (% of CAPEX)",
        }
    }

    /// Nominal value of the parameter, in sweep units
    pub fn base(self) -> f64 {
        match self {
            SensitivityParameter::GasPrice => 5.5,
            SensitivityParameter::RecoveryRate => 85.0,
            SensitivityParameter::Investment => 12.0,
            SensitivityParameter::DiscountRate => 10.0,
            SensitivityParameter::OpexFraction => 5.0,
        }
    }

    /// Sweep grid, in sweep units
    pub fn values(self) -> &'static [f64] {
        match self {
            SensitivityParameter::GasPrice => {
                &[2.0, 3.0, 4.0, 5.0, 5.5, 6.0, 7.0, 8.0, 9.0, 10.0]
            }
            SensitivityParameter::RecoveryRate => &[70.0, 75.0, 80.0, 85.0, 90.0, 95.0, 98.0],
            SensitivityParameter::Investment => {
                &[8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 18.0]
            }
            SensitivityParameter::DiscountRate => {
                &[5.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 15.0, 20.0]
            }
            SensitivityParameter::OpexFraction => {
                &[2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0, 12.0]
            }
        }
    }
}

/// Appraisal outcome at one swept value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub value: f64,
    pub npv_usd: f64,
    pub irr_percent: f64,
    pub roi_percent: f64,
    pub payback_years: Option<f64>,
    pub is_base: bool,
}

/// A complete one-parameter sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivitySweep {
    pub parameter: SensitivityParameter,
    pub label: &'static str,
    pub base: f64,
    pub points: Vec<SensitivityPoint>,
}

/// Sweep the appraisal over one parameter's value grid
pub fn sweep(
    params: &FlowParameters,
    parameter: SensitivityParameter,
    emission_config: &EmissionConfig,
    economic_config: &EconomicConfig,
) -> SensitivitySweep {
    let current = current_scenario(params, emission_config);

    let points = parameter
        .values()
        .iter()
        .map(|&value| {
            let mut emission = *emission_config;
            let mut economic = *economic_config;
            let mut investment = DEFAULT_INVESTMENT_USD;
            let mut efficiency = SWEEP_EFFICIENCY;

            match parameter {
                SensitivityParameter::GasPrice => emission.gas_price_usd_per_mmbtu = value,
                SensitivityParameter::RecoveryRate => efficiency = value / 100.0,
                SensitivityParameter::Investment => investment = value * 1_000_000.0,
                SensitivityParameter::DiscountRate => economic.discount_rate = value / 100.0,
                SensitivityParameter::OpexFraction => economic.opex_fraction = value / 100.0,
            }

            let proposed = proposed_scenario(params, efficiency, &emission);
            let analysis = analyze_project(&current, &proposed, investment, &economic);

            SensitivityPoint {
                value,
                npv_usd: analysis.npv_usd,
                irr_percent: analysis.irr_percent,
                roi_percent: analysis.roi_percent,
                payback_years: analysis.payback_years,
                is_base: value == parameter.base(),
            }
        })
        .collect();

    SensitivitySweep {
        parameter,
        label: parameter.label(),
        base: parameter.base(),
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_grid_contains_its_base() {
        for parameter in [
            SensitivityParameter::GasPrice,
            SensitivityParameter::RecoveryRate,
            SensitivityParameter::Investment,
            SensitivityParameter::DiscountRate,
            SensitivityParameter::OpexFraction,
        ] {
            assert!(
                parameter.values().contains(&parameter.base()),
                "{} grid must include its base value",
                parameter.label()
            );
        }
    }

    #[test]
    fn test_gas_price_sweep_is_monotonic_in_npv() {
        let sweep = sweep(
            &FlowParameters::default(),
            SensitivityParameter::GasPrice,
            &EmissionConfig::default(),
            &EconomicConfig::default(),
        );
        for pair in sweep.points.windows(2) {
            assert!(
                pair[1].npv_usd > pair[0].npv_usd,
                "higher gas price must raise NPV"
            );
        }
        assert_eq!(sweep.points.iter().filter(|p| p.is_base).count(), 1);
    }

    #[test]
    fn test_discount_rate_sweep_is_decreasing_in_npv() {
        let sweep = sweep(
            &FlowParameters::default(),
            SensitivityParameter::DiscountRate,
            &EmissionConfig::default(),
            &EconomicConfig::default(),
        );
        for pair in sweep.points.windows(2) {
            assert!(
                pair[1].npv_usd < pair[0].npv_usd,
                "higher discount rate must lower NPV"
            );
        }
    }

    #[test]
    fn test_configs_are_untouched_by_sweeps() {
        let emission = EmissionConfig::default();
        let economic = EconomicConfig::default();
        let _ = sweep(
            &FlowParameters::default(),
            SensitivityParameter::OpexFraction,
            &emission,
            &economic,
        );
        assert_eq!(emission, EmissionConfig::default());
        assert_eq!(economic, EconomicConfig::default());
    }
}
