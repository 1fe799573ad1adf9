//! Scenario calculators: emissions, project economics, sensitivity sweeps

pub mod economics;
pub mod emissions;
pub mod sensitivity;

pub use economics::{
    analyze_project, irr_percent, npv_constant, payback_simple, present_value, EconomicAnalysis,
    EconomicConfig, DEFAULT_INVESTMENT_USD,
};
pub use emissions::{
    annual_emissions, current_scenario, environmental_cost, equivalences, proposed_scenario,
    EmissionConfig, Equivalences, RecoveryOutcome, ScenarioFlows, ScenarioResult,
};
pub use sensitivity::{sweep, SensitivityParameter, SensitivityPoint, SensitivitySweep};
