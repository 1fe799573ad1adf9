//! Flare Gas Recovery Calculation Engine
//!
//! Deterministic emissions/economics model and stochastic simulation core
//! behind the gas-recovery comparison dashboard:
//! - unit conversion and clamp-and-report input validation
//! - current vs. proposed scenario emissions with environmental pricing
//! - discounted-cash-flow appraisal (NPV, IRR, payback, ROI) and
//!   sensitivity sweeps
//! - Monte Carlo risk simulation of flaring volumes
//! - flaring forecasts from small from-scratch regressors (random forest,
//!   KNN)
//!
//! Every entry point is a pure function of its inputs; stochastic runs take
//! an optional seed for reproducibility. Presentation, charting and export
//! formatting live outside this crate and consume the plain serializable
//! records produced here.

// Core types and utilities
pub mod core_types;

// Input sanitization
pub mod validation;

// Deterministic scenario calculators
pub mod scenario;

// Stochastic subsystems
pub mod forecast;
pub mod risk;

// Ad-hoc formula evaluation for the technical calculator
pub mod expression;

// Report bundle for the export collaborators
pub mod export;

// Re-export core types
pub use core_types::{FlowParameters, UnitCategory, UnitError};

// Re-export scenario calculators
pub use scenario::{
    analyze_project, current_scenario, equivalences, proposed_scenario, EconomicAnalysis,
    EconomicConfig, EmissionConfig, ScenarioResult,
};

// Re-export simulation types
pub use forecast::{run_forecast, ForecastConfig, ForecastError, ForecastResult, ModelKind};
pub use risk::{FlareComponents, RiskConfig, RiskPreset, RiskRun};

// Re-export the export bundle
pub use export::{ExportError, ReportBundle};
