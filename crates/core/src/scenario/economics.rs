//! Discounted-cash-flow analysis of the recovery investment
//!
//! Builds a ten-year cash-flow model from a pair of scenario results:
//! gas revenue degrades 1%/yr, OPEX starts at 5% of CAPEX and inflates
//! 2.5%/yr, and the environmental-cost saving is constant. NPV discounts at
//! 10%/yr; IRR solves by Newton–Raphson; payback is the discounted,
//! interpolated recovery year.

use crate::scenario::emissions::ScenarioResult;
use serde::{Deserialize, Serialize};

/// Default recovery-system CAPEX (USD)
pub const DEFAULT_INVESTMENT_USD: f64 = 12_000_000.0;

/// IRR solver seed (10%)
const IRR_INITIAL_GUESS: f64 = 0.10;
/// IRR solver iteration cap
const IRR_MAX_ITERATIONS: usize = 100;
/// IRR solver convergence bound on |NPV|
const IRR_TOLERANCE: f64 = 0.0001;

/// Economic assumptions as an explicit parameter object
///
/// Sensitivity sweeps vary a copy per point; nothing here is shared state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicConfig {
    /// Annual OPEX as a fraction of CAPEX
    pub opex_fraction: f64,
    /// Recovery efficiency degradation per year
    pub efficiency_degradation: f64,
    /// OPEX inflation per year
    pub opex_growth: f64,
    /// Discount rate per year
    pub discount_rate: f64,
    /// Analysis horizon in years
    pub horizon_years: u32,
}

impl Default for EconomicConfig {
    fn default() -> Self {
        Self {
            opex_fraction: 0.05,
            efficiency_degradation: 0.01,
            opex_growth: 0.025,
            discount_rate: 0.10,
            horizon_years: 10,
        }
    }
}

/// Full investment appraisal of the recovery project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicAnalysis {
    pub initial_investment_usd: f64,
    /// Annual environmental-cost saving, current minus proposed (USD/yr)
    pub environmental_saving_usd: f64,
    /// First-year gas revenue before degradation (USD/yr)
    pub gas_revenue_usd: f64,
    /// First-year OPEX before inflation (USD/yr)
    pub opex_base_usd: f64,
    /// Net cash flow per horizon year, undiscounted (USD)
    pub cash_flows_usd: Vec<f64>,
    pub average_cash_flow_usd: f64,
    pub npv_usd: f64,
    pub irr_percent: f64,
    pub roi_percent: f64,
    /// Discounted payback, `None` when the investment is never recovered
    pub payback_years: Option<f64>,
    pub viable: bool,
    pub horizon_years: u32,
}

/// Present value of a single cash flow `year` years out
#[inline]
pub fn present_value(cashflow: f64, rate: f64, year: u32) -> f64 {
    cashflow / (1.0 + rate).powi(year as i32)
}

/// NPV of a constant annual flow against an upfront investment
pub fn npv_constant(investment: f64, annual_flow: f64, rate: f64, years: u32) -> f64 {
    let mut npv = -investment;
    for year in 1..=years {
        npv += present_value(annual_flow, rate, year);
    }
    npv
}

/// Internal rate of return for a constant annual flow, in percent
///
/// Newton–Raphson from a 10% seed, at most 100 iterations, stopping when
/// |NPV| falls below 1e-4. A vanishing derivative stops the iteration at the
/// current estimate.
pub fn irr_percent(investment: f64, annual_flow: f64, years: u32) -> f64 {
    let mut irr = IRR_INITIAL_GUESS;

    for _ in 0..IRR_MAX_ITERATIONS {
        let mut npv = -investment;
        let mut derivative = 0.0;

        for year in 1..=years {
            npv += annual_flow / (1.0 + irr).powi(year as i32);
            derivative -= (f64::from(year) * annual_flow) / (1.0 + irr).powi(year as i32 + 1);
        }

        if npv.abs() < IRR_TOLERANCE || derivative == 0.0 {
            break;
        }

        irr -= npv / derivative;
    }

    irr * 100.0
}

/// Simple (undiscounted) payback in years
#[inline]
pub fn payback_simple(investment: f64, annual_flow: f64) -> f64 {
    investment / annual_flow
}

/// Appraise the recovery project over the configured horizon
///
/// Cash flow in year `n`: `revenue × (1-degradation)^n` plus the constant
/// environmental saving, minus `CAPEX × opex_fraction × (1+growth)^n`.
/// IRR solves on the first-year flow held constant over the horizon.
pub fn analyze_project(
    current: &ScenarioResult,
    proposed: &ScenarioResult,
    investment: f64,
    config: &EconomicConfig,
) -> EconomicAnalysis {
    let environmental_saving = current.environmental_cost_usd - proposed.environmental_cost_usd;
    let gas_revenue = proposed
        .recovery
        .map_or(0.0, |recovery| recovery.gas_revenue_usd);
    let opex_base = investment * config.opex_fraction;

    let mut cash_flows = Vec::with_capacity(config.horizon_years as usize);
    let mut npv = -investment;

    for year in 1..=config.horizon_years {
        let degradation = (1.0 - config.efficiency_degradation).powi(year as i32);
        let revenue = gas_revenue * degradation;
        let opex = opex_base * (1.0 + config.opex_growth).powi(year as i32);

        let net = revenue + environmental_saving - opex;
        cash_flows.push(net);
        npv += present_value(net, config.discount_rate, year);
    }

    let irr = irr_percent(
        investment,
        cash_flows.first().copied().unwrap_or(0.0),
        config.horizon_years,
    );

    // Discounted payback with fractional-year interpolation
    let mut payback = None;
    let mut balance = -investment;
    for (index, net) in cash_flows.iter().enumerate() {
        let year = index as u32 + 1;
        let discounted = present_value(*net, config.discount_rate, year);
        balance += discounted;

        if balance > 0.0 {
            let deficit_before = (balance - discounted).abs();
            payback = Some(f64::from(year) - 1.0 + deficit_before / discounted);
            break;
        }
    }

    let roi = if investment == 0.0 {
        0.0
    } else {
        npv / investment * 100.0
    };

    let count = cash_flows.len().max(1) as f64;
    let average_cash_flow = cash_flows.iter().sum::<f64>() / count;

    EconomicAnalysis {
        initial_investment_usd: investment,
        environmental_saving_usd: environmental_saving,
        gas_revenue_usd: gas_revenue,
        opex_base_usd: opex_base,
        cash_flows_usd: cash_flows,
        average_cash_flow_usd: average_cash_flow,
        npv_usd: npv,
        irr_percent: irr,
        roi_percent: roi,
        payback_years: payback,
        viable: npv > 0.0 && irr > 10.0,
        horizon_years: config.horizon_years,
    }
}
