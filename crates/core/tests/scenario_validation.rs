//! End-to-end validation of the deterministic scenario pipeline
use approx::assert_relative_eq;
use flare_recovery_core::core_types::{HpFlare, LpFlare};
use flare_recovery_core::scenario::{
    analyze_project, current_scenario, equivalences, proposed_scenario, EconomicConfig,
    EmissionConfig, DEFAULT_INVESTMENT_USD,
};
use flare_recovery_core::validation::validate_parameters;
use flare_recovery_core::{FlowParameters, ReportBundle};

fn reference_params() -> FlowParameters {
    // 27 900 Sm³/d LP, 40 000 Sm³/d HP
    FlowParameters {
        hp_flare: HpFlare {
            comp1: 20000.0,
            comp2: 20000.0,
        },
        lp_flare: LpFlare {
            comp3: 14000.0,
            comp4: 13900.0,
        },
        ..FlowParameters::default()
    }
}

#[test]
fn test_reference_case_emissions() {
    let params = reference_params();
    assert_eq!(params.total_lp(), 27900.0);
    assert_eq!(params.total_hp(), 40000.0);

    let current = current_scenario(&params, &EmissionConfig::default());
    // (27 900 + 40 000) × 365 × 0.00275
    assert_relative_eq!(current.emissions_total, 68108.75, epsilon = 1e-9);
    assert_relative_eq!(
        current.emissions_total,
        current.emissions_lp_flare + current.emissions_hp_flare,
        epsilon = 1e-12
    );
    assert_eq!(current.emissions_hull, 0.0);
}

#[test]
fn test_reference_case_equivalences() {
    let eq = equivalences(68108.75);
    // 68 108.75 / 4.6 ≈ 14 806 cars
    assert!((eq.cars - 14806.25).abs() < 0.01);
    assert!(eq.trees > eq.cars);
    assert!(eq.houses < eq.cars);
}

#[test]
fn test_recovery_strictly_improves_and_degenerates_cleanly() {
    let params = reference_params();
    let config = EmissionConfig::default();
    let current = current_scenario(&params, &config);

    let mut previous_total = current.emissions_total;
    for efficiency in [0.25, 0.5, 0.75, 0.95] {
        let proposed = proposed_scenario(&params, efficiency, &config);
        assert!(proposed.emissions_total < previous_total);
        previous_total = proposed.emissions_total;
    }

    let untouched = proposed_scenario(&params, 0.0, &config);
    assert_relative_eq!(
        untouched.emissions_total,
        current.emissions_total,
        epsilon = 1e-9
    );
}

#[test]
fn test_validated_pipeline_end_to_end() {
    let mut raw = reference_params();
    raw.compressors.blower.pressure_bar = 450.0; // above the 300 bar limit

    let (params, issues) = validate_parameters(&raw);
    assert_eq!(issues.len(), 1);
    assert_eq!(params.compressors.blower.pressure_bar, 300.0);

    let bundle = ReportBundle::assemble(
        &params,
        0.85,
        DEFAULT_INVESTMENT_USD,
        &EmissionConfig::default(),
        &EconomicConfig::default(),
    );
    assert!(bundle.economics.viable);
    assert!(bundle.economics.npv_usd > 0.0);

    // The bundle serializes as a plain record for the export collaborators
    let json = bundle.to_json().unwrap();
    assert!(json.contains("\"emissions_total\""));
    assert!(json.contains("\"npv_usd\""));
}

#[test]
fn test_breakeven_npv_without_cash_flows() {
    use flare_recovery_core::scenario::npv_constant;
    // No improvement and no revenue: NPV is exactly the lost investment
    assert_relative_eq!(
        npv_constant(DEFAULT_INVESTMENT_USD, 0.0, 0.10, 10),
        -DEFAULT_INVESTMENT_USD,
        epsilon = 1e-9
    );
}

#[test]
fn test_no_improvement_project_never_pays_back() {
    let params = reference_params();
    let config = EmissionConfig::default();
    let current = current_scenario(&params, &config);

    let mut proposed = proposed_scenario(&params, 0.0, &config);
    proposed.recovery = None; // no revenue stream at all

    let analysis = analyze_project(
        &current,
        &proposed,
        DEFAULT_INVESTMENT_USD,
        &EconomicConfig::default(),
    );
    assert!(analysis.npv_usd <= -DEFAULT_INVESTMENT_USD);
    assert!(analysis.payback_years.is_none());
    assert!(!analysis.viable);
}
