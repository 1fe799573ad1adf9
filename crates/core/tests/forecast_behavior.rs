//! Behavioral validation of the forecasting engine
use flare_recovery_core::forecast::{run_forecast, ForecastConfig, ModelKind};
use flare_recovery_core::FlowParameters;

/// Proposed-system residual fraction of today's flaring
const TARGET_FRACTION: f64 = 0.09;

fn seeded(model: ModelKind, seed: u64) -> ForecastConfig {
    ForecastConfig {
        model,
        seed: Some(seed),
        ..ForecastConfig::default()
    }
}

#[test]
fn test_all_forecast_values_non_negative() {
    let params = FlowParameters::default();
    for model in [ModelKind::RandomForest, ModelKind::Knn] {
        for seed in [1, 42, 20240601] {
            let result = run_forecast(&params, &seeded(model, seed)).unwrap();
            for point in result
                .predicted_current
                .iter()
                .chain(&result.predicted_proposed)
            {
                assert!(
                    point.flaring_sm3d >= 0.0,
                    "{model:?} seed {seed} produced a negative forecast"
                );
            }
        }
    }
}

#[test]
fn test_proposed_trajectory_ramps_to_target() {
    let params = FlowParameters::default();
    let result = run_forecast(&params, &seeded(ModelKind::RandomForest, 7)).unwrap();

    let current_level = result.historical.last().unwrap().flaring_sm3d;
    let target = current_level * TARGET_FRACTION;

    // Month 3 ends the implementation ramp at the target, up to the ramp
    // jitter of ±0.5% of the pre-recovery level
    let month3 = result.predicted_proposed[2].flaring_sm3d;
    assert!(
        (month3 - target).abs() <= current_level * 0.0051,
        "month 3 value {month3:.0} misses target {target:.0}"
    );

    // Hold phase stays inside the jittered band around the target
    for point in &result.predicted_proposed[3..] {
        let deviation = (point.flaring_sm3d - target).abs() / target;
        assert!(
            deviation <= 0.05,
            "month {} strays {:.1}% from the hold level",
            point.month,
            deviation * 100.0
        );
        assert!(point.flaring_sm3d >= target * 0.95 - 1e-9);
    }
}

#[test]
fn test_proposed_trajectory_descends_through_the_ramp() {
    let params = FlowParameters::default();
    let result = run_forecast(&params, &seeded(ModelKind::Knn, 11)).unwrap();

    let current_level = result.historical.last().unwrap().flaring_sm3d;
    let ramp = &result.predicted_proposed[..3];
    assert!(ramp[0].flaring_sm3d < current_level);
    assert!(ramp[1].flaring_sm3d < ramp[0].flaring_sm3d);
    assert!(ramp[2].flaring_sm3d < ramp[1].flaring_sm3d);
}

#[test]
fn test_current_trajectory_stays_near_operating_level() {
    // The autoregressive forecast extrapolates a roughly flat series: it
    // must stay within a generous band of the historical level, not decay
    // to zero or blow up
    let params = FlowParameters::default();
    for model in [ModelKind::RandomForest, ModelKind::Knn] {
        let result = run_forecast(&params, &seeded(model, 3)).unwrap();
        let level = result.historical.last().unwrap().flaring_sm3d;
        for point in &result.predicted_current {
            assert!(
                point.flaring_sm3d > level * 0.5 && point.flaring_sm3d < level * 1.5,
                "{model:?} forecast {:.0} far from level {level:.0}",
                point.flaring_sm3d
            );
        }
    }
}

#[test]
fn test_validation_metrics_are_sane() {
    let params = FlowParameters::default();
    for model in [ModelKind::RandomForest, ModelKind::Knn] {
        let result = run_forecast(&params, &seeded(model, 17)).unwrap();
        let level = result.historical.last().unwrap().flaring_sm3d;
        assert!(result.metrics.mae >= 0.0);
        assert!(result.metrics.rmse >= result.metrics.mae);
        assert!(result.metrics.r2 <= 1.0);
        // Errors should be a fraction of the operating level for a series
        // this regular
        assert!(
            result.metrics.rmse < level * 0.5,
            "{model:?} rmse {:.0} vs level {level:.0}",
            result.metrics.rmse
        );
    }
}

#[test]
fn test_forecast_scales_with_operating_point() {
    let small = FlowParameters::default();
    let mut large = FlowParameters::default();
    large.hp_flare.comp1 *= 3.0;
    large.hp_flare.comp2 *= 3.0;
    large.lp_flare.comp3 *= 3.0;
    large.lp_flare.comp4 *= 3.0;

    let config = seeded(ModelKind::RandomForest, 23);
    let small_run = run_forecast(&small, &config).unwrap();
    let large_run = run_forecast(&large, &config).unwrap();

    let small_level = small_run.historical.last().unwrap().flaring_sm3d;
    let large_level = large_run.historical.last().unwrap().flaring_sm3d;
    assert!(large_level > small_level * 2.0);

    let small_target = small_run.predicted_proposed[5].flaring_sm3d;
    let large_target = large_run.predicted_proposed[5].flaring_sm3d;
    assert!(large_target > small_target * 2.0);
}
