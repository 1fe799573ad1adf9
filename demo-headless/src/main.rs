use clap::Parser;
use flare_recovery_core::core_types::{HpFlare, LpFlare};
use flare_recovery_core::forecast::{run_forecast, ForecastConfig, ModelKind};
use flare_recovery_core::risk::{self, FlareComponents, RiskConfig, RiskPreset};
use flare_recovery_core::scenario::{
    analyze_project, current_scenario, equivalences, proposed_scenario, EconomicConfig,
    EmissionConfig, DEFAULT_INVESTMENT_USD,
};
use flare_recovery_core::validation::validate_parameters;
use flare_recovery_core::{FlowParameters, ReportBundle};

/// Gas recovery scenario comparison demo
#[derive(Parser, Debug)]
#[command(name = "flare-recovery-demo")]
#[command(about = "Flare gas recovery scenario comparison demo", long_about = None)]
struct Args {
    /// HP flare compressor 1 flow in Sm³/d
    #[arg(long, default_value_t = 4000.0)]
    hp1: f64,

    /// HP flare compressor 2 flow in Sm³/d
    #[arg(long, default_value_t = 3975.0)]
    hp2: f64,

    /// LP flare compressor 3 flow in Sm³/d
    #[arg(long, default_value_t = 10000.0)]
    lp3: f64,

    /// LP flare compressor 4 flow in Sm³/d
    #[arg(long, default_value_t = 9925.0)]
    lp4: f64,

    /// Hull vent flow in Sm³/d (non-combustion)
    #[arg(long, default_value_t = 40000.0)]
    hull: f64,

    /// Recovery efficiency (0-1)
    #[arg(short, long, default_value_t = 0.85)]
    efficiency: f64,

    /// Initial investment in USD
    #[arg(short, long, default_value_t = DEFAULT_INVESTMENT_USD)]
    investment: f64,

    /// Monte Carlo iterations (1000-50000)
    #[arg(long, default_value_t = 10000)]
    iterations: usize,

    /// Risk outlook preset (optimistic, moderate, pessimistic)
    #[arg(short, long, default_value = "moderate")]
    preset: String,

    /// Forecast model (rf, knn)
    #[arg(short, long, default_value = "rf")]
    model: String,

    /// Seed for reproducible simulation runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the scenario report bundle to this JSON file
    #[arg(long)]
    json: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    println!("=== Flare Gas Recovery Demo ===\n");

    let params = FlowParameters {
        hp_flare: HpFlare {
            comp1: args.hp1,
            comp2: args.hp2,
        },
        lp_flare: LpFlare {
            comp3: args.lp3,
            comp4: args.lp4,
        },
        hull_vent_sm3d: args.hull,
        ..FlowParameters::default()
    };

    let (params, issues) = validate_parameters(&params);
    for issue in &issues {
        println!("warning: {} ({})", issue.message, issue.field);
    }

    println!(
        "Flows: HP {:.0} + LP {:.0} = {:.0} Sm³/d flared, hull vent {:.0} Sm³/d",
        params.total_hp(),
        params.total_lp(),
        params.total_flaring(),
        params.hull_vent_sm3d
    );

    // Scenario comparison
    let emission_config = EmissionConfig::default();
    let economic_config = EconomicConfig::default();
    let current = current_scenario(&params, &emission_config);
    let proposed = proposed_scenario(&params, args.efficiency, &emission_config);

    println!("\n--- Emissions ---");
    println!(
        "Current:  {:.2} tCO₂eq/yr ({:.0} USD/yr environmental cost)",
        current.emissions_total, current.environmental_cost_usd
    );
    println!(
        "Proposed: {:.2} tCO₂eq/yr at {:.0}% recovery",
        proposed.emissions_total,
        args.efficiency * 100.0
    );
    if let Some(recovery) = proposed.recovery {
        println!(
            "Recovered {:.0} Sm³/d worth {:.0} USD/yr",
            recovery.recovered_flow_sm3d, recovery.gas_revenue_usd
        );
    }

    let eq = equivalences(current.emissions_total - proposed.emissions_total);
    println!(
        "Avoided emissions equal {:.0} cars, {:.0} trees, {:.0} houses per year",
        eq.cars, eq.trees, eq.houses
    );

    // Economics
    let analysis = analyze_project(&current, &proposed, args.investment, &economic_config);
    println!("\n--- Economics ({} years) ---", analysis.horizon_years);
    println!("NPV:     {:.0} USD", analysis.npv_usd);
    println!("IRR:     {:.1} %", analysis.irr_percent);
    println!("ROI:     {:.1} %", analysis.roi_percent);
    if let Some(payback) = analysis.payback_years {
        println!("Payback: {payback:.2} years (discounted)");
    } else {
        println!("Payback: not recovered within the horizon");
    }
    println!(
        "Verdict: {}",
        if analysis.viable { "viable" } else { "not viable" }
    );

    // Monte Carlo risk
    let preset = match args.preset.to_lowercase().as_str() {
        "optimistic" => RiskPreset::Optimistic,
        "pessimistic" => RiskPreset::Pessimistic,
        "moderate" => RiskPreset::Moderate,
        other => {
            println!("Unknown preset '{other}', using moderate");
            RiskPreset::Moderate
        }
    };
    let risk_config = RiskConfig {
        iterations: args.iterations,
        seed: args.seed,
        ..RiskConfig::for_preset(preset)
    };
    let run = risk::run(&FlareComponents::from(&params), &risk_config);

    println!("\n--- Risk ({} trials, {:?}) ---", run.iterations, preset);
    println!(
        "Total flaring: mean {:.0} ± {:.0} Sm³/d",
        run.total_flaring.stats.mean, run.total_flaring.stats.std_dev
    );
    println!(
        "90% interval:  [{:.0}, {:.0}] Sm³/d",
        run.confidence_90.0, run.confidence_90.1
    );
    println!(
        "P(> {:.0} Sm³/d) = {:.1} %, CV = {:.1} %",
        run.threshold_sm3d,
        run.exceedance_probability * 100.0,
        run.coefficient_of_variation * 100.0
    );

    // Forecast
    let model = match args.model.to_lowercase().as_str() {
        "knn" => ModelKind::Knn,
        "rf" => ModelKind::RandomForest,
        other => {
            println!("Unknown model '{other}', using random forest");
            ModelKind::RandomForest
        }
    };
    let forecast_config = ForecastConfig {
        model,
        seed: args.seed,
        ..ForecastConfig::default()
    };

    println!("\n--- Forecast ({model}) ---");
    match run_forecast(&params, &forecast_config) {
        Ok(result) => {
            println!(
                "Validation: MAE {:.0}, RMSE {:.0}, R² {:.3}",
                result.metrics.mae, result.metrics.rmse, result.metrics.r2
            );
            for (current_point, proposed_point) in result
                .predicted_current
                .iter()
                .zip(&result.predicted_proposed)
            {
                println!(
                    "Month +{}: current {:.0} Sm³/d, proposed {:.0} Sm³/d",
                    current_point.month, current_point.flaring_sm3d, proposed_point.flaring_sm3d
                );
            }
        }
        Err(error) => println!("Forecast unavailable: {error}"),
    }

    // Export
    if let Some(path) = args.json {
        let bundle = ReportBundle::assemble(
            &params,
            args.efficiency,
            args.investment,
            &emission_config,
            &economic_config,
        );
        match bundle.save(&path) {
            Ok(()) => println!("\nReport written to {path}"),
            Err(error) => println!("\nFailed to write report: {error}"),
        }
    }
}
