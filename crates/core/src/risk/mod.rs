//! Monte Carlo risk simulation of flaring volumes
//!
//! Samples the four flare components independently around their nominal
//! flows (normal distribution via the Box–Muller transform, truncated at
//! zero), aggregates each trial to a total flaring volume and an annual
//! emission figure, and summarizes the resulting distributions.
//!
//! Trials are independent, so they run in parallel; each trial derives its
//! own RNG stream from the run seed, which makes a seeded run reproducible
//! regardless of thread scheduling.

pub mod stats;

pub use stats::{summarize, SeriesSummary};

use crate::core_types::FlowParameters;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::{debug, info};

/// Combustion emission factor, matching the scenario calculators
/// (2.75 kg CO₂eq per Sm³ flared)
const EMISSION_FACTOR_T_PER_SM3: f64 = 0.00275; // tCO₂eq/Sm³

/// Operating days per year
const OPERATING_DAYS: f64 = 365.0;

/// Regulatory flaring limit used for exceedance probability (Sm³/d)
const DEFAULT_THRESHOLD_SM3D: f64 = 61_000.0;

/// Iteration bounds exposed by the run selector
const MIN_ITERATIONS: usize = 1_000;
const MAX_ITERATIONS: usize = 50_000;

/// Nominal flows of the four flare components (Sm³/d)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlareComponents {
    pub hp1: f64,
    pub hp2: f64,
    pub lp1: f64,
    pub lp2: f64,
}

impl FlareComponents {
    /// Sum of the component flows (Sm³/d)
    #[inline]
    pub fn total(&self) -> f64 {
        self.hp1 + self.hp2 + self.lp1 + self.lp2
    }

    fn scaled(&self, multiplier: f64) -> Self {
        Self {
            hp1: self.hp1 * multiplier,
            hp2: self.hp2 * multiplier,
            lp1: self.lp1 * multiplier,
            lp2: self.lp2 * multiplier,
        }
    }
}

impl From<&FlowParameters> for FlareComponents {
    fn from(params: &FlowParameters) -> Self {
        Self {
            hp1: params.hp_flare.comp1,
            hp2: params.hp_flare.comp2,
            lp1: params.lp_flare.comp3,
            lp2: params.lp_flare.comp4,
        }
    }
}

/// Operational outlook presets scaling the nominal flows and their spread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RiskPreset {
    /// Flows 15% below nominal, tight spread
    Optimistic,
    /// Nominal flows, typical spread
    #[default]
    Moderate,
    /// Flows 15% above nominal, wide spread
    Pessimistic,
}

impl RiskPreset {
    /// Multiplier applied to every component mean
    pub fn flow_multiplier(self) -> f64 {
        match self {
            RiskPreset::Optimistic => 0.85,
            RiskPreset::Moderate => 1.0,
            RiskPreset::Pessimistic => 1.15,
        }
    }

    /// Per-component standard deviation as a fraction of the mean
    pub fn variability(self) -> f64 {
        match self {
            RiskPreset::Optimistic => 0.10,
            RiskPreset::Moderate => 0.15,
            RiskPreset::Pessimistic => 0.25,
        }
    }
}

/// Run parameters for one simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Trial count, clamped to [1000, 50000]
    pub iterations: usize,
    /// Multiplier applied to the component means before sampling
    pub base_multiplier: f64,
    /// Std-dev of each component as a fraction of its mean
    pub variability: f64,
    /// Exceedance threshold on total flaring (Sm³/d)
    pub threshold_sm3d: f64,
    /// Fixed seed for reproducible runs; `None` draws a fresh one
    pub seed: Option<u64>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            base_multiplier: 1.0,
            variability: 0.15,
            threshold_sm3d: DEFAULT_THRESHOLD_SM3D,
            seed: None,
        }
    }
}

impl RiskConfig {
    /// Config for an outlook preset at the default iteration count
    pub fn for_preset(preset: RiskPreset) -> Self {
        Self {
            base_multiplier: preset.flow_multiplier(),
            variability: preset.variability(),
            ..Self::default()
        }
    }
}

/// One sampled series with its distribution summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSamples {
    pub samples: Vec<f64>,
    pub stats: SeriesSummary,
}

impl SeriesSamples {
    fn new(samples: Vec<f64>) -> Self {
        let stats = summarize(&samples);
        Self { samples, stats }
    }
}

/// Complete output of one Monte Carlo run
///
/// A new run replaces the previous one; nothing here is retained across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRun {
    pub iterations: usize,
    pub base_multiplier: f64,
    pub variability: f64,
    pub threshold_sm3d: f64,
    /// Seed the trial streams were derived from
    pub seed: u64,
    pub hp1: SeriesSamples,
    pub hp2: SeriesSamples,
    pub lp1: SeriesSamples,
    pub lp2: SeriesSamples,
    pub total_flaring: SeriesSamples,
    /// Annual emissions per trial (tCO₂eq/yr)
    pub emissions: SeriesSamples,
    /// Probability that total flaring exceeds the threshold
    pub exceedance_probability: f64,
    /// 90% confidence interval on total flaring, [p5, p95]
    pub confidence_90: (f64, f64),
    /// Std-dev over mean of total flaring, 0 when the mean is 0
    pub coefficient_of_variation: f64,
}

/// Draw a normal sample via Box–Muller
///
/// `u1` is shifted into (0, 1] so the logarithm stays finite.
fn normal_sample<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
    mean + z * std_dev
}

fn sample_component<R: Rng + ?Sized>(rng: &mut R, base: f64, variability: f64) -> f64 {
    normal_sample(rng, base, base * variability).max(0.0)
}

/// Run the simulation for the given component bases
pub fn run(base: &FlareComponents, config: &RiskConfig) -> RiskRun {
    let iterations = config.iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS);
    if iterations != config.iterations {
        debug!(
            requested = config.iterations,
            clamped = iterations,
            "iteration count clamped to supported range"
        );
    }

    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let scaled = base.scaled(config.base_multiplier);
    let variability = config.variability;

    info!(
        iterations,
        variability,
        base_total = scaled.total(),
        "running monte carlo risk simulation"
    );

    let trials: Vec<[f64; 6]> = (0..iterations)
        .into_par_iter()
        .map(|trial| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(trial as u64));
            let hp1 = sample_component(&mut rng, scaled.hp1, variability);
            let hp2 = sample_component(&mut rng, scaled.hp2, variability);
            let lp1 = sample_component(&mut rng, scaled.lp1, variability);
            let lp2 = sample_component(&mut rng, scaled.lp2, variability);
            let total = hp1 + hp2 + lp1 + lp2;
            let emissions = total * OPERATING_DAYS * EMISSION_FACTOR_T_PER_SM3;
            [hp1, hp2, lp1, lp2, total, emissions]
        })
        .collect();

    let column = |index: usize| trials.iter().map(|t| t[index]).collect::<Vec<f64>>();

    let total_samples = column(4);
    let exceeded = total_samples
        .iter()
        .filter(|&&t| t > config.threshold_sm3d)
        .count();
    let exceedance_probability = exceeded as f64 / iterations as f64;

    let total_flaring = SeriesSamples::new(total_samples);
    let coefficient_of_variation = if total_flaring.stats.mean == 0.0 {
        0.0
    } else {
        total_flaring.stats.std_dev / total_flaring.stats.mean
    };
    let confidence_90 = (total_flaring.stats.p5, total_flaring.stats.p95);

    RiskRun {
        iterations,
        base_multiplier: config.base_multiplier,
        variability,
        threshold_sm3d: config.threshold_sm3d,
        seed,
        hp1: SeriesSamples::new(column(0)),
        hp2: SeriesSamples::new(column(1)),
        lp1: SeriesSamples::new(column(2)),
        lp2: SeriesSamples::new(column(3)),
        total_flaring,
        emissions: SeriesSamples::new(column(5)),
        exceedance_probability,
        confidence_90,
        coefficient_of_variation,
    }
}
