//! Flaring volume forecasting with from-scratch regressors
//!
//! Trains a small regression model (random forest or KNN) on synthetic
//! monthly history and projects the next months for two trajectories:
//!
//! - **current**: autoregressive — the model predicts month `n+1` from a
//!   rolling window of its own previous outputs
//! - **proposed**: a scripted intervention, not a statistical projection —
//!   a linear ramp down to 9% of today's flaring over the three
//!   implementation months, then a jittered hold at that level
//!
//! The asymmetry is deliberate: the proposed curve describes a planned
//! commissioning schedule, which no amount of history can predict.

pub mod features;
pub mod forest;
pub mod history;
pub mod knn;
pub mod metrics;
pub mod tree;

pub use features::{build_dataset, feature_vector, Dataset, Standardizer};
pub use forest::RandomForest;
pub use history::{synthetic_history, HistoryPoint};
pub use knn::KnnRegressor;
pub use metrics::{validation_metrics, ValidationMetrics};
pub use tree::DecisionTree;

use crate::core_types::FlowParameters;
use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Forest size
const NUM_TREES: usize = 10;
/// Tree depth limit
const TREE_MAX_DEPTH: usize = 4;
/// Minimum rows for a tree node to split
const MIN_SAMPLES_SPLIT: usize = 2;
/// Neighbor count for the KNN model
const NEIGHBORS: usize = 3;
/// Chronological train share of the dataset
const TRAIN_FRACTION: f64 = 0.7;

/// Proposed-system residual as a fraction of today's flaring (91% reduction)
const REDUCTION_TARGET_FRACTION: f64 = 0.09;
/// Months to commission the recovery system
const IMPLEMENTATION_MONTHS: usize = 3;
/// Ramp-phase jitter as a fraction of today's flaring (±0.5%)
const RAMP_JITTER: f64 = 0.01;
/// Hold-phase jitter as a fraction of the target level (±2.5%)
const HOLD_JITTER: f64 = 0.05;
/// Hard floor under the proposed trajectory, relative to the target
const TARGET_FLOOR: f64 = 0.95;
/// Trend drift assumed over the forecast horizon
const HORIZON_TREND_DRIFT: f64 = 0.03;

/// Which regressor backs the forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelKind {
    #[default]
    RandomForest,
    Knn,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::RandomForest => write!(f, "Random Forest"),
            ModelKind::Knn => write!(f, "K-Nearest Neighbors"),
        }
    }
}

/// Forecast run parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub model: ModelKind,
    /// Synthetic history length in months
    pub history_months: usize,
    /// Forecast horizon in months
    pub horizon_months: usize,
    /// Lagged months per feature row
    pub lookback: usize,
    /// Calendar month (0-11) of the first historical point
    pub start_month: usize,
    /// Fixed seed for reproducible runs; `None` draws a fresh one
    pub seed: Option<u64>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            model: ModelKind::RandomForest,
            history_months: 48,
            horizon_months: 6,
            lookback: 3,
            start_month: 0,
            seed: None,
        }
    }
}

/// Forecasting failure; no partial output is produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForecastError {
    /// History shorter than the lookback window allows
    HistoryTooShort { points: usize, lookback: usize },
    /// Chronological split left nothing to train on
    EmptyTrainingSplit,
    /// KNN needs at least `k` training rows
    NotEnoughNeighbors { k: usize, samples: usize },
}

impl fmt::Display for ForecastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastError::HistoryTooShort { points, lookback } => write!(
                f,
                "history of {points} points is too short for a lookback of {lookback}"
            ),
            ForecastError::EmptyTrainingSplit => {
                write!(f, "chronological split produced an empty training set")
            }
            ForecastError::NotEnoughNeighbors { k, samples } => {
                write!(f, "k={k} neighbors requested but only {samples} rows fitted")
            }
        }
    }
}

impl std::error::Error for ForecastError {}

/// Common contract for the interchangeable regressors
pub trait Regressor: Send {
    /// Fit on standardized features
    ///
    /// # Errors
    /// Returns a [`ForecastError`] when the training rows cannot back a model.
    fn fit(&mut self, features: &[DVector<f64>], targets: &[f64]) -> Result<(), ForecastError>;

    /// Predict the target for one standardized feature vector
    fn predict(&self, features: &DVector<f64>) -> f64;
}

impl Regressor for RandomForest {
    fn fit(&mut self, features: &[DVector<f64>], targets: &[f64]) -> Result<(), ForecastError> {
        RandomForest::fit(self, features, targets)
    }

    fn predict(&self, features: &DVector<f64>) -> f64 {
        RandomForest::predict(self, features)
    }
}

impl Regressor for KnnRegressor {
    fn fit(&mut self, features: &[DVector<f64>], targets: &[f64]) -> Result<(), ForecastError> {
        KnnRegressor::fit(self, features, targets)
    }

    fn predict(&self, features: &DVector<f64>) -> f64 {
        KnnRegressor::predict(self, features)
    }
}

/// One forecast month (month 1 is the first month after the history)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: i64,
    pub flaring_sm3d: f64,
}

/// Complete forecast output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub model: ModelKind,
    /// Seed the run was derived from
    pub seed: u64,
    pub historical: Vec<HistoryPoint>,
    /// Model-driven trajectory without recovery
    pub predicted_current: Vec<ForecastPoint>,
    /// Scripted trajectory with the recovery system commissioned
    pub predicted_proposed: Vec<ForecastPoint>,
    pub metrics: ValidationMetrics,
}

/// Train the configured model and forecast both trajectories
///
/// # Errors
/// Returns a [`ForecastError`] when the configuration leaves nothing to
/// train on; no partial result is produced.
pub fn run_forecast(
    params: &FlowParameters,
    config: &ForecastConfig,
) -> Result<ForecastResult, ForecastError> {
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);

    let base = params.total_flaring();
    let history = synthetic_history(base, config.history_months, config.start_month, &mut rng);

    let dataset = build_dataset(&history, config.lookback);
    if dataset.features.is_empty() {
        return Err(ForecastError::HistoryTooShort {
            points: history.len(),
            lookback: config.lookback,
        });
    }

    // Chronological split: the validation slice is strictly later in time
    let split = (dataset.features.len() as f64 * TRAIN_FRACTION).floor() as usize;
    if split == 0 {
        return Err(ForecastError::EmptyTrainingSplit);
    }

    let standardizer =
        Standardizer::fit(&dataset.features[..split]).ok_or(ForecastError::EmptyTrainingSplit)?;
    let train_features = standardizer.transform_all(&dataset.features[..split]);

    let mut model: Box<dyn Regressor> = match config.model {
        ModelKind::RandomForest => Box::new(RandomForest::new(
            NUM_TREES,
            TREE_MAX_DEPTH,
            MIN_SAMPLES_SPLIT,
            seed.wrapping_add(1),
        )),
        ModelKind::Knn => Box::new(KnnRegressor::new(NEIGHBORS)),
    };
    model.fit(&train_features, &dataset.targets[..split])?;

    let validation_features = standardizer.transform_all(&dataset.features[split..]);
    let predictions: Vec<f64> = validation_features
        .iter()
        .map(|row| model.predict(row))
        .collect();
    let metrics = validation_metrics(&dataset.targets[split..], &predictions);
    info!(
        model = %config.model,
        mae = metrics.mae,
        rmse = metrics.rmse,
        r2 = metrics.r2,
        "forecast model validated"
    );

    // history is non-empty here: the dataset has at least one row
    let last = history[history.len() - 1];
    let current_level = last.flaring_sm3d;
    let target = current_level * REDUCTION_TARGET_FRACTION;

    let mut window: Vec<f64> = history[history.len() - config.lookback..]
        .iter()
        .map(|p| p.flaring_sm3d)
        .collect();

    let mut predicted_current = Vec::with_capacity(config.horizon_months);
    let mut predicted_proposed = Vec::with_capacity(config.horizon_months);

    for step in 0..config.horizon_months {
        let month = step as i64 + 1;
        let month_of_year = (last.month_of_year + step + 1) % 12;
        let trend = 1.0 + (step as f64 / config.horizon_months as f64) * HORIZON_TREND_DRIFT;

        let features = feature_vector(&window, month_of_year, trend);
        let prediction = model.predict(&standardizer.transform(&features));
        predicted_current.push(ForecastPoint {
            month,
            flaring_sm3d: prediction.max(0.0),
        });
        // The rolling window keeps the raw model output
        window.remove(0);
        window.push(prediction);

        let proposed = if step < IMPLEMENTATION_MONTHS {
            let progress = (step + 1) as f64 / IMPLEMENTATION_MONTHS as f64;
            let ramp = current_level - (current_level - target) * progress;
            ramp + (rng.random::<f64>() - 0.5) * current_level * RAMP_JITTER
        } else {
            target + (rng.random::<f64>() - 0.5) * target * HOLD_JITTER
        };
        predicted_proposed.push(ForecastPoint {
            month,
            flaring_sm3d: proposed.max(target * TARGET_FLOOR),
        });
    }

    debug!(
        horizon = config.horizon_months,
        target_sm3d = target,
        "forward trajectories generated"
    );

    Ok(ForecastResult {
        model: config.model,
        seed,
        historical: history,
        predicted_current,
        predicted_proposed,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_config(model: ModelKind) -> ForecastConfig {
        ForecastConfig {
            model,
            seed: Some(2024),
            ..ForecastConfig::default()
        }
    }

    #[test]
    fn test_forecast_shapes() {
        let params = FlowParameters::default();
        let result = run_forecast(&params, &seeded_config(ModelKind::RandomForest)).unwrap();
        assert_eq!(result.historical.len(), 48);
        assert_eq!(result.predicted_current.len(), 6);
        assert_eq!(result.predicted_proposed.len(), 6);
        assert_eq!(result.predicted_current[0].month, 1);
        assert_eq!(result.predicted_current[5].month, 6);
    }

    #[test]
    fn test_seeded_forecast_is_reproducible() {
        let params = FlowParameters::default();
        let config = seeded_config(ModelKind::RandomForest);
        let a = run_forecast(&params, &config).unwrap();
        let b = run_forecast(&params, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_both_models_produce_output() {
        let params = FlowParameters::default();
        for model in [ModelKind::RandomForest, ModelKind::Knn] {
            let result = run_forecast(&params, &seeded_config(model)).unwrap();
            assert_eq!(result.model, model);
            assert!(result.metrics.mae.is_finite());
            assert!(result.metrics.rmse >= 0.0);
            assert!(result.metrics.r2.is_finite());
        }
    }

    #[test]
    fn test_short_history_is_rejected() {
        let params = FlowParameters::default();
        let config = ForecastConfig {
            history_months: 3,
            seed: Some(1),
            ..ForecastConfig::default()
        };
        let err = run_forecast(&params, &config).unwrap_err();
        assert!(matches!(err, ForecastError::HistoryTooShort { .. }));
    }

    #[test]
    fn test_proposed_trajectory_never_undercuts_floor() {
        let params = FlowParameters::default();
        let result = run_forecast(&params, &seeded_config(ModelKind::Knn)).unwrap();
        let current_level = result.historical[result.historical.len() - 1].flaring_sm3d;
        let floor = current_level * REDUCTION_TARGET_FRACTION * TARGET_FLOOR;
        for point in &result.predicted_proposed {
            assert!(point.flaring_sm3d >= floor - 1e-9);
        }
    }
}
