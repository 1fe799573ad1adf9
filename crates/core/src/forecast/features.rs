//! Feature pipeline shared by both regressors
//!
//! Each training row looks back `lookback` months: the raw lagged values,
//! their moving average, the deviation of the latest value from that
//! average, the normalized calendar month, and the trend position. Features
//! are z-scored with training-set statistics before they reach a model.

use crate::forecast::history::HistoryPoint;
use nalgebra::DVector;

/// Supervised dataset derived from a history window
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Vec<DVector<f64>>,
    pub targets: Vec<f64>,
}

/// Assemble one feature vector from the lookback window
///
/// `recent` holds the last `lookback` flaring values, oldest first.
pub fn feature_vector(recent: &[f64], month_of_year: usize, trend: f64) -> DVector<f64> {
    let moving_average = recent.iter().sum::<f64>() / recent.len() as f64;
    let latest = recent[recent.len() - 1];

    let mut values = Vec::with_capacity(recent.len() + 4);
    values.extend_from_slice(recent);
    values.push(moving_average);
    values.push(latest - moving_average);
    values.push(month_of_year as f64 / 11.0);
    values.push(trend);
    DVector::from_vec(values)
}

/// Build the supervised dataset: month `i` is predicted from months
/// `i-lookback .. i`
pub fn build_dataset(history: &[HistoryPoint], lookback: usize) -> Dataset {
    let mut features = Vec::new();
    let mut targets = Vec::new();

    for i in lookback..history.len() {
        let recent: Vec<f64> = history[i - lookback..i]
            .iter()
            .map(|p| p.flaring_sm3d)
            .collect();
        features.push(feature_vector(
            &recent,
            history[i].month_of_year,
            history[i].trend,
        ));
        targets.push(history[i].flaring_sm3d);
    }

    Dataset { features, targets }
}

/// Z-score standardizer fitted on training features
///
/// A zero standard deviation is replaced by 1 so constant features pass
/// through unscaled instead of dividing by zero.
#[derive(Debug, Clone)]
pub struct Standardizer {
    means: DVector<f64>,
    stds: DVector<f64>,
}

impl Standardizer {
    /// Fit on a non-empty feature set; `None` when there is nothing to fit
    pub fn fit(features: &[DVector<f64>]) -> Option<Self> {
        let first = features.first()?;
        let dims = first.len();
        let n = features.len() as f64;

        let mut means = DVector::zeros(dims);
        for row in features {
            means += row;
        }
        means /= n;

        let mut stds = DVector::zeros(dims);
        for row in features {
            let delta = row - &means;
            stds += delta.component_mul(&delta);
        }
        stds /= n;
        for value in stds.iter_mut() {
            *value = value.sqrt();
            if *value == 0.0 {
                *value = 1.0;
            }
        }

        Some(Self { means, stds })
    }

    /// Standardize one feature vector
    pub fn transform(&self, features: &DVector<f64>) -> DVector<f64> {
        (features - &self.means).component_div(&self.stds)
    }

    /// Standardize a whole feature set
    pub fn transform_all(&self, features: &[DVector<f64>]) -> Vec<DVector<f64>> {
        features.iter().map(|row| self.transform(row)).collect()
    }
}
