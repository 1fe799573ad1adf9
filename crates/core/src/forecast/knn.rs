//! K-nearest-neighbor regressor
//!
//! Stores the standardized training rows verbatim; a prediction is the
//! unweighted mean of the `k` nearest training targets by Euclidean
//! distance.

use super::ForecastError;
use nalgebra::DVector;

/// KNN regressor over standardized feature space
#[derive(Debug, Clone)]
pub struct KnnRegressor {
    k: usize,
    features: Vec<DVector<f64>>,
    targets: Vec<f64>,
}

impl KnnRegressor {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            features: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Store the training rows
    ///
    /// # Errors
    /// Returns [`ForecastError::EmptyTrainingSplit`] for an empty set and
    /// [`ForecastError::NotEnoughNeighbors`] when fewer than `k` rows exist.
    pub fn fit(
        &mut self,
        features: &[DVector<f64>],
        targets: &[f64],
    ) -> Result<(), ForecastError> {
        if features.is_empty() || targets.len() != features.len() {
            return Err(ForecastError::EmptyTrainingSplit);
        }
        if features.len() < self.k {
            return Err(ForecastError::NotEnoughNeighbors {
                k: self.k,
                samples: features.len(),
            });
        }
        self.features = features.to_vec();
        self.targets = targets.to_vec();
        Ok(())
    }

    /// Mean of the `k` nearest training targets
    pub fn predict(&self, features: &DVector<f64>) -> f64 {
        if self.features.is_empty() {
            return 0.0;
        }

        let mut neighbors: Vec<(f64, f64)> = self
            .features
            .iter()
            .zip(&self.targets)
            .map(|(row, &target)| ((row - features).norm(), target))
            .collect();
        neighbors.sort_by(|a, b| a.0.total_cmp(&b.0));

        let k = self.k.min(neighbors.len());
        neighbors[..k].iter().map(|(_, target)| target).sum::<f64>() / k as f64
    }
}
