//! Bootstrap ensemble of regression trees
//!
//! Each tree trains on a with-replacement resample of the training rows.
//! Resample indices are drawn sequentially from the forest's own seeded RNG,
//! then the trees fit in parallel, so a seeded forest is reproducible
//! regardless of thread scheduling.

use super::tree::DecisionTree;
use super::ForecastError;
use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Random forest regressor
#[derive(Debug)]
pub struct RandomForest {
    num_trees: usize,
    max_depth: usize,
    min_samples_split: usize,
    rng: StdRng,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(num_trees: usize, max_depth: usize, min_samples_split: usize, seed: u64) -> Self {
        Self {
            num_trees,
            max_depth,
            min_samples_split,
            rng: StdRng::seed_from_u64(seed),
            trees: Vec::new(),
        }
    }

    /// Fit all trees on bootstrap resamples of the training rows
    ///
    /// # Errors
    /// Returns [`ForecastError::EmptyTrainingSplit`] when no rows are given.
    pub fn fit(
        &mut self,
        features: &[DVector<f64>],
        targets: &[f64],
    ) -> Result<(), ForecastError> {
        let n = features.len();
        if n == 0 || targets.len() != n {
            return Err(ForecastError::EmptyTrainingSplit);
        }

        let bootstraps: Vec<Vec<usize>> = (0..self.num_trees)
            .map(|_| (0..n).map(|_| self.rng.random_range(0..n)).collect())
            .collect();

        let max_depth = self.max_depth;
        let min_samples_split = self.min_samples_split;
        self.trees = bootstraps
            .into_par_iter()
            .map(|indices| {
                let sample_features: Vec<DVector<f64>> =
                    indices.iter().map(|&i| features[i].clone()).collect();
                let sample_targets: Vec<f64> = indices.iter().map(|&i| targets[i]).collect();

                let mut tree = DecisionTree::new(max_depth, min_samples_split);
                // Bootstrap samples are non-empty whenever n > 0
                tree.fit(&sample_features, &sample_targets)
                    .map(|()| tree)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(())
    }

    /// Average of the individual tree predictions
    pub fn predict(&self, features: &DVector<f64>) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        sum / self.trees.len() as f64
    }
}
