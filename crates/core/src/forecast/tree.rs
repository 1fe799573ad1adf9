//! Regression tree minimizing variance-weighted splits
//!
//! Each node scans every feature exhaustively, testing the midpoints
//! between consecutive sorted unique values and keeping the split with the
//! largest variance reduction. Leaves hold the mean target of their
//! partition.

use super::ForecastError;
use nalgebra::DVector;

/// Tree node: either a leaf value or a binary threshold split
#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Depth-limited regression tree
#[derive(Debug, Clone)]
pub struct DecisionTree {
    max_depth: usize,
    min_samples_split: usize,
    root: Node,
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

fn variance(targets: &[f64], indices: &[usize]) -> f64 {
    let n = indices.len();
    if n == 0 {
        return 0.0;
    }
    let mu = mean(indices.iter().map(|&i| targets[i]), n);
    indices.iter().map(|&i| (targets[i] - mu).powi(2)).sum::<f64>() / n as f64
}

impl DecisionTree {
    pub fn new(max_depth: usize, min_samples_split: usize) -> Self {
        Self {
            max_depth,
            min_samples_split,
            root: Node::Leaf { value: 0.0 },
        }
    }

    /// Fit the tree to (already standardized) features
    ///
    /// # Errors
    /// Returns [`ForecastError::EmptyTrainingSplit`] when no rows are given.
    pub fn fit(
        &mut self,
        features: &[DVector<f64>],
        targets: &[f64],
    ) -> Result<(), ForecastError> {
        if features.is_empty() || targets.is_empty() {
            return Err(ForecastError::EmptyTrainingSplit);
        }
        let indices: Vec<usize> = (0..features.len()).collect();
        self.root = self.build(features, targets, &indices, 0);
        Ok(())
    }

    /// Predict the target for one feature vector
    pub fn predict(&self, features: &DVector<f64>) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    fn build(
        &self,
        features: &[DVector<f64>],
        targets: &[f64],
        indices: &[usize],
        depth: usize,
    ) -> Node {
        let n = indices.len();
        if n < self.min_samples_split || depth >= self.max_depth {
            return Node::Leaf {
                value: mean(indices.iter().map(|&i| targets[i]), n),
            };
        }

        let Some((feature, threshold)) = best_split(features, targets, indices) else {
            return Node::Leaf {
                value: mean(indices.iter().map(|&i| targets[i]), n),
            };
        };

        let (left_indices, right_indices) = partition(features, indices, feature, threshold);
        Node::Split {
            feature,
            threshold,
            left: Box::new(self.build(features, targets, &left_indices, depth + 1)),
            right: Box::new(self.build(features, targets, &right_indices, depth + 1)),
        }
    }
}

fn partition(
    features: &[DVector<f64>],
    indices: &[usize],
    feature: usize,
    threshold: f64,
) -> (Vec<usize>, Vec<usize>) {
    indices
        .iter()
        .copied()
        .partition(|&i| features[i][feature] <= threshold)
}

/// Exhaustive best-split search maximizing variance reduction
fn best_split(
    features: &[DVector<f64>],
    targets: &[f64],
    indices: &[usize],
) -> Option<(usize, f64)> {
    let dims = features[indices[0]].len();
    let parent_variance = variance(targets, indices);

    let mut best: Option<(usize, f64)> = None;
    let mut best_gain = f64::NEG_INFINITY;

    for feature in 0..dims {
        let mut values: Vec<f64> = indices.iter().map(|&i| features[i][feature]).collect();
        values.sort_by(f64::total_cmp);
        values.dedup();

        for pair in values.windows(2) {
            let threshold = f64::midpoint(pair[0], pair[1]);
            let (left, right) = partition(features, indices, feature, threshold);
            if left.is_empty() || right.is_empty() {
                continue;
            }

            let n = indices.len() as f64;
            let weighted = (left.len() as f64 / n) * variance(targets, &left)
                + (right.len() as f64 / n) * variance(targets, &right);
            let gain = parent_variance - weighted;

            if gain > best_gain {
                best_gain = gain;
                best = Some((feature, threshold));
            }
        }
    }

    best
}
