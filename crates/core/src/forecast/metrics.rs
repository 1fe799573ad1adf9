//! Regression validation metrics

use serde::{Deserialize, Serialize};

/// Error metrics on the held-out validation slice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    /// Mean absolute error (Sm³/d)
    pub mae: f64,
    /// Root mean squared error (Sm³/d)
    pub rmse: f64,
    /// Coefficient of determination, 1 − SS_res/SS_tot
    pub r2: f64,
}

/// Compute MAE, RMSE and R² between observed and predicted series
///
/// A zero total sum of squares (constant observations) leaves the R²
/// denominator at 1 instead of dividing by zero.
pub fn validation_metrics(observed: &[f64], predicted: &[f64]) -> ValidationMetrics {
    let n = observed.len().min(predicted.len());
    if n == 0 {
        return ValidationMetrics {
            mae: 0.0,
            rmse: 0.0,
            r2: 0.0,
        };
    }

    let mean = observed[..n].iter().sum::<f64>() / n as f64;
    let mut absolute = 0.0;
    let mut squared = 0.0;
    let mut total_squares = 0.0;

    for i in 0..n {
        let error = observed[i] - predicted[i];
        absolute += error.abs();
        squared += error * error;
        total_squares += (observed[i] - mean).powi(2);
    }

    let mae = absolute / n as f64;
    let mse = squared / n as f64;
    let denominator = if total_squares == 0.0 {
        1.0
    } else {
        total_squares
    };

    ValidationMetrics {
        mae,
        rmse: mse.sqrt(),
        r2: 1.0 - squared / denominator,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_prediction() {
        let observed = [1.0, 2.0, 3.0, 4.0];
        let metrics = validation_metrics(&observed, &observed);
        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.rmse, 0.0);
        assert_relative_eq!(metrics.r2, 1.0);
    }

    #[test]
    fn test_known_errors() {
        let observed = [0.0, 0.0, 0.0, 0.0];
        let predicted = [1.0, -1.0, 1.0, -1.0];
        let metrics = validation_metrics(&observed, &predicted);
        assert_relative_eq!(metrics.mae, 1.0);
        assert_relative_eq!(metrics.rmse, 1.0);
    }

    #[test]
    fn test_constant_observations_guard() {
        // SS_tot is zero; the guard must keep R² finite
        let observed = [5.0, 5.0, 5.0];
        let predicted = [4.0, 5.0, 6.0];
        let metrics = validation_metrics(&observed, &predicted);
        assert!(metrics.r2.is_finite());
    }

    #[test]
    fn test_mean_prediction_scores_zero_r2() {
        let observed = [1.0, 2.0, 3.0];
        let predicted = [2.0, 2.0, 2.0];
        let metrics = validation_metrics(&observed, &predicted);
        assert_relative_eq!(metrics.r2, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_series() {
        let metrics = validation_metrics(&[], &[]);
        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.r2, 0.0);
    }
}
