//! Summary statistics for Monte Carlo sample series

use serde::{Deserialize, Serialize};

/// Distribution summary of one sampled series
///
/// Percentiles use the sorted-sample index `floor(n·p)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

impl SeriesSummary {
    const EMPTY: SeriesSummary = SeriesSummary {
        mean: 0.0,
        std_dev: 0.0,
        min: 0.0,
        max: 0.0,
        p5: 0.0,
        p25: 0.0,
        p50: 0.0,
        p75: 0.0,
        p95: 0.0,
    };
}

/// Summarize a sample series
pub fn summarize(samples: &[f64]) -> SeriesSummary {
    if samples.is_empty() {
        return SeriesSummary::EMPTY;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let variance = sorted.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;

    let percentile = |p: f64| {
        let index = ((n as f64 * p).floor() as usize).min(n - 1);
        sorted[index]
    };

    SeriesSummary {
        mean,
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[n - 1],
        p5: percentile(0.05),
        p25: percentile(0.25),
        p50: percentile(0.50),
        p75: percentile(0.75),
        p95: percentile(0.95),
    }
}
