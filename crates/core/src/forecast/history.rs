//! Synthetic monthly flaring history
//!
//! The dashboard has no metered archive, so model training runs on a
//! synthetic series anchored to the current operating point: a slow upward
//! trend (operation without improvements), yearly seasonality, a shorter
//! operational cycle from turnaround/restart patterns, and uniform noise.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Trend growth per month
const TREND_PER_MONTH: f64 = 0.0008;
/// Yearly seasonal amplitude as a fraction of the base flow
const SEASONAL_AMPLITUDE: f64 = 0.08;
/// Quarterly operational-cycle amplitude as a fraction of the base flow
const OPERATIONAL_AMPLITUDE: f64 = 0.03;
/// Total width of the uniform noise band (±2%)
const NOISE_BAND: f64 = 0.04;
/// Level adjustment applied to the composed signal
const LEVEL_FACTOR: f64 = 0.85;

/// One month of (synthetic) flaring history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Month offset relative to "now" (last historical point is 0)
    pub month: i64,
    /// Flared volume (Sm³/d)
    pub flaring_sm3d: f64,
    /// Calendar month, 0-11
    pub month_of_year: usize,
    /// Normalized position in the series, 0..1
    pub trend: f64,
}

/// Generate `months` of history around `base_flaring` (Sm³/d)
///
/// `start_month` anchors the calendar month (0-11) of the first point so
/// seasonal features line up reproducibly.
pub fn synthetic_history<R: Rng + ?Sized>(
    base_flaring: f64,
    months: usize,
    start_month: usize,
    rng: &mut R,
) -> Vec<HistoryPoint> {
    (0..months)
        .map(|i| {
            let position = i as f64;
            let trend = base_flaring * (1.0 + position * TREND_PER_MONTH);
            let seasonal = (position / 12.0 * TAU).sin() * base_flaring * SEASONAL_AMPLITUDE;
            let operational =
                (position / 3.0 * TAU).sin() * base_flaring * OPERATIONAL_AMPLITUDE;
            let noise = (rng.random::<f64>() - 0.5) * base_flaring * NOISE_BAND;

            let value = trend + seasonal + operational + noise;
            HistoryPoint {
                month: i as i64 - months as i64 + 1,
                flaring_sm3d: (value * LEVEL_FACTOR).max(0.0),
                month_of_year: (start_month + i) % 12,
                trend: position / months as f64,
            }
        })
        .collect()
}
