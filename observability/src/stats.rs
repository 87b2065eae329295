//! Summary statistics over a window of readings.

use nm_core::MetricReading;
use serde::Serialize;

/// Population statistics of a non-empty window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowStats {
    pub mean: f64,
    /// Population standard deviation (divides by N).
    pub stddev: f64,
    pub count: usize,
    pub min: f64,
    pub max: f64,
}

impl WindowStats {
    /// `None` for an empty window.
    pub fn compute(readings: &[MetricReading]) -> Option<Self> {
        if readings.is_empty() {
            return None;
        }

        let count = readings.len();
        let min = readings
            .iter()
            .map(|r| r.value)
            .fold(f64::INFINITY, f64::min);
        let max = readings
            .iter()
            .map(|r| r.value)
            .fold(f64::NEG_INFINITY, f64::max);

        // A flat window is exact; summing would leave rounding noise in both
        // the mean and the deviation.
        if min == max {
            return Some(Self {
                mean: min,
                stddev: 0.0,
                count,
                min,
                max,
            });
        }

        let n = count as f64;
        let mean = readings.iter().map(|r| r.value).sum::<f64>() / n;
        let variance = readings
            .iter()
            .map(|r| (r.value - mean).powi(2))
            .sum::<f64>()
            / n;

        Some(Self {
            mean,
            stddev: variance.sqrt(),
            count,
            min,
            max,
        })
    }
}
