use serde::Serialize;

use crate::channel::Channel;

/// Summary statistics of a channel's values
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Statistics {
    /// Smallest value
    pub min: f32,
    /// Largest value
    pub max: f32,
    /// Arithmetic mean
    pub mean: f32,
    /// Population standard deviation
    pub stddev: f32,
    /// Root mean square
    pub rms: f32,
    /// Number of samples
    pub count: usize,
}

/// Compute statistics in one pass. An empty channel yields all zeros.
pub fn statistics(channel: &Channel) -> Statistics {
    let count = channel.values.len();
    if count == 0 {
        return Statistics::default();
    }

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0.0f64;
    let mut sum_squares = 0.0f64;
    for &v in &channel.values {
        min = min.min(v);
        max = max.max(v);
        let v = f64::from(v);
        sum += v;
        sum_squares += v * v;
    }

    let n = count as f64;
    let mean = sum / n;
    let mean_square = sum_squares / n;
    // rounding can push the variance slightly below zero
    let variance = (mean_square - mean * mean).max(0.0);

    Statistics {
        min,
        max,
        mean: mean as f32,
        stddev: variance.sqrt() as f32,
        rms: mean_square.sqrt() as f32,
        count,
    }
}
