//! # Range Resampler
//!
//! Reduces a time window of a channel to roughly `max_points` samples for
//! plotting. Windows that already fit are returned untouched; larger ones
//! are collapsed bucket by bucket, keeping min and max alongside the mean
//! wherever a bucket varies significantly, so short spikes stay visible.
//!
//! Resampling only reads the channel, holds no state between calls and is
//! safe to call from several threads at once.

mod stats;


use serde::Serialize;

use crate::channel::Channel;

pub use stats::{statistics, Statistics};

/// A bucket varies significantly when `|max - min|` exceeds this fraction of `|avg|`
pub const SIGNIFICANT_VARIATION: f32 = 0.1;

/// Bucket averages at or below this magnitude are never treated as significant
pub const NEAR_ZERO_AVERAGE: f32 = f32::EPSILON;

/// Reduced series ready for rendering
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    /// Point times in seconds
    pub time: Vec<f32>,
    /// Point values
    pub values: Vec<f32>,
}

impl Series {
    /// Number of points
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no points
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(time, value)` pairs
    pub fn points(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.time.iter().copied().zip(self.values.iter().copied())
    }

    fn push(&mut self, t: f32, v: f32) {
        self.time.push(t);
        self.values.push(v);
    }
}

/// Index window `[start, end)` covering `start_time..end_time`.
///
/// Both bounds are the leftmost index whose time is `>=` the requested
/// time, clamped to `[0, len - 1]`.
pub fn window(time: &[f32], start_time: f32, end_time: f32) -> (usize, usize) {
    if time.is_empty() {
        return (0, 0);
    }
    let last = time.len() - 1;
    let start = time.partition_point(|&t| t < start_time).min(last);
    let end = time.partition_point(|&t| t < end_time).min(last);
    (start, end)
}

/// Reduce `channel` between `start` and `end` seconds to about `max_points` points.
///
/// The output length is a target, not a ceiling: buckets with significant
/// variation emit three points each.
pub fn resample(channel: &Channel, start: f32, end: f32, max_points: u32) -> Series {
    if channel.is_empty() || max_points == 0 {
        return Series::default();
    }

    let (start_idx, end_idx) = window(&channel.time, start, end);
    if end_idx <= start_idx {
        return Series::default();
    }

    let count = end_idx - start_idx;
    let budget = max_points as usize;
    let time = &channel.time[start_idx..end_idx];
    let values = &channel.values[start_idx..end_idx];

    if count <= budget {
        return Series {
            time: time.to_vec(),
            values: values.to_vec(),
        };
    }

    let step = count / budget;
    let span = channel.sample_period() * step as f32;
    let mut out = Series {
        time: Vec::with_capacity(budget + 1),
        values: Vec::with_capacity(budget + 1),
    };

    for (bucket_time, bucket) in time.chunks(step).zip(values.chunks(step)) {
        let t = bucket_time[0];
        let (min, max, avg) = bucket_summary(bucket);

        if is_significant(min, max, avg) {
            out.push(t, min);
            out.push(t + span, max);
            out.push(t + 0.5 * span, avg);
        } else {
            out.push(t, avg);
        }
    }

    out
}

fn bucket_summary(bucket: &[f32]) -> (f32, f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0.0f64;
    for &v in bucket {
        min = min.min(v);
        max = max.max(v);
        sum += f64::from(v);
    }
    (min, max, (sum / bucket.len() as f64) as f32)
}

fn is_significant(min: f32, max: f32, avg: f32) -> bool {
    let magnitude = avg.abs();
    magnitude > NEAR_ZERO_AVERAGE && (max - min).abs() > SIGNIFICANT_VARIATION * magnitude
}
