//! # Channel Module
//!
//! A [`Channel`] is the common shape of raw and derived series: paired
//! time (seconds) and value (engineering units) arrays plus the display
//! metadata needed to plot them. Raw channels are produced once by the
//! decoder; derived channels additionally record the channels they were
//! computed from.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Identifier of a raw or derived channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ChannelId {
    /// Raw channel decoded from the file (0-7)
    Raw(usize),
    /// Channel computed by the derivation engine (0-6)
    Derived(usize),
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelId::Raw(index) => write!(f, "CH{}", index),
            ChannelId::Derived(index) => write!(f, "D{}", index),
        }
    }
}

/// Error returned when a channel name cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid channel identifier: {0}")]
pub struct ParseChannelIdError(String);

impl FromStr for ChannelId {
    type Err = ParseChannelIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let (ctor, digits): (fn(usize) -> ChannelId, &str) = if let Some(rest) = upper.strip_prefix("CH") {
            (ChannelId::Raw, rest)
        } else if let Some(rest) = upper.strip_prefix('D') {
            (ChannelId::Derived, rest)
        } else {
            return Err(ParseChannelIdError(s.to_string()));
        };
        digits
            .parse::<usize>()
            .map(ctor)
            .map_err(|_| ParseChannelIdError(s.to_string()))
    }
}

/// Time of the `index`-th sample of a channel sampled every
/// `sampling_interval_ns * downsampling_factor` nanoseconds
#[inline]
pub fn sample_time(index: usize, sampling_interval_ns: u32, downsampling_factor: u32) -> f32 {
    (index as f64 * (f64::from(sampling_interval_ns) * f64::from(downsampling_factor)) / 1e9) as f32
}

/// A time series with display metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    /// Channel identifier
    pub id: ChannelId,
    /// Display label
    pub label: String,
    /// Engineering unit
    pub unit: String,
    /// Row stride relative to the base sampling interval
    pub downsampling_factor: u32,
    /// Base sampling interval of the file in nanoseconds
    pub sampling_interval_ns: u32,
    /// Sample times in seconds, non-decreasing
    pub time: Vec<f32>,
    /// Sample values in engineering units
    pub values: Vec<f32>,
    /// Channels this one was computed from (empty for raw channels)
    pub sources: Vec<ChannelId>,
}

impl Channel {
    /// Create an empty raw channel with capacity for `points` samples
    pub fn raw(
        index: usize,
        label: impl Into<String>,
        unit: impl Into<String>,
        downsampling_factor: u32,
        sampling_interval_ns: u32,
        points: usize,
    ) -> Self {
        Self {
            id: ChannelId::Raw(index),
            label: label.into(),
            unit: unit.into(),
            downsampling_factor,
            sampling_interval_ns,
            time: Vec::with_capacity(points),
            values: Vec::with_capacity(points),
            sources: Vec::new(),
        }
    }

    /// Build a channel from prepared arrays
    pub fn from_parts(
        id: ChannelId,
        label: impl Into<String>,
        unit: impl Into<String>,
        downsampling_factor: u32,
        sampling_interval_ns: u32,
        time: Vec<f32>,
        values: Vec<f32>,
    ) -> Self {
        debug_assert_eq!(time.len(), values.len());
        Self {
            id,
            label: label.into(),
            unit: unit.into(),
            downsampling_factor,
            sampling_interval_ns,
            time,
            values,
            sources: Vec::new(),
        }
    }

    /// Append one sample, deriving its time from the current sample count
    pub fn push_sample(&mut self, value: f32) {
        let t = sample_time(self.time.len(), self.sampling_interval_ns, self.downsampling_factor);
        self.time.push(t);
        self.values.push(value);
    }

    /// Number of samples
    pub fn point_count(&self) -> usize {
        self.values.len()
    }

    /// Whether the channel holds no samples
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Seconds between consecutive samples
    pub fn sample_period(&self) -> f32 {
        (f64::from(self.sampling_interval_ns) * f64::from(self.downsampling_factor) / 1e9) as f32
    }

    /// Time of the last sample, or 0 for an empty channel
    pub fn duration(&self) -> f32 {
        self.time.last().copied().unwrap_or(0.0)
    }

    /// Whether the channel was computed rather than decoded
    pub fn is_derived(&self) -> bool {
        matches!(self.id, ChannelId::Derived(_))
    }
}
