//! File header and layout version.

use serde::Serialize;

use super::error::{ConfigError, DecodeError};
use super::physical::Calibration;
use super::timestamp::{StartTime, TimestampKind};

/// Number of raw channels in every file
pub const RAW_CHANNEL_COUNT: usize = 8;

/// Layout generation of a file.
///
/// Both generations share one byte layout; they differ in how the writer
/// tagged the start time (local wall clock vs. UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatVersion {
    /// Start time written as local or untagged ticks
    Legacy,
    /// Start time written as UTC ticks
    Current,
}

impl FormatVersion {
    /// Discriminate by the timestamp kind tag
    pub fn from_kind(kind: TimestampKind) -> Self {
        match kind {
            TimestampKind::Utc => FormatVersion::Current,
            TimestampKind::Unspecified | TimestampKind::Local => FormatVersion::Legacy,
        }
    }
}

/// Decoded file header. Immutable once decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileHeader {
    /// Free-text header string (not validated)
    pub header: String,
    /// Number of rows in the sample region
    pub buffer_size: u32,
    /// Start time as raw legacy ticks
    pub start_time_raw: i64,
    /// Full-scale ADC count, never zero in a decoded header
    pub max_adc_value: i16,
    /// Input range code per channel
    pub channel_range: [i32; RAW_CHANNEL_COUNT],
    /// Scaling factor per channel (thousandths)
    pub channel_scaling: [i16; RAW_CHANNEL_COUNT],
    /// Base sampling interval in nanoseconds
    pub sampling_interval_ns: u32,
    /// Row stride per channel, each at least 1
    pub downsampling_factor: [i32; RAW_CHANNEL_COUNT],
    /// Engineering unit per channel
    pub unit: [String; RAW_CHANNEL_COUNT],
    /// Display label per channel
    pub label: [String; RAW_CHANNEL_COUNT],
}

impl FileHeader {
    /// Header with neutral calibration: 10 V range, unit scaling, full-rate
    /// channels labelled `CH0`..`CH7`
    pub fn new(buffer_size: u32, sampling_interval_ns: u32) -> Self {
        Self {
            header: String::new(),
            buffer_size,
            start_time_raw: 0,
            max_adc_value: i16::MAX,
            channel_range: [9; RAW_CHANNEL_COUNT],
            channel_scaling: [1000; RAW_CHANNEL_COUNT],
            sampling_interval_ns,
            downsampling_factor: [1; RAW_CHANNEL_COUNT],
            unit: std::array::from_fn(|_| "mV".to_string()),
            label: std::array::from_fn(|c| format!("CH{}", c)),
        }
    }

    /// Recording start, with the unavailable sentinel made explicit
    pub fn start_time(&self) -> StartTime {
        StartTime::from_raw(self.start_time_raw)
    }

    /// Timestamp kind tag from the raw start time
    pub fn timestamp_kind(&self) -> TimestampKind {
        TimestampKind::from_raw(self.start_time_raw)
    }

    /// Layout generation of the file
    pub fn format_version(&self) -> FormatVersion {
        FormatVersion::from_kind(self.timestamp_kind())
    }

    /// Calibration for one raw channel
    ///
    /// # Panics
    ///
    /// Panics if `channel >= RAW_CHANNEL_COUNT`.
    pub fn calibration(&self, channel: usize) -> Result<Calibration, ConfigError> {
        Calibration::new(
            self.max_adc_value,
            self.channel_range[channel],
            self.channel_scaling[channel],
        )
    }

    /// Expected sample count for one raw channel: `floor(buffer_size / factor)`
    ///
    /// # Panics
    ///
    /// Panics if `channel >= RAW_CHANNEL_COUNT`.
    pub fn expected_points(&self, channel: usize) -> usize {
        let factor = self.downsampling_factor[channel].max(1) as u64;
        (u64::from(self.buffer_size) / factor) as usize
    }

    /// Samples physically stored for one raw channel: one per row whose
    /// index is a multiple of the factor, `ceil(buffer_size / factor)`
    ///
    /// # Panics
    ///
    /// Panics if `channel >= RAW_CHANNEL_COUNT`.
    pub fn stored_samples(&self, channel: usize) -> usize {
        let factor = self.downsampling_factor[channel].max(1) as u64;
        u64::from(self.buffer_size).div_ceil(factor) as usize
    }

    /// Reject headers whose values cannot describe a sample region
    pub fn validate(&self) -> Result<(), DecodeError> {
        if self.max_adc_value == 0 {
            return Err(ConfigError::ZeroMaxAdc.into());
        }
        for (channel, &factor) in self.downsampling_factor.iter().enumerate() {
            if factor < 1 {
                return Err(DecodeError::InvalidDownsampling { channel, factor });
            }
        }
        Ok(())
    }
}
