//! Whole-buffer decoder for the measurement file layout.
//!
//! All integers are little-endian:
//!
//! | Field | Type |
//! |-------|------|
//! | header | varint string |
//! | bufferSize | u32 |
//! | startTimeRaw | i64 |
//! | maxAdcValue | i16 |
//! | channelRange | 8 x i32 |
//! | channelScaling | 8 x i16 |
//! | samplingIntervalNs | u32 |
//! | downsamplingFactor | 8 x i32 |
//! | unit | 8 x varint string |
//! | label | 8 x varint string |
//! | samples | i16, row-interleaved |
//!
//! The sample region is woven row by row: for each row `j` and each channel
//! `c` in order, one sample is present when `j % downsamplingFactor[c] == 0`.

use std::path::Path;

use log::{debug, warn};

use super::cursor::ByteCursor;
use super::error::DecodeError;
use super::header::{FileHeader, RAW_CHANNEL_COUNT};
use super::physical::Calibration;
use super::varint::read_string;
use crate::channel::{Channel, ChannelId};

/// Header plus the eight raw channels of one file
#[derive(Debug, Clone)]
pub struct DecodedFile {
    header: FileHeader,
    channels: [Channel; RAW_CHANNEL_COUNT],
}

impl DecodedFile {
    /// Decoded header
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// All raw channels in file order
    pub fn channels(&self) -> &[Channel; RAW_CHANNEL_COUNT] {
        &self.channels
    }

    /// Raw channel by index
    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    /// Raw channel by identifier or label (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&Channel> {
        if let Ok(ChannelId::Raw(index)) = name.parse::<ChannelId>() {
            return self.channel(index);
        }
        self.channels
            .iter()
            .find(|c| c.label.eq_ignore_ascii_case(name))
    }

    /// Split into header and channels
    pub fn into_parts(self) -> (FileHeader, [Channel; RAW_CHANNEL_COUNT]) {
        (self.header, self.channels)
    }
}

/// Read a file into memory and decode it
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<DecodedFile, DecodeError> {
    let path = path.as_ref();
    let buffer = std::fs::read(path)?;
    debug!("Read {} bytes from {}", buffer.len(), path.display());
    decode(&buffer)
}

/// Decode a complete file buffer
pub fn decode(buffer: &[u8]) -> Result<DecodedFile, DecodeError> {
    let mut cursor = ByteCursor::new(buffer);
    let header = read_header(&mut cursor)?;
    header.validate()?;

    debug!(
        "Header: {} rows, interval {} ns, factors {:?}, version {:?}",
        header.buffer_size,
        header.sampling_interval_ns,
        header.downsampling_factor,
        header.format_version()
    );

    let mut calibrations: Vec<Calibration> = Vec::with_capacity(RAW_CHANNEL_COUNT);
    for channel in 0..RAW_CHANNEL_COUNT {
        calibrations.push(header.calibration(channel)?);
    }

    let channels = read_samples(&mut cursor, &header, &calibrations)?;

    if cursor.remaining() > 0 {
        warn!("Ignoring {} trailing bytes after sample region", cursor.remaining());
    }

    Ok(DecodedFile { header, channels })
}

fn read_header(cursor: &mut ByteCursor<'_>) -> Result<FileHeader, DecodeError> {
    let header = read_string(cursor)?;
    let buffer_size = cursor.read_u32()?;
    let start_time_raw = cursor.read_i64()?;
    let max_adc_value = cursor.read_i16()?;

    let mut channel_range = [0i32; RAW_CHANNEL_COUNT];
    for range in channel_range.iter_mut() {
        *range = cursor.read_i32()?;
    }

    let mut channel_scaling = [0i16; RAW_CHANNEL_COUNT];
    for scaling in channel_scaling.iter_mut() {
        *scaling = cursor.read_i16()?;
    }

    let sampling_interval_ns = cursor.read_u32()?;

    let mut downsampling_factor = [0i32; RAW_CHANNEL_COUNT];
    for factor in downsampling_factor.iter_mut() {
        *factor = cursor.read_i32()?;
    }

    let mut unit: [String; RAW_CHANNEL_COUNT] = Default::default();
    for slot in unit.iter_mut() {
        *slot = read_string(cursor)?;
    }

    let mut label: [String; RAW_CHANNEL_COUNT] = Default::default();
    for slot in label.iter_mut() {
        *slot = read_string(cursor)?;
    }

    Ok(FileHeader {
        header,
        buffer_size,
        start_time_raw,
        max_adc_value,
        channel_range,
        channel_scaling,
        sampling_interval_ns,
        downsampling_factor,
        unit,
        label,
    })
}

fn read_samples(
    cursor: &mut ByteCursor<'_>,
    header: &FileHeader,
    calibrations: &[Calibration],
) -> Result<[Channel; RAW_CHANNEL_COUNT], DecodeError> {
    // validate() guarantees every factor is >= 1
    let factors: [usize; RAW_CHANNEL_COUNT] =
        std::array::from_fn(|c| header.downsampling_factor[c] as usize);
    let expected: [usize; RAW_CHANNEL_COUNT] = std::array::from_fn(|c| header.expected_points(c));

    // never reserve more than the buffer could actually hold
    let max_samples = cursor.remaining() / 2;
    let mut channels: [Channel; RAW_CHANNEL_COUNT] = std::array::from_fn(|c| {
        Channel::raw(
            c,
            header.label[c].clone(),
            header.unit[c].clone(),
            factors[c] as u32,
            header.sampling_interval_ns,
            expected[c].min(max_samples),
        )
    });

    let mut dropped = [0usize; RAW_CHANNEL_COUNT];
    let rows = header.buffer_size as usize;
    let mut row = 0usize;
    while row < rows {
        for c in 0..RAW_CHANNEL_COUNT {
            if row % factors[c] != 0 {
                continue;
            }
            let raw = cursor.read_i16()?;
            if channels[c].point_count() < expected[c] {
                channels[c].push_sample(calibrations[c].apply(raw));
            } else {
                dropped[c] += 1;
            }
        }
        // rows without any stored sample are skipped
        row = factors
            .iter()
            .map(|&f| (row / f + 1) * f)
            .min()
            .unwrap_or(rows);
    }

    for (c, channel) in channels.iter().enumerate() {
        if dropped[c] > 0 {
            warn!(
                "Channel {}: dropped {} sample(s) from incomplete final stride",
                c, dropped[c]
            );
        }
        debug!("Channel {} ({}): {} points", c, channel.label, channel.point_count());
    }

    Ok(channels)
}
