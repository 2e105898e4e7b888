//! Writer for the measurement file layout.
//!
//! Produces buffers byte-identical to what the acquisition software writes,
//! so decoded files can be regenerated for tests and demo data.

use std::io::Write;
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use super::error::DecodeError;
use super::header::{FileHeader, RAW_CHANNEL_COUNT};
use super::varint::encode_string;

/// Errors that can occur while encoding a file
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Header would not decode
    #[error("Invalid header: {0}")]
    InvalidHeader(#[from] DecodeError),

    /// A channel has the wrong number of ADC samples for the header
    #[error("Channel {channel}: expected {expected} samples, got {actual}")]
    SampleCountMismatch {
        /// Raw channel index
        channel: usize,
        /// `ceil(buffer_size / factor)`
        expected: usize,
        /// Samples supplied
        actual: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode a header and per-channel ADC samples into a file buffer.
///
/// `samples[c]` must hold exactly [`FileHeader::stored_samples`] values.
pub fn encode(header: &FileHeader, samples: &[Vec<i16>; RAW_CHANNEL_COUNT]) -> Result<Vec<u8>, EncodeError> {
    header.validate()?;
    for (channel, values) in samples.iter().enumerate() {
        let expected = header.stored_samples(channel);
        if values.len() != expected {
            return Err(EncodeError::SampleCountMismatch {
                channel,
                expected,
                actual: values.len(),
            });
        }
    }

    let total: usize = samples.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(256 + total * 2);
    write_header(&mut out, header)?;

    let factors: [usize; RAW_CHANNEL_COUNT] =
        std::array::from_fn(|c| header.downsampling_factor[c] as usize);
    for row in 0..header.buffer_size as usize {
        for c in 0..RAW_CHANNEL_COUNT {
            if row % factors[c] == 0 {
                out.write_i16::<LittleEndian>(samples[c][row / factors[c]])?;
            }
        }
    }
    Ok(out)
}

/// Encode and write a file to disk
pub fn encode_file<P: AsRef<Path>>(
    path: P,
    header: &FileHeader,
    samples: &[Vec<i16>; RAW_CHANNEL_COUNT],
) -> Result<(), EncodeError> {
    let bytes = encode(header, samples)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(&bytes)?;
    Ok(())
}

fn write_header(out: &mut Vec<u8>, header: &FileHeader) -> std::io::Result<()> {
    encode_string(out, &header.header);
    out.write_u32::<LittleEndian>(header.buffer_size)?;
    out.write_i64::<LittleEndian>(header.start_time_raw)?;
    out.write_i16::<LittleEndian>(header.max_adc_value)?;
    for &range in &header.channel_range {
        out.write_i32::<LittleEndian>(range)?;
    }
    for &scaling in &header.channel_scaling {
        out.write_i16::<LittleEndian>(scaling)?;
    }
    out.write_u32::<LittleEndian>(header.sampling_interval_ns)?;
    for &factor in &header.downsampling_factor {
        out.write_i32::<LittleEndian>(factor)?;
    }
    for unit in &header.unit {
        encode_string(out, unit);
    }
    for label in &header.label {
        encode_string(out, label);
    }
    Ok(())
}
