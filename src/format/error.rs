//! Error types for decoding and calibration.

/// Calibration defects that make physical conversion impossible
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The header declares a full-scale ADC value of zero
    #[error("maxAdcValue is zero; physical values would be undefined")]
    ZeroMaxAdc,
}

/// Errors that can occur while decoding a measurement file.
///
/// Any of these aborts the whole decode; no partial header or channel
/// state is ever returned alongside an error.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A read would run past the end of the buffer
    #[error("Truncated file: read past end of buffer at offset {offset}")]
    Truncated {
        /// Byte offset at which the failing read started
        offset: usize,
    },

    /// A length-prefixed string is not valid UTF-8
    #[error("Invalid UTF-8 string at offset {offset}")]
    InvalidString {
        /// Byte offset of the first string byte
        offset: usize,
    },

    /// A varint length prefix does not terminate within five bytes
    #[error("Varint length prefix too long at offset {offset}")]
    VarintOverflow {
        /// Byte offset of the first prefix byte
        offset: usize,
    },

    /// A channel declares a downsampling factor below one
    #[error("Channel {channel} has invalid downsampling factor {factor}")]
    InvalidDownsampling {
        /// Raw channel index (0-7)
        channel: usize,
        /// Declared factor
        factor: i32,
    },

    /// Calibration error detected before sample conversion
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error while loading the file into memory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Byte offset associated with the error, if any
    pub fn offset(&self) -> Option<usize> {
        match self {
            DecodeError::Truncated { offset }
            | DecodeError::InvalidString { offset }
            | DecodeError::VarintOverflow { offset } => Some(*offset),
            _ => None,
        }
    }
}
