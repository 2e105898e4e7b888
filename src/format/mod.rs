//! # Measurement File Format
//!
//! Decoding of the acquisition instrument's binary files: a header with
//! per-channel calibration followed by a row-interleaved region of 16-bit
//! ADC samples for eight channels.
//!
//! ## Example
//!
//! ```rust,no_run
//! use daqfile::format::decode_file;
//!
//! let file = decode_file("run_0042.dat")?;
//! println!("{} rows", file.header().buffer_size);
//! for channel in file.channels() {
//!     println!("{}: {} points [{}]", channel.label, channel.point_count(), channel.unit);
//! }
//! # Ok::<(), daqfile::format::DecodeError>(())
//! ```

pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod physical;
pub mod timestamp;
pub mod varint;


pub use decoder::{decode, decode_file, DecodedFile};
pub use encoder::{encode, encode_file, EncodeError};
pub use error::{ConfigError, DecodeError};
pub use header::{FileHeader, FormatVersion, RAW_CHANNEL_COUNT};
pub use physical::{to_physical, Calibration, RANGE_TABLE};
pub use timestamp::{to_unix_ms, StartTime, TimestampKind, TIMESTAMP_UNAVAILABLE};
pub use varint::decode_string;
