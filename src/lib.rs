//! # daqfile - Measurement File Decoding and Plot Resampling
//!
//! `daqfile` reads the binary measurement files written by an 8-channel
//! data-acquisition instrument, converts the raw ADC samples to engineering
//! units, computes the derived drive channels and serves reduced slices of
//! any channel for plotting.
//!
//! ## Pipeline
//!
//! ```text
//! bytes ──decode──▶ FileHeader + 8 raw channels ──derive──▶ 7 derived channels
//!                              │                                   │
//!                              └────────── resample / statistics ──┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use daqfile::prelude::*;
//!
//! let file = decode_file("run_0042.dat")?;
//! let derived = derive(file.channels());
//!
//! // 2000-point view of the DC current between 1 s and 5 s
//! if let Some(current) = derived.get("D3") {
//!     let series = resample(current, 1.0, 5.0, 2000);
//!     println!("{} points, stats {:?}", series.len(), statistics(current));
//! }
//!
//! match file.header().start_time() {
//!     StartTime::At { unix_ms } => println!("recorded at {} ms", unix_ms),
//!     StartTime::Unavailable => println!("no usable start time"),
//! }
//! # Ok::<(), daqfile::format::DecodeError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`format`]: binary layout, converters, decoder and encoder
//! - [`channel`]: the shared time-series shape for raw and derived channels
//! - [`derive`]: fixed formula set for the derived channels
//! - [`resample`]: bucketed min/max/average reduction and statistics
//! - [`validator`]: post-decode integrity report
//!
//! Decoded data is immutable and all query functions take shared
//! references, so one decoded file can serve concurrent readers without
//! locking.

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod channel;
pub mod derive;
pub mod format;
pub mod resample;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::channel::{Channel, ChannelId};
    pub use crate::derive::{derive, derive_with, DeriveConfig, DeriveWarning, DerivedSet};
    pub use crate::format::{
        decode, decode_file, to_physical, to_unix_ms, ConfigError, DecodeError, DecodedFile,
        FileHeader, FormatVersion, StartTime,
    };
    pub use crate::resample::{resample, statistics, Series, Statistics};
    pub use crate::validator::{validate_file, ValidationReport};
}
