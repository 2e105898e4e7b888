//! # Derived Channel Engine
//!
//! Computes the seven engineering channels (line voltage, phase currents,
//! DC current/voltage, carriage force) from the eight decoded raw channels.
//!
//! Each derived channel inherits the time axis and downsampling factor of
//! its primary (first-listed) source. A derived channel whose sources are
//! missing or disagree in length is skipped with a [`DeriveWarning`]; the
//! remaining channels are still computed.
//!
//! ```rust,no_run
//! use daqfile::derive::derive;
//! use daqfile::format::decode_file;
//!
//! let file = decode_file("run_0042.dat")?;
//! let derived = derive(file.channels());
//! if let Some(force) = derived.get("D6") {
//!     println!("{}: {} points", force.label, force.point_count());
//! }
//! # Ok::<(), daqfile::format::DecodeError>(())
//! ```

mod formulas;


use std::collections::BTreeMap;

use log::{debug, warn};

use crate::channel::{Channel, ChannelId};

pub use formulas::{DerivedDef, UnitRule, C1, C2, DERIVED_CHANNELS, K1, MAX_SOURCES};

/// Non-fatal problem that prevented one derived channel from being computed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeriveWarning {
    /// A listed source channel is not available
    #[error("{channel} skipped: source {input} is missing")]
    MissingSource {
        /// Derived channel that was skipped
        channel: ChannelId,
        /// Source that could not be found
        input: ChannelId,
    },

    /// Sources combined element-wise have different lengths
    #[error("{channel} skipped: source {input} has {actual} points, primary has {expected}")]
    LengthMismatch {
        /// Derived channel that was skipped
        channel: ChannelId,
        /// Source whose length differs from the primary
        input: ChannelId,
        /// Primary source length
        expected: usize,
        /// Offending source length
        actual: usize,
    },
}

/// Options for the derivation pass
#[derive(Debug, Clone, Copy, Default)]
pub struct DeriveConfig {
    /// Evaluate independent channels on worker threads (needs the
    /// `parallel` feature; ignored otherwise)
    pub parallel: bool,
}

/// Result of a derivation pass
#[derive(Debug, Clone, Default)]
pub struct DerivedSet {
    channels: BTreeMap<String, Channel>,
    warnings: Vec<DeriveWarning>,
}

impl DerivedSet {
    /// Derived channel by key (`"D0"`..`"D6"`)
    pub fn get(&self, key: &str) -> Option<&Channel> {
        self.channels.get(key)
    }

    /// Derived channel by key or label (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&Channel> {
        let key = name.trim().to_ascii_uppercase();
        self.channels.get(&key).or_else(|| {
            self.channels
                .values()
                .find(|c| c.label.eq_ignore_ascii_case(name))
        })
    }

    /// Computed channels keyed by identifier
    pub fn channels(&self) -> &BTreeMap<String, Channel> {
        &self.channels
    }

    /// Warnings for skipped channels
    pub fn warnings(&self) -> &[DeriveWarning] {
        &self.warnings
    }

    /// Number of computed channels
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channel could be computed
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Take ownership of the computed channels
    pub fn into_channels(self) -> BTreeMap<String, Channel> {
        self.channels
    }

    fn record(&mut self, result: Result<Channel, DeriveWarning>) {
        match result {
            Ok(channel) => {
                debug!("Derived {} ({}): {} points", channel.id, channel.label, channel.point_count());
                self.channels.insert(channel.id.to_string(), channel);
            }
            Err(warning) => {
                warn!("{}", warning);
                self.warnings.push(warning);
            }
        }
    }
}

/// Compute every derived channel from the raw channels, sequentially
pub fn derive(raw: &[Channel]) -> DerivedSet {
    derive_with(raw, &DeriveConfig::default())
}

/// Compute every derived channel with explicit options
pub fn derive_with(raw: &[Channel], config: &DeriveConfig) -> DerivedSet {
    if config.parallel {
        #[cfg(feature = "parallel")]
        {
            return derive_staged(raw);
        }

        #[cfg(not(feature = "parallel"))]
        debug!("Parallel derivation requested without the `parallel` feature; running sequentially");
    }

    let mut set = DerivedSet::default();
    for def in DERIVED_CHANNELS.iter() {
        let result = evaluate(def, raw, &set.channels);
        set.record(result);
    }
    set
}

/// Evaluate stage by stage: channels within a stage only depend on earlier
/// stages and run concurrently; each stage completes before the next starts.
#[cfg(feature = "parallel")]
fn derive_staged(raw: &[Channel]) -> DerivedSet {
    use rayon::prelude::*;

    let max_stage = DERIVED_CHANNELS.iter().map(DerivedDef::stage).max().unwrap_or(0);
    let mut set = DerivedSet::default();

    for stage in 0..=max_stage {
        let defs: Vec<&DerivedDef> = DERIVED_CHANNELS
            .iter()
            .filter(|def| def.stage() == stage)
            .collect();
        let results: Vec<Result<Channel, DeriveWarning>> = defs
            .par_iter()
            .map(|def| evaluate(def, raw, &set.channels))
            .collect();
        for result in results {
            set.record(result);
        }
    }

    // keep warning order identical to the sequential pass
    set.warnings.sort_by_key(|w| match w {
        DeriveWarning::MissingSource { channel, .. }
        | DeriveWarning::LengthMismatch { channel, .. } => *channel,
    });
    set
}

fn resolve<'a>(
    id: ChannelId,
    raw: &'a [Channel],
    derived: &'a BTreeMap<String, Channel>,
) -> Option<&'a Channel> {
    match id {
        ChannelId::Raw(_) => raw.iter().find(|c| c.id == id),
        ChannelId::Derived(_) => derived.get(&id.to_string()),
    }
}

fn evaluate(
    def: &DerivedDef,
    raw: &[Channel],
    derived: &BTreeMap<String, Channel>,
) -> Result<Channel, DeriveWarning> {
    let mut sources: Vec<&Channel> = Vec::with_capacity(def.sources.len());
    for &source in def.sources {
        let channel = resolve(source, raw, derived).ok_or(DeriveWarning::MissingSource {
            channel: def.id(),
            input: source,
        })?;
        sources.push(channel);
    }

    let primary = sources[0];
    let len = primary.point_count();
    for (&source, channel) in def.sources.iter().zip(&sources).skip(1) {
        if channel.point_count() != len {
            return Err(DeriveWarning::LengthMismatch {
                channel: def.id(),
                input: source,
                expected: len,
                actual: channel.point_count(),
            });
        }
    }

    let mut inputs = [0.0f32; MAX_SOURCES];
    let arity = sources.len();
    let values: Vec<f32> = (0..len)
        .map(|i| {
            for (slot, channel) in inputs.iter_mut().zip(&sources) {
                *slot = channel.values[i];
            }
            (def.formula)(&inputs[..arity])
        })
        .collect();

    let unit = match def.unit {
        UnitRule::Primary => primary.unit.clone(),
        UnitRule::Fixed(unit) => unit.to_string(),
    };

    let mut channel = Channel::from_parts(
        def.id(),
        def.label,
        unit,
        primary.downsampling_factor,
        primary.sampling_interval_ns,
        primary.time.clone(),
        values,
    );
    channel.sources = def.sources.to_vec();
    Ok(channel)
}
