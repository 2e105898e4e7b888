//! Fixed formula table for the derived channels.
//!
//! Entries are listed in dependency order: a formula only ever references
//! derived channels that appear above it.

use crate::channel::ChannelId;
use crate::channel::ChannelId::{Derived as D, Raw as R};

/// Current-transformer multiplier
pub const K1: f32 = 35.0;

/// Force coefficient for the first load cell
pub const C1: f32 = 6.2832;

/// Force coefficient for the second load cell
pub const C2: f32 = 5.0108;

/// Most sources any formula combines
pub const MAX_SOURCES: usize = 3;

/// How a derived channel obtains its unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitRule {
    /// Same unit as the primary source
    Primary,
    /// Fixed unit string
    Fixed(&'static str),
}

/// Definition of one derived channel
#[derive(Debug, Clone, Copy)]
pub struct DerivedDef {
    /// Index within the derived set (`D{index}`)
    pub index: usize,
    /// Display label
    pub label: &'static str,
    /// Unit rule
    pub unit: UnitRule,
    /// Inputs; the first entry is the primary source
    pub sources: &'static [ChannelId],
    /// Per-sample formula over source values, in `sources` order
    pub formula: fn(&[f32]) -> f32,
}

impl DerivedDef {
    /// Identifier of the channel this entry produces
    pub fn id(&self) -> ChannelId {
        ChannelId::Derived(self.index)
    }

    /// Primary source whose time axis the result inherits
    pub fn primary(&self) -> ChannelId {
        self.sources[0]
    }

    /// Dependency depth: 0 for raw-only formulas
    pub fn stage(&self) -> usize {
        self.sources
            .iter()
            .filter_map(|source| match source {
                ChannelId::Derived(index) => DERIVED_CHANNELS
                    .iter()
                    .find(|def| def.index == *index)
                    .map(|def| def.stage() + 1),
                ChannelId::Raw(_) => None,
            })
            .max()
            .unwrap_or(0)
    }
}

fn neg_sum(v: &[f32]) -> f32 {
    -v[0] - v[1]
}

fn dc_current(v: &[f32]) -> f32 {
    K1 * (v[0].abs() + v[1].abs() + v[2].abs())
}

fn dc_voltage(v: &[f32]) -> f32 {
    (v[0].abs() + v[1].abs() + v[2].abs()) / K1
}

fn carriage_force(v: &[f32]) -> f32 {
    v[0] * C1 - v[1] * C2
}

/// All derived channels in evaluation order
pub static DERIVED_CHANNELS: [DerivedDef; 7] = [
    DerivedDef {
        index: 0,
        label: "UL3L1",
        unit: UnitRule::Primary,
        sources: &[R(0), R(1)],
        formula: neg_sum,
    },
    DerivedDef {
        index: 1,
        label: "IL2GR1",
        unit: UnitRule::Primary,
        sources: &[R(2), R(3)],
        formula: neg_sum,
    },
    DerivedDef {
        index: 2,
        label: "IL2GR2",
        unit: UnitRule::Primary,
        sources: &[R(4), R(5)],
        formula: neg_sum,
    },
    DerivedDef {
        index: 3,
        label: "I_DC_GR1",
        unit: UnitRule::Fixed("A"),
        sources: &[R(2), R(3), D(1)],
        formula: dc_current,
    },
    DerivedDef {
        index: 4,
        label: "I_DC_GR2",
        unit: UnitRule::Fixed("A"),
        sources: &[R(4), R(5), D(2)],
        formula: dc_current,
    },
    DerivedDef {
        index: 5,
        label: "U_DC",
        unit: UnitRule::Fixed("V"),
        sources: &[R(0), R(1), D(0)],
        formula: dc_voltage,
    },
    DerivedDef {
        index: 6,
        label: "F_Schlitten",
        unit: UnitRule::Fixed("N"),
        sources: &[R(6), R(7)],
        formula: carriage_force,
    },
];
