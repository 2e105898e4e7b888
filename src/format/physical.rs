//! ADC counts to engineering units.

use serde::Serialize;

use super::error::ConfigError;

/// Full-scale input range in volts, indexed by range code
pub const RANGE_TABLE: [f32; 14] = [
    0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0,
];

/// Range used when a channel reports a code outside [`RANGE_TABLE`]
pub const DEFAULT_RANGE_VOLTS: f32 = 5.0;

/// Full-scale voltage for a range code
pub fn voltage_range(range_code: i32) -> f32 {
    usize::try_from(range_code)
        .ok()
        .and_then(|code| RANGE_TABLE.get(code).copied())
        .unwrap_or(DEFAULT_RANGE_VOLTS)
}

/// Convert a raw ADC sample to a physical value.
///
/// `millivolts = raw / max_adc * range * 1000`, then scaled by
/// `scaling / 1000`.
pub fn to_physical(raw_adc: i16, max_adc: i16, range_code: i32, scaling: i16) -> Result<f32, ConfigError> {
    Calibration::new(max_adc, range_code, scaling).map(|cal| cal.apply(raw_adc))
}

/// Per-channel calibration with the range lookup resolved once
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Calibration {
    max_adc: i16,
    range_volts: f32,
    scaling: i16,
}

impl Calibration {
    /// Build a calibration, rejecting a zero full-scale ADC value
    pub fn new(max_adc: i16, range_code: i32, scaling: i16) -> Result<Self, ConfigError> {
        if max_adc == 0 {
            return Err(ConfigError::ZeroMaxAdc);
        }
        Ok(Self {
            max_adc,
            range_volts: voltage_range(range_code),
            scaling,
        })
    }

    /// Full-scale range in volts
    pub fn range_volts(&self) -> f32 {
        self.range_volts
    }

    /// Convert one raw sample
    #[inline]
    pub fn apply(&self, raw_adc: i16) -> f32 {
        let millivolts = (f32::from(raw_adc) / f32::from(self.max_adc)) * self.range_volts * 1000.0;
        (f32::from(self.scaling) / 1000.0) * millivolts
    }
}
