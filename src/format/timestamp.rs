//! Legacy tick timestamps.
//!
//! The start time is stored as a signed 64-bit value: the low 62 bits count
//! 100 ns ticks since 0001-01-01, the top two bits carry a kind tag. Values
//! that cannot be turned into a plausible Unix time collapse to the sentinel
//! `0` ("timestamp unavailable").

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Ticks between 0001-01-01 and 1970-01-01
pub const EPOCH_OFFSET_TICKS: i64 = 621_355_968_000_000_000;

/// Ticks per millisecond
pub const TICKS_PER_MS: i64 = 10_000;

/// Mask selecting the tick count (low 62 bits)
pub const TICK_MASK: u64 = 0x3FFF_FFFF_FFFF_FFFF;

/// Sentinel returned when no usable timestamp exists
pub const TIMESTAMP_UNAVAILABLE: i64 = 0;

const ONE_YEAR_MS: i64 = 365 * 24 * 3600 * 1000;

/// Kind tag held in the top two bits of the raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampKind {
    /// No kind recorded
    Unspecified,
    /// Coordinated universal time
    Utc,
    /// Writer-local wall-clock time
    Local,
}

impl TimestampKind {
    /// Extract the kind tag from a raw tick value
    pub fn from_raw(raw_ticks: i64) -> Self {
        match (raw_ticks as u64) >> 62 {
            0 => TimestampKind::Unspecified,
            1 => TimestampKind::Utc,
            _ => TimestampKind::Local,
        }
    }
}

/// Convert raw ticks to Unix milliseconds, validated against the current clock
pub fn to_unix_ms(raw_ticks: i64) -> i64 {
    to_unix_ms_at(raw_ticks, Utc::now().timestamp_millis())
}

/// Convert raw ticks to Unix milliseconds, validated against `now_ms`.
///
/// Returns [`TIMESTAMP_UNAVAILABLE`] for values at or before the Unix epoch,
/// more than a year past `now_ms`, or on arithmetic overflow.
pub fn to_unix_ms_at(raw_ticks: i64, now_ms: i64) -> i64 {
    let ticks = ((raw_ticks as u64) & TICK_MASK) as i64;
    if ticks <= EPOCH_OFFSET_TICKS {
        return TIMESTAMP_UNAVAILABLE;
    }

    let unix_ms = (ticks - EPOCH_OFFSET_TICKS) / TICKS_PER_MS;
    match now_ms.checked_add(ONE_YEAR_MS) {
        Some(limit) if unix_ms > 0 && unix_ms < limit => unix_ms,
        _ => TIMESTAMP_UNAVAILABLE,
    }
}

/// Recording start time with the sentinel made explicit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StartTime {
    /// No plausible timestamp; time alignment must be disabled
    Unavailable,
    /// Valid start time
    At {
        /// Milliseconds since 1970-01-01 UTC
        unix_ms: i64,
    },
}

impl StartTime {
    /// Classify a raw tick value
    pub fn from_raw(raw_ticks: i64) -> Self {
        Self::from_unix_ms(to_unix_ms(raw_ticks))
    }

    /// Wrap a converted value, mapping the sentinel to [`StartTime::Unavailable`]
    pub fn from_unix_ms(unix_ms: i64) -> Self {
        if unix_ms == TIMESTAMP_UNAVAILABLE {
            StartTime::Unavailable
        } else {
            StartTime::At { unix_ms }
        }
    }

    /// Milliseconds since the Unix epoch, if available
    pub fn unix_ms(&self) -> Option<i64> {
        match self {
            StartTime::Unavailable => None,
            StartTime::At { unix_ms } => Some(*unix_ms),
        }
    }

    /// Start time as a UTC date-time, if available
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.unix_ms().and_then(DateTime::from_timestamp_millis)
    }

    /// Whether a real timestamp is present
    pub fn is_available(&self) -> bool {
        matches!(self, StartTime::At { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW_MS: i64 = 1_790_000_000_000;

    #[test]
    fn test_one_hour_after_epoch() {
        assert_eq!(to_unix_ms(EPOCH_OFFSET_TICKS + 36_000_000_000), 3_600_000);
    }

    #[test]
    fn test_kind_bits_are_masked() {
        let ticks = EPOCH_OFFSET_TICKS + 36_000_000_000;
        let utc = ticks | (1 << 62);
        let local = (ticks as u64 | (2 << 62)) as i64;
        assert!(local < 0);
        assert_eq!(to_unix_ms_at(utc, NOW_MS), 3_600_000);
        assert_eq!(to_unix_ms_at(local, NOW_MS), 3_600_000);
        assert_eq!(TimestampKind::from_raw(utc), TimestampKind::Utc);
        assert_eq!(TimestampKind::from_raw(local), TimestampKind::Local);
        assert_eq!(TimestampKind::from_raw(ticks), TimestampKind::Unspecified);
    }

    #[test]
    fn test_sub_millisecond_remainder_discarded() {
        assert_eq!(to_unix_ms_at(EPOCH_OFFSET_TICKS + 19_999, NOW_MS), 1);
    }

    #[test]
    fn test_pre_epoch_is_unavailable() {
        assert_eq!(to_unix_ms_at(0, NOW_MS), TIMESTAMP_UNAVAILABLE);
        assert_eq!(to_unix_ms_at(EPOCH_OFFSET_TICKS, NOW_MS), TIMESTAMP_UNAVAILABLE);
        // less than one millisecond past the epoch rounds to zero
        assert_eq!(to_unix_ms_at(EPOCH_OFFSET_TICKS + 9_999, NOW_MS), TIMESTAMP_UNAVAILABLE);
    }

    #[test]
    fn test_far_future_is_unavailable() {
        let two_years_ahead = (NOW_MS + 2 * ONE_YEAR_MS) * TICKS_PER_MS + EPOCH_OFFSET_TICKS;
        assert_eq!(to_unix_ms_at(two_years_ahead, NOW_MS), TIMESTAMP_UNAVAILABLE);

        let next_month = (NOW_MS + 30 * 24 * 3600 * 1000) * TICKS_PER_MS + EPOCH_OFFSET_TICKS;
        assert_eq!(to_unix_ms_at(next_month, NOW_MS), NOW_MS + 30 * 24 * 3600 * 1000);
    }

    #[test]
    fn test_all_bits_set_is_unavailable() {
        assert_eq!(to_unix_ms_at(-1, NOW_MS), TIMESTAMP_UNAVAILABLE);
        assert_eq!(to_unix_ms_at(i64::MAX, NOW_MS), TIMESTAMP_UNAVAILABLE);
    }

    #[test]
    fn test_start_time_distinguishes_sentinel() {
        assert_eq!(StartTime::from_unix_ms(0), StartTime::Unavailable);
        assert_eq!(StartTime::from_unix_ms(0).datetime(), None);

        let start = StartTime::from_unix_ms(3_600_000);
        assert!(start.is_available());
        assert_eq!(
            start.datetime().unwrap().to_rfc3339(),
            "1970-01-01T01:00:00+00:00"
        );
    }
}
