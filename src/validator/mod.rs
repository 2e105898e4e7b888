//! # Measurement File Validator
//!
//! Decodes a file and checks the invariants downstream plotting relies on:
//! point counts, time axes, finite values, calibration and derived-channel
//! completeness.
//!
//! ```rust,no_run
//! use daqfile::validator::validate_file;
//!
//! let report = validate_file("run_0042.dat");
//! println!("{}", report);
//! assert!(!report.has_failures());
//! ```

mod report;

use std::path::Path;

use crate::channel::{sample_time, Channel};
use crate::derive::{derive, DerivedSet};
use crate::format::physical::RANGE_TABLE;
use crate::format::{decode_file, DecodedFile, StartTime, RAW_CHANNEL_COUNT};

pub use report::{CheckStatus, ValidationCheck, ValidationReport};

/// Decode `path` and validate it; decode failures become a failed check
pub fn validate_file<P: AsRef<Path>>(path: P) -> ValidationReport {
    let path = path.as_ref();
    let mut report = ValidationReport::new(path.display().to_string());

    match decode_file(path) {
        Ok(file) => {
            report.add_check(ValidationCheck::ok("File decodes"));
            let derived = derive(file.channels());
            check_decoded(&mut report, &file, &derived);
        }
        Err(e) => report.add_check(ValidationCheck::failed("File decodes", e.to_string())),
    }
    report
}

/// Validate an already decoded file and its derived channels
pub fn validate_decoded(file_path: &str, file: &DecodedFile, derived: &DerivedSet) -> ValidationReport {
    let mut report = ValidationReport::new(file_path);
    check_decoded(&mut report, file, derived);
    report
}

fn check_decoded(report: &mut ValidationReport, file: &DecodedFile, derived: &DerivedSet) {
    report.add_check(check_start_time(file));
    report.add_check(check_ranges(file));
    report.add_check(check_point_counts(file));
    report.add_check(check_time_axes(file));
    report.add_check(check_finite(file.channels().iter().chain(derived.channels().values())));
    report.add_check(check_labels(file));
    report.add_check(check_derived(derived));
}

fn check_start_time(file: &DecodedFile) -> ValidationCheck {
    const NAME: &str = "Start timestamp";
    match file.header().start_time() {
        StartTime::At { .. } => ValidationCheck::ok(NAME),
        StartTime::Unavailable => ValidationCheck::warning(
            NAME,
            format!(
                "raw value {} is not a plausible time; time alignment disabled",
                file.header().start_time_raw
            ),
        ),
    }
}

fn check_ranges(file: &DecodedFile) -> ValidationCheck {
    const NAME: &str = "Channel range codes";
    let unknown: Vec<String> = file
        .header()
        .channel_range
        .iter()
        .enumerate()
        .filter(|&(_, &code)| usize::try_from(code).map_or(true, |c| c >= RANGE_TABLE.len()))
        .map(|(c, code)| format!("CH{}={}", c, code))
        .collect();

    if unknown.is_empty() {
        ValidationCheck::ok(NAME)
    } else {
        ValidationCheck::warning(NAME, format!("unknown codes fall back to 5 V: {}", unknown.join(", ")))
    }
}

fn check_point_counts(file: &DecodedFile) -> ValidationCheck {
    const NAME: &str = "Point counts";
    for c in 0..RAW_CHANNEL_COUNT {
        let expected = file.header().expected_points(c);
        let channel = &file.channels()[c];
        if channel.point_count() != expected || channel.time.len() != channel.values.len() {
            return ValidationCheck::failed(
                NAME,
                format!("CH{} has {} points, expected {}", c, channel.point_count(), expected),
            );
        }
    }
    ValidationCheck::ok(NAME)
}

fn check_time_axes(file: &DecodedFile) -> ValidationCheck {
    const NAME: &str = "Time axes";
    let interval = file.header().sampling_interval_ns;
    for channel in file.channels() {
        if !channel.time.windows(2).all(|w| w[0] <= w[1]) {
            return ValidationCheck::failed(NAME, format!("{} time axis decreases", channel.id));
        }
        let off_axis = channel
            .time
            .iter()
            .enumerate()
            .any(|(i, &t)| t != sample_time(i, interval, channel.downsampling_factor));
        if off_axis {
            return ValidationCheck::failed(NAME, format!("{} time axis does not match its sampling interval", channel.id));
        }
    }
    if interval == 0 {
        return ValidationCheck::warning(NAME, "sampling interval is zero; all samples share t = 0");
    }
    ValidationCheck::ok(NAME)
}

fn check_finite<'a>(channels: impl Iterator<Item = &'a Channel>) -> ValidationCheck {
    const NAME: &str = "Finite values";
    for channel in channels {
        if let Some(i) = channel.values.iter().position(|v| !v.is_finite()) {
            return ValidationCheck::failed(NAME, format!("{} sample {} is not finite", channel.id, i));
        }
    }
    ValidationCheck::ok(NAME)
}

fn check_labels(file: &DecodedFile) -> ValidationCheck {
    const NAME: &str = "Labels and units";
    let blank: Vec<String> = file
        .channels()
        .iter()
        .filter(|c| c.label.trim().is_empty() || c.unit.trim().is_empty())
        .map(|c| c.id.to_string())
        .collect();
    if blank.is_empty() {
        ValidationCheck::ok(NAME)
    } else {
        ValidationCheck::warning(NAME, format!("missing label or unit: {}", blank.join(", ")))
    }
}

fn check_derived(derived: &DerivedSet) -> ValidationCheck {
    const NAME: &str = "Derived channels";
    if derived.warnings().is_empty() {
        ValidationCheck::ok(NAME)
    } else {
        let messages: Vec<String> = derived.warnings().iter().map(ToString::to_string).collect();
        ValidationCheck::warning(NAME, messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{encode, FileHeader};

    fn decoded(header: &FileHeader) -> DecodedFile {
        let samples: [Vec<i16>; RAW_CHANNEL_COUNT] =
            std::array::from_fn(|c| vec![100; header.stored_samples(c)]);
        crate::format::decode(&encode(header, &samples).unwrap()).unwrap()
    }

    #[test]
    fn test_clean_file_passes_with_timestamp_warning() {
        let file = decoded(&FileHeader::new(16, 1000));
        let derived = derive(file.channels());
        let report = validate_decoded("mem", &file, &derived);

        assert!(!report.has_failures());
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.issues().next().unwrap().name, "Start timestamp");
    }

    #[test]
    fn test_unknown_range_code_warns() {
        let mut header = FileHeader::new(4, 1000);
        header.channel_range[2] = 99;
        header.start_time_raw = crate::format::timestamp::EPOCH_OFFSET_TICKS + 36_000_000_000;
        let file = decoded(&header);
        let report = validate_decoded("mem", &file, &derive(file.channels()));

        let issues: Vec<&ValidationCheck> = report.issues().collect();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].name, "Channel range codes");
        assert!(matches!(&issues[0].status, CheckStatus::Warning(msg) if msg.contains("CH2=99")));
    }

    #[test]
    fn test_missing_file_fails() {
        let report = validate_file("/nonexistent/run.dat");
        assert!(report.has_failures());
        assert!(report.to_string().contains("Validation FAILED"));
    }
}
