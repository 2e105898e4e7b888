//! Integration tests for daqfile
//!
//! These tests run the full pipeline from an on-disk file through decoding,
//! derivation, resampling and validation.

use daqfile::prelude::*;
use daqfile::format::timestamp::EPOCH_OFFSET_TICKS;
use daqfile::format::{encode, encode_file, RAW_CHANNEL_COUNT};
use tempfile::tempdir;

/// Header resembling a drive test-bench recording
fn bench_header(rows: u32) -> FileHeader {
    let mut header = FileHeader::new(rows, 200_000);
    header.header = "Prüfstand 3 / Lauf 17".to_string();
    header.start_time_raw = EPOCH_OFFSET_TICKS + 17_000_000_000_000_000;
    header.max_adc_value = 32512;
    header.channel_range = [10, 10, 8, 8, 8, 8, 7, 7];
    header.channel_scaling = [1000, 1000, 35, 35, 35, 35, 1000, 1000];
    header.downsampling_factor = [1, 1, 2, 2, 2, 2, 8, 8];
    header.unit = ["V", "V", "A", "A", "A", "A", "mV", "mV"].map(String::from);
    header.label = ["UL1L2", "UL2L3", "IL1GR1", "IL3GR1", "IL1GR2", "IL3GR2", "F1", "F2"].map(String::from);
    header
}

fn bench_samples(header: &FileHeader) -> [Vec<i16>; RAW_CHANNEL_COUNT] {
    std::array::from_fn(|c| {
        (0..header.stored_samples(c))
            .map(|i| (((i * 97 + c * 1000) % 4000) as i16) - 2000)
            .collect()
    })
}

/// Test the complete decode-derive-resample cycle from disk
#[test]
fn test_file_pipeline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.dat");
    let header = bench_header(4_000);
    let samples = bench_samples(&header);
    encode_file(&path, &header, &samples).unwrap();

    let file = decode_file(&path).unwrap();
    assert_eq!(file.header(), &header);
    assert_eq!(file.header().start_time().unix_ms(), Some(1_700_000_000_000));

    // point counts per channel
    let counts: Vec<usize> = file.channels().iter().map(|c| c.point_count()).collect();
    assert_eq!(counts, vec![4000, 4000, 2000, 2000, 2000, 2000, 500, 500]);

    // physical values follow the converter
    for c in 0..RAW_CHANNEL_COUNT {
        for i in [0, 1, samples[c].len() - 1] {
            let expected = to_physical(
                samples[c][i],
                header.max_adc_value,
                header.channel_range[c],
                header.channel_scaling[c],
            )
            .unwrap();
            assert_eq!(file.channels()[c].values[i], expected);
        }
    }

    let derived = derive(file.channels());
    assert_eq!(derived.len(), 7);
    assert!(derived.warnings().is_empty());
    assert_eq!(derived.get("D3").unwrap().point_count(), 2000);
    assert_eq!(derived.get("D6").unwrap().downsampling_factor, 8);

    // full-range view of a 4000-point channel with a 400-point budget
    let view = resample(&file.channels()[0], 0.0, f32::INFINITY, 400);
    assert!(!view.is_empty());
    // the window stops one sample short of the end; 3999 samples in buckets of 9
    let count = file.channels()[0].point_count() - 1;
    let step = count / 400;
    let buckets = count.div_ceil(step);
    assert_eq!(buckets, 445);
    assert!(view.len() >= buckets && view.len() <= 3 * buckets);

    // zoomed view within budget is exact
    let zoom = resample(&file.channels()[0], 0.1, 0.12, 400);
    assert_eq!(zoom.len(), 100);
    assert_eq!(zoom.values[..], file.channels()[0].values[500..600]);

    let stats = statistics(derived.get("D5").unwrap());
    assert_eq!(stats.count, 4000);
    assert!(stats.min >= 0.0);
}

/// Decoded data can be queried from several threads without locking
#[test]
fn test_concurrent_resampling() {
    let header = bench_header(10_000);
    let bytes = encode(&header, &bench_samples(&header)).unwrap();
    let file = decode(&bytes).unwrap();
    let derived = derive(file.channels());
    let expected = resample(derived.get("D3").unwrap(), 0.0, 2.0, 100);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| resample(derived.get("D3").unwrap(), 0.0, 2.0, 100)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

/// Truncated files return an error, never a partial file
#[test]
fn test_truncated_file_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cut.dat");
    let header = bench_header(100);
    let bytes = encode(&header, &bench_samples(&header)).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    let err = decode_file(&path).unwrap_err();
    assert!(matches!(err, DecodeError::Truncated { .. }));
    assert!(err.offset().unwrap() <= bytes.len() / 2);
}

/// Missing files surface as I/O errors
#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let err = decode_file(dir.path().join("absent.dat")).unwrap_err();
    assert!(matches!(err, DecodeError::Io(_)));
}

/// Validation of a well-formed file passes
#[test]
fn test_validate_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.dat");
    let header = bench_header(256);
    encode_file(&path, &header, &bench_samples(&header)).unwrap();

    let report = validate_file(&path);
    assert!(!report.has_failures(), "{}", report);
    assert!(!report.has_warnings(), "{}", report);
}
