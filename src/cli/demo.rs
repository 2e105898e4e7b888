//! Synthetic measurement file generator.
//!
//! Produces a three-phase drive recording: two line voltages, four phase
//! currents (two groups) and two load cells sampled at a quarter rate, with
//! occasional current spikes so resampling has something to preserve.

use anyhow::{Context, Result};
use log::info;
use std::f64::consts::PI;
use std::path::PathBuf;

use daqfile::format::timestamp::{EPOCH_OFFSET_TICKS, TICKS_PER_MS};
use daqfile::format::{encode_file, FileHeader, RAW_CHANNEL_COUNT};

const MAX_ADC: i16 = 32512;
const LINE_HZ: f64 = 50.0;
const SPIKE_EVERY: usize = 5_000;

/// Generate a demo file
pub fn run(output: PathBuf, rows: u32, interval_ns: u32) -> Result<()> {
    info!("Generating {} rows at {} ns into {}", rows, interval_ns, output.display());

    let header = demo_header(rows, interval_ns);
    let samples = demo_samples(&header);
    encode_file(&output, &header, &samples)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let total: usize = samples.iter().map(Vec::len).sum();
    println!(
        "Wrote {} ({} rows, {} samples, {:.3} s)",
        output.display(),
        rows,
        total,
        f64::from(rows) * f64::from(interval_ns) / 1e9
    );
    Ok(())
}

fn demo_header(rows: u32, interval_ns: u32) -> FileHeader {
    let mut header = FileHeader::new(rows, interval_ns);
    header.header = format!("daqfile demo v{}", env!("CARGO_PKG_VERSION"));
    header.max_adc_value = MAX_ADC;

    // UTC-tagged ticks for "now"
    let now_ms = chrono::Utc::now().timestamp_millis();
    header.start_time_raw = (now_ms * TICKS_PER_MS + EPOCH_OFFSET_TICKS) | (1 << 62);

    header.channel_range = [10, 10, 8, 8, 8, 8, 7, 7];
    header.channel_scaling = [1000, 1000, 35, 35, 35, 35, 1000, 1000];
    header.downsampling_factor = [1, 1, 1, 1, 1, 1, 4, 4];
    header.unit = ["V", "V", "A", "A", "A", "A", "mV", "mV"].map(String::from);
    header.label = ["UL1L2", "UL2L3", "IL1GR1", "IL3GR1", "IL1GR2", "IL3GR2", "F1", "F2"].map(String::from);
    header
}

fn demo_samples(header: &FileHeader) -> [Vec<i16>; RAW_CHANNEL_COUNT] {
    let dt = f64::from(header.sampling_interval_ns) / 1e9;
    let full = f64::from(MAX_ADC);

    std::array::from_fn(|c| {
        let factor = header.downsampling_factor[c] as usize;
        let phase = match c {
            0 | 2 | 4 => 0.0,
            _ => 2.0 * PI / 3.0,
        };
        (0..header.stored_samples(c))
            .map(|i| {
                let t = (i * factor) as f64 * dt;
                let value = match c {
                    0 | 1 => 0.6 * (2.0 * PI * LINE_HZ * t + phase).sin(),
                    2..=5 => {
                        let base = 0.3 * (2.0 * PI * LINE_HZ * t + phase).sin();
                        if i > 0 && i % SPIKE_EVERY == 0 {
                            0.95
                        } else {
                            base
                        }
                    }
                    _ => 0.4 + 0.1 * (2.0 * PI * 0.5 * t).sin() + 0.05 * c as f64,
                };
                (value * full).round().clamp(-full, full) as i16
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use daqfile::format::{decode, encode, FormatVersion};

    #[test]
    fn test_demo_file_decodes() {
        let header = demo_header(2_000, 100_000);
        let bytes = encode(&header, &demo_samples(&header)).unwrap();
        let file = decode(&bytes).unwrap();

        assert_eq!(file.header().format_version(), FormatVersion::Current);
        assert!(file.header().start_time().is_available());
        assert_eq!(file.channels()[6].point_count(), 500);
        assert_eq!(file.channels()[2].label, "IL1GR1");
    }
}
