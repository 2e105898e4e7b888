//! Property-based tests for decoding and resampling invariants

use daqfile::channel::{sample_time, Channel, ChannelId};
use daqfile::format::{decode, encode, to_physical, FileHeader, RAW_CHANNEL_COUNT};
use daqfile::resample::{resample, window};
use proptest::prelude::*;

fn header_strategy() -> impl Strategy<Value = FileHeader> {
    (
        0u32..300,
        1u32..2_000_000,
        prop::array::uniform8(1i32..12),
        prop::array::uniform8(-2i32..16),
        prop::array::uniform8(-2000i16..2000),
        prop_oneof![Just(i16::MAX), 1i16..32767, -32768i16..-1],
    )
        .prop_map(|(rows, interval, factors, ranges, scalings, max_adc)| {
            let mut header = FileHeader::new(rows, interval);
            header.downsampling_factor = factors;
            header.channel_range = ranges;
            header.channel_scaling = scalings;
            header.max_adc_value = max_adc;
            header
        })
}

fn samples_for(header: &FileHeader, seed: u64) -> [Vec<i16>; RAW_CHANNEL_COUNT] {
    std::array::from_fn(|c| {
        (0..header.stored_samples(c))
            .map(|i| (seed.wrapping_mul(6364136223846793005).wrapping_add((i * 8 + c) as u64) >> 48) as i16)
            .collect()
    })
}

fn channel(values: Vec<f32>, interval_ns: u32) -> Channel {
    let time = (0..values.len()).map(|i| sample_time(i, interval_ns, 1)).collect();
    Channel::from_parts(ChannelId::Raw(0), "CH0", "mV", 1, interval_ns, time, values)
}

proptest! {
    /// Every raw channel has floor(rows / factor) points on the expected time axis
    #[test]
    fn test_decoded_layout_invariants(header in header_strategy(), seed in any::<u64>()) {
        let samples = samples_for(&header, seed);
        let file = decode(&encode(&header, &samples).unwrap()).unwrap();

        for (c, ch) in file.channels().iter().enumerate() {
            let factor = header.downsampling_factor[c] as u32;
            prop_assert_eq!(ch.point_count(), (header.buffer_size / factor) as usize);
            for (i, &t) in ch.time.iter().enumerate() {
                let expected = i as f64 * f64::from(header.sampling_interval_ns) * f64::from(factor) / 1e9;
                prop_assert!((f64::from(t) - expected).abs() <= expected * 1e-6 + 1e-9);
            }
            for (i, &v) in ch.values.iter().enumerate() {
                let expected = to_physical(
                    samples[c][i],
                    header.max_adc_value,
                    header.channel_range[c],
                    header.channel_scaling[c],
                ).unwrap();
                prop_assert_eq!(v, expected);
            }
        }
    }

    /// Arbitrary bytes never panic the decoder
    #[test]
    fn test_decode_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode(&bytes);
    }

    /// Windows that fit the budget come back unmodified
    #[test]
    fn test_resample_identity(
        values in prop::collection::vec(-1e6f32..1e6, 1..400),
        a in 0.0f32..0.5,
        b in 0.0f32..0.5,
        max_points in 1u32..500,
    ) {
        let ch = channel(values, 1_000_000);
        let (start, end) = (a.min(b), a.max(b));
        let (s, e) = window(&ch.time, start, end);
        let out = resample(&ch, start, end, max_points);

        if e > s && e - s <= max_points as usize {
            prop_assert_eq!(&out.time[..], &ch.time[s..e]);
            prop_assert_eq!(&out.values[..], &ch.values[s..e]);
        }
    }

    /// Reduced output stays within one to three points per bucket and
    /// every value lies within the window's range
    #[test]
    fn test_resample_bounds(
        values in prop::collection::vec(-1e3f32..1e3, 2..3000),
        max_points in 1u32..200,
    ) {
        let ch = channel(values, 250_000);
        let (s, e) = window(&ch.time, 0.0, f32::INFINITY);
        let count = e - s;
        let out = resample(&ch, 0.0, f32::INFINITY, max_points);

        if count > max_points as usize {
            let step = count / max_points as usize;
            let buckets = count.div_ceil(step);
            prop_assert!(out.len() >= buckets);
            prop_assert!(out.len() <= 3 * buckets);

            let lo = ch.values[s..e].iter().copied().fold(f32::INFINITY, f32::min);
            let hi = ch.values[s..e].iter().copied().fold(f32::NEG_INFINITY, f32::max);
            for &v in &out.values {
                prop_assert!(v >= lo - 1e-3 && v <= hi + 1e-3);
            }
        }
    }
}
