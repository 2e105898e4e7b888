use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use daqfile::derive::derive;
use daqfile::format::{decode, encode, FileHeader, RAW_CHANNEL_COUNT};

/// Build an encoded file with `rows` rows and mixed downsampling factors
fn create_test_buffer(rows: u32) -> Vec<u8> {
    let mut header = FileHeader::new(rows, 100_000);
    header.downsampling_factor = [1, 1, 1, 1, 1, 1, 4, 4];
    let samples: [Vec<i16>; RAW_CHANNEL_COUNT] = std::array::from_fn(|c| {
        (0..header.stored_samples(c))
            .map(|i| ((i * 31 + c * 7) % 20_000) as i16 - 10_000)
            .collect()
    });
    encode(&header, &samples).unwrap()
}

/// Benchmark whole-buffer decoding
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for rows in [10_000u32, 100_000, 1_000_000] {
        let buffer = create_test_buffer(rows);
        group.throughput(Throughput::Bytes(buffer.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(format!("{}rows", rows)), &buffer, |b, buffer| {
            b.iter(|| {
                let file = decode(black_box(buffer)).unwrap();
                black_box(file);
            });
        });
    }

    group.finish();
}

/// Benchmark the derived channel pass
fn bench_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive");

    for rows in [100_000u32, 1_000_000] {
        let file = decode(&create_test_buffer(rows)).unwrap();
        group.throughput(Throughput::Elements(u64::from(rows)));
        group.bench_with_input(BenchmarkId::from_parameter(format!("{}rows", rows)), &file, |b, file| {
            b.iter(|| black_box(derive(black_box(file.channels()))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_derive);
criterion_main!(benches);
