use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use daqfile::channel::{sample_time, Channel, ChannelId};
use daqfile::resample::{resample, statistics};

/// Noisy sine channel with a spike every 10k samples
fn create_test_channel(points: usize) -> Channel {
    let time = (0..points).map(|i| sample_time(i, 100_000, 1)).collect();
    let values = (0..points)
        .map(|i| {
            let base = 100.0 * (i as f32 * 0.01).sin() + ((i * 7919) % 13) as f32;
            if i % 10_000 == 0 { base + 500.0 } else { base }
        })
        .collect();
    Channel::from_parts(ChannelId::Raw(0), "CH0", "mV", 1, 100_000, time, values)
}

/// Benchmark full-range reduction at several budgets
fn bench_resample_full_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample_full_range");
    let channel = create_test_channel(1_000_000);

    for max_points in [500u32, 2_000, 10_000] {
        group.throughput(Throughput::Elements(channel.point_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(max_points), &max_points, |b, &max_points| {
            b.iter(|| {
                let series = resample(&channel, 0.0, f32::INFINITY, black_box(max_points));
                black_box(series);
            });
        });
    }

    group.finish();
}

/// Benchmark a zoomed window that fits the budget
fn bench_resample_zoom(c: &mut Criterion) {
    let channel = create_test_channel(1_000_000);
    c.bench_function("resample_zoom_identity", |b| {
        b.iter(|| black_box(resample(&channel, black_box(10.0), black_box(10.1), 2_000)));
    });
}

/// Benchmark single-pass statistics
fn bench_statistics(c: &mut Criterion) {
    let channel = create_test_channel(1_000_000);
    c.bench_function("statistics_1m", |b| {
        b.iter(|| black_box(statistics(black_box(&channel))));
    });
}

criterion_group!(benches, bench_resample_full_range, bench_resample_zoom, bench_statistics);
criterion_main!(benches);
