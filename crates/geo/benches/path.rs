//! Benchmarks for route path reconstruction.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rutekita_geo::{sum_costs, GeoPath};

fn create_segments(segments: usize, points_per_segment: usize) -> Vec<Vec<[f64; 2]>> {
    (0..segments)
        .map(|s| {
            (0..points_per_segment)
                .map(|p| {
                    // Walk south-east from the depot
                    let step = (s * points_per_segment + p) as f64 * 0.0001;
                    [106.8062 + step, -6.2555 - step]
                })
                .collect()
        })
        .collect()
}

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten_segments");

    for size in [10, 100, 1000].iter() {
        let segments = create_segments(*size, 8);
        group.bench_with_input(BenchmarkId::new("from_lon_lat_segments", size), size, |b, _| {
            b.iter(|| GeoPath::from_lon_lat_segments(black_box(segments.clone())))
        });
    }

    group.finish();
}

fn bench_length(c: &mut Criterion) {
    let path = GeoPath::from_lon_lat_segments(create_segments(1000, 8));
    let costs: Vec<f64> = (0..1000).map(|i| i as f64 * 0.01).collect();

    c.bench_function("path_length_km", |b| b.iter(|| black_box(&path).length_km()));
    c.bench_function("sum_costs", |b| b.iter(|| sum_costs(black_box(costs.iter().copied()))));
}

criterion_group!(benches, bench_flatten, bench_length);
criterion_main!(benches);
