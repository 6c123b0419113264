mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use floorsight::cancel::CancelToken;
use floorsight::heatmap::{compute_heatmap, HeatmapConfig};

const SPACINGS: [f64; 3] = [100.0, 50.0, 25.0];

fn heatmap_spacing_benches(c: &mut Criterion) {
    let plan = common::pillar_hall(3);
    let features = common::features_on_all(&plan);
    let cancel = CancelToken::new();
    let mut group = c.benchmark_group("heatmap/spacing");

    for &spacing in &SPACINGS {
        let cells = (common::ROOM / spacing).ceil() as usize;
        group.throughput(common::elements_throughput(cells * cells));
        let config = HeatmapConfig::new(spacing);

        group.bench_with_input(BenchmarkId::from_parameter(spacing), &config, |b, config| {
            b.iter(|| {
                let grid = compute_heatmap(&plan, &features, config, &cancel).expect("heatmap");
                black_box(grid.stats().sampled);
            });
        });
    }

    group.finish();
}

fn heatmap_threads_benches(c: &mut Criterion) {
    let plan = common::pillar_hall(3);
    let features = common::features_on_all(&plan);
    let cancel = CancelToken::new();
    let mut group = c.benchmark_group("heatmap/threads");

    for threads in [1usize, 2, 4] {
        let config = HeatmapConfig::new(50.0).with_threads(Some(threads));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &config, |b, config| {
            b.iter(|| {
                let grid = compute_heatmap(&plan, &features, config, &cancel).expect("heatmap");
                black_box(grid.max_score());
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = heatmap_spacing_benches, heatmap_threads_benches
}
criterion_main!(benches);
