mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use floorsight::geometry::Point;
use floorsight::isovist::{visibility_polygon, visibility_polygon_with, IsovistConfig};

const PILLARS_PER_SIDE: [usize; 4] = [1, 3, 6, 10];

fn isovist_single_query_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("isovist/single_query");
    // Between the first two pillar rows, so the viewpoint is free for every lattice size.
    let viewpoint = Point::new(common::ROOM * 0.013, common::ROOM * 0.017);

    for &per_side in &PILLARS_PER_SIDE {
        let plan = common::pillar_hall(per_side);
        group.throughput(common::elements_throughput(plan.segments().len()));

        group.bench_with_input(BenchmarkId::from_parameter(per_side), &plan, |b, plan| {
            b.iter(|| {
                let vis = visibility_polygon(plan, black_box(viewpoint)).expect("free viewpoint");
                black_box(vis.len());
            });
        });
    }

    group.finish();
}

fn isovist_simplify_benches(c: &mut Criterion) {
    let plan = common::pillar_hall(6);
    let viewpoint = Point::new(common::ROOM * 0.013, common::ROOM * 0.017);
    let mut group = c.benchmark_group("isovist/simplify");

    for simplify in [false, true] {
        let config = IsovistConfig::new().with_simplify(simplify);
        group.bench_with_input(BenchmarkId::from_parameter(simplify), &config, |b, config| {
            b.iter(|| {
                let vis = visibility_polygon_with(&plan, black_box(viewpoint), config)
                    .expect("free viewpoint");
                black_box(vis.area());
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = isovist_single_query_benches, isovist_simplify_benches
}
criterion_main!(benches);
