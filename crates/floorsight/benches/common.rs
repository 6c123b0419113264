#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use floorsight::floorplan::FloorPlan;
use floorsight::geometry::Polygon;
use floorsight::sensitivity::{Feature, FeatureTable};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);

/// Side length of the square benchmark room.
pub const ROOM: f64 = 1000.0;

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Square room with `per_side * per_side` square pillars on a regular lattice.
pub fn pillar_hall(per_side: usize) -> FloorPlan {
    let boundary = Polygon::from_xy(&[[0.0, 0.0], [ROOM, 0.0], [ROOM, ROOM], [0.0, ROOM]]);
    let pitch = ROOM / (per_side as f64 + 1.0);
    let half = pitch * 0.15;
    let mut pillars = Vec::with_capacity(per_side * per_side);
    for i in 1..=per_side {
        for j in 1..=per_side {
            let (cx, cy) = (i as f64 * pitch, j as f64 * pitch);
            pillars.push(Polygon::from_xy(&[
                [cx - half, cy - half],
                [cx + half, cy - half],
                [cx + half, cy + half],
                [cx - half, cy + half],
            ]));
        }
    }
    FloorPlan::build(boundary, pillars).expect("valid benchmark plan")
}

/// One feature on every obstacle of `plan`.
pub fn features_on_all(plan: &FloorPlan) -> FeatureTable {
    (1..=plan.obstacle_count())
        .map(|index| Feature::anchored_to(plan, index).expect("obstacle exists"))
        .collect()
}
