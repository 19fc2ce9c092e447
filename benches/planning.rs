//! Benchmark route planning.
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use marga_nav::pathfinding::{AStarPlanner, BidirectionalPlanner, PathShaper};
use marga_nav::{GridCoord, NavGrid, RoutePlanner, WorldPoint};

/// Open square grid with a blacklisted wall every 40 cells, each with one gap.
fn office_grid(size: usize) -> NavGrid {
    let mut grid = NavGrid::with_dimensions(size, size, 1.0, WorldPoint::ZERO);
    let max = size as i32 - 1;
    grid.fill_walkable_rect(GridCoord::new(0, 0), GridCoord::new(max, max));

    for (i, x) in (40..max).step_by(40).enumerate() {
        let gap = if i % 2 == 0 { max - 6 } else { 4 };
        for z in 0..=max {
            if (z - gap).abs() > 1 {
                grid.set_blacklisted(GridCoord::new(x, z), true);
            }
        }
    }
    grid
}

fn corner_to_corner(size: usize) -> (WorldPoint, WorldPoint) {
    let far = size as f32 - 3.0;
    (WorldPoint::new(2.0, 2.0), WorldPoint::new(far, far))
}

fn bench_astar(c: &mut Criterion) {
    let mut group = c.benchmark_group("astar");

    for size in [100usize, 200, 400] {
        let grid = office_grid(size);
        let (start, goal) = corner_to_corner(size);

        group.bench_with_input(BenchmarkId::new("plain", size), &size, |b, _| {
            let planner = AStarPlanner::with_defaults(&grid);
            b.iter(|| black_box(planner.find_path(black_box(start), black_box(goal))))
        });
        group.bench_with_input(BenchmarkId::new("bidirectional", size), &size, |b, _| {
            let planner = BidirectionalPlanner::with_defaults(&grid);
            b.iter(|| black_box(planner.find_path(black_box(start), black_box(goal))))
        });
    }

    group.finish();
}

fn bench_shaping(c: &mut Criterion) {
    let grid = office_grid(200);
    let (start, goal) = corner_to_corner(200);
    let raw = AStarPlanner::with_defaults(&grid).find_path(start, goal).path;
    let shaper = PathShaper::with_defaults(&grid);

    c.bench_function("shape_route", |b| {
        b.iter(|| black_box(shaper.shape(black_box(&raw))))
    });
}

fn bench_cached_planning(c: &mut Criterion) {
    let grid = office_grid(200);
    let (start, goal) = corner_to_corner(200);
    let planner = RoutePlanner::with_defaults();
    planner.find_path(&grid, start, goal);

    c.bench_function("cached_route", |b| {
        b.iter(|| black_box(planner.find_path(&grid, black_box(start), black_box(goal))))
    });
}

criterion_group!(benches, bench_astar, bench_shaping, bench_cached_planning);
criterion_main!(benches);
