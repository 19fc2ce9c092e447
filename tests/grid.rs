//! Grid layer behaviour seen from outside the crate.

mod common;

use std::time::{Duration, Instant};

use common::open_grid;
use marga_nav::{GridConfig, GridCoord, MarkOutcome, NavGrid, WorldPoint};

fn offset_grid() -> NavGrid {
    NavGrid::with_dimensions(100, 80, 0.25, WorldPoint::new(-12.5, 40.0))
}

#[test]
fn coordinates_round_trip_on_offset_grid() {
    let grid = offset_grid();
    for x in (0..100).step_by(7) {
        for z in (0..80).step_by(9) {
            let c = GridCoord::new(x, z);
            assert_eq!(grid.world_to_grid(grid.grid_to_world(c)), c);
        }
    }
}

#[test]
fn centered_grid_from_config() {
    let grid = NavGrid::new(GridConfig {
        size_x: 100,
        size_z: 100,
        cell_size: 2.0,
        ..Default::default()
    });
    assert_eq!(grid.origin(), WorldPoint::new(-100.0, -100.0));
    assert_eq!(grid.world_to_grid(WorldPoint::ZERO), GridCoord::new(50, 50));
}

#[test]
fn marking_walk_trail() {
    let mut grid = offset_grid();
    let start = Instant::now();
    let mut accepted = 0;
    for i in 0..40 {
        // 10 ms apart, 0.5 units apart: throttled unless 5 units travelled
        let p = WorldPoint::new(-10.0 + i as f32 * 0.5, 45.0);
        if grid.mark_walkable_area_at(p, 3, start + Duration::from_millis(10 * i)) != MarkOutcome::Throttled {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 4);
    assert!(grid.is_walkable(grid.world_to_grid(WorldPoint::new(-10.0, 45.0))));
}

#[test]
fn same_mark_twice_changes_nothing() {
    let mut grid = offset_grid();
    let now = Instant::now();
    let p = WorldPoint::new(0.0, 50.0);
    grid.mark_walkable_area_at(p, 3, now);
    let snapshot = grid.walkable_layer().to_vec();
    assert_eq!(grid.mark_walkable_area_at(p, 3, now), MarkOutcome::Throttled);
    assert_eq!(grid.walkable_layer(), snapshot.as_slice());
}

#[test]
fn walkable_and_blacklisted_coexist() {
    let mut grid = open_grid(20);
    let changed = grid.blacklist_cells(WorldPoint::new(10.0, 10.0), 1.0);
    assert_eq!(changed.len(), 5);
    let stats = grid.stats();
    assert_eq!(stats.walkable, 400);
    assert_eq!(stats.walkable_and_blacklisted, 5);
    assert!((stats.walkable_ratio() - 395.0 / 400.0).abs() < 1e-6);
}

#[test]
fn nearest_walkable_respects_ring_limit() {
    let mut grid = NavGrid::with_dimensions(60, 60, 1.0, WorldPoint::ZERO);
    grid.set_walkable(GridCoord::new(50, 5), true);
    let far = WorldPoint::new(5.0, 5.0);
    // 45 rings away: beyond the default limit of 20
    assert_eq!(grid.find_nearest_walkable(far), far);
    let near = WorldPoint::new(35.0, 5.0);
    assert_eq!(grid.find_nearest_walkable(near), WorldPoint::new(50.0, 5.0));
}

#[test]
fn repaired_corridor_is_routable() {
    let mut grid = NavGrid::with_dimensions(40, 40, 1.0, WorldPoint::ZERO);
    let a = WorldPoint::new(3.0, 3.0);
    let b = WorldPoint::new(35.0, 30.0);
    grid.ensure_path_exists(a, b);
    let result = marga_nav::pathfinding::find_path(&grid, a, b);
    assert!(result.success);
}
