//! Shared helpers for integration tests.

#![allow(dead_code)]

use marga_nav::{GridCoord, NavGrid, WorldPoint};

/// Initialise logging once; repeated calls are harmless
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fully walkable square grid anchored at the world origin
pub fn open_grid(size: usize) -> NavGrid {
    let mut grid = NavGrid::with_dimensions(size, size, 1.0, WorldPoint::ZERO);
    let max = size as i32 - 1;
    grid.fill_walkable_rect(GridCoord::new(0, 0), GridCoord::new(max, max));
    grid
}

/// 50x50 open grid with a blacklisted wall across x = 24..=26,
/// open only at z = 30..=31
pub fn gapped_wall_grid() -> NavGrid {
    let mut grid = open_grid(50);
    for x in 24..=26 {
        for z in 0..50 {
            if !(30..=31).contains(&z) {
                grid.set_blacklisted(GridCoord::new(x, z), true);
            }
        }
    }
    grid
}

/// Two rooms joined by a one-cell-wide door, everything else unwalkable
pub fn two_rooms() -> NavGrid {
    let mut grid = NavGrid::with_dimensions(60, 30, 1.0, WorldPoint::ZERO);
    grid.fill_walkable_rect(GridCoord::new(2, 2), GridCoord::new(25, 27));
    grid.fill_walkable_rect(GridCoord::new(34, 2), GridCoord::new(57, 27));
    grid.fill_walkable_rect(GridCoord::new(26, 14), GridCoord::new(33, 14));
    grid
}

/// Consecutive points must be in the same or adjacent cells without
/// cutting a blocked corner
pub fn assert_grid_connected(grid: &NavGrid, route: &[WorldPoint]) {
    for pair in route.windows(2) {
        let a = grid.world_to_grid(pair[0]);
        let b = grid.world_to_grid(pair[1]);
        assert!(a.chebyshev_distance(&b) <= 1, "jump {:?} -> {:?}", a, b);
        if a.x != b.x && a.z != b.z {
            assert!(
                grid.is_passable(GridCoord::new(b.x, a.z)) && grid.is_passable(GridCoord::new(a.x, b.z)),
                "corner cut between {:?} and {:?}",
                a,
                b
            );
        }
    }
}
