//! A* pathfinding on the navigation grid.
//!
//! - 8-connected movement without corner cutting
//! - Walkable, non-blacklisted cells only
//! - Wall and blacklist proximity penalties that bias ordering
//! - Plain and bidirectional variants sharing one frontier implementation

mod bidirectional;
mod frontier;
mod planner;
mod types;

pub use bidirectional::BidirectionalPlanner;
pub use planner::AStarPlanner;
pub use types::{PathFailure, PathResult, PlannerConfig};

use crate::core::WorldPoint;
use crate::grid::NavGrid;

/// Quick path finding with default configuration
pub fn find_path(grid: &NavGrid, start: WorldPoint, goal: WorldPoint) -> PathResult {
    AStarPlanner::with_defaults(grid).find_path(start, goal)
}

/// Check if a path exists
pub fn path_exists(grid: &NavGrid, start: WorldPoint, goal: WorldPoint) -> bool {
    find_path(grid, start, goal).success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GridCoord;

    fn open_grid(size: usize) -> NavGrid {
        let mut grid = NavGrid::with_dimensions(size, size, 1.0, WorldPoint::ZERO);
        grid.fill_walkable_rect(GridCoord::new(0, 0), GridCoord::new(size as i32 - 1, size as i32 - 1));
        grid
    }

    /// Blacklisted wall across x = 24..=26 with a gap at z = 30..=31
    fn gapped_wall_grid() -> NavGrid {
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

    fn assert_route_valid(grid: &NavGrid, route: &[WorldPoint]) {
        for pair in route.windows(2) {
            let a = grid.world_to_grid(pair[0]);
            let b = grid.world_to_grid(pair[1]);
            assert!(a.chebyshev_distance(&b) <= 1, "jump {:?} -> {:?}", a, b);
            if a.x != b.x && a.z != b.z {
                assert!(grid.is_passable(GridCoord::new(b.x, a.z)), "corner cut at {:?}", a);
                assert!(grid.is_passable(GridCoord::new(a.x, b.z)), "corner cut at {:?}", a);
            }
        }
    }

    #[test]
    fn test_simple_path() {
        let grid = open_grid(30);
        let start = WorldPoint::new(2.0, 15.0);
        let goal = WorldPoint::new(27.0, 15.0);

        let result = find_path(&grid, start, goal);
        assert!(result.success);
        assert_eq!(result.path.first(), Some(&start));
        assert_eq!(result.path.last(), Some(&goal));
        assert!(result.nodes_expanded > 0);
        assert_route_valid(&grid, &result.path);
    }

    #[test]
    fn test_path_avoids_blacklisted_wall() {
        let grid = gapped_wall_grid();
        let result = find_path(&grid, WorldPoint::new(5.0, 5.0), WorldPoint::new(45.0, 5.0));
        assert!(result.success);
        for p in &result.path {
            let c = grid.world_to_grid(*p);
            if (24..=26).contains(&c.x) {
                assert!((30..=31).contains(&c.z), "crossed wall at {:?}", c);
            }
        }
        assert_route_valid(&grid, &result.path);
    }

    #[test]
    fn test_no_path_when_sealed() {
        let mut grid = open_grid(20);
        for z in 0..20 {
            grid.set_walkable(GridCoord::new(10, z), false);
        }
        let result = find_path(&grid, WorldPoint::new(2.0, 2.0), WorldPoint::new(18.0, 2.0));
        assert!(!result.success);
        assert_eq!(result.failure_reason, Some(PathFailure::NoPath));
        assert!(result.path.is_empty());
    }

    #[test]
    fn test_iteration_cap() {
        let grid = open_grid(60);
        let config = PlannerConfig {
            max_iterations: 10,
            ..Default::default()
        };
        let result = AStarPlanner::new(&grid, config).find_path(WorldPoint::new(1.0, 1.0), WorldPoint::new(58.0, 58.0));
        assert_eq!(result.failure_reason, Some(PathFailure::MaxIterationsExceeded));
    }

    #[test]
    fn test_diagonal_blocked_by_cardinal() {
        let mut grid = open_grid(10);
        // Only a diagonal link between (4,4) and (5,5): must not be taken
        grid.set_walkable(GridCoord::new(5, 4), false);
        grid.set_walkable(GridCoord::new(4, 5), false);
        for c in [GridCoord::new(3, 5), GridCoord::new(5, 3)] {
            grid.set_walkable(c, false);
        }
        let result = find_path(&grid, WorldPoint::new(4.0, 4.0), WorldPoint::new(6.0, 6.0));
        assert!(result.success);
        assert_route_valid(&grid, &result.path);
    }

    #[test]
    fn test_goal_in_same_cell() {
        let grid = open_grid(10);
        let start = WorldPoint::new(4.2, 4.2);
        let goal = WorldPoint::new(4.7, 4.6);
        let result = find_path(&grid, start, goal);
        assert!(result.success);
        assert_eq!(result.path, vec![start, goal]);
    }

    #[test]
    fn test_bidirectional_matches_endpoints() {
        let grid = gapped_wall_grid();
        let start = WorldPoint::new(5.0, 45.0);
        let goal = WorldPoint::new(45.0, 3.0);
        let result = BidirectionalPlanner::with_defaults(&grid).find_path(start, goal);
        assert!(result.success);
        assert_eq!(result.path.first(), Some(&start));
        assert_eq!(result.path.last(), Some(&goal));
        assert_route_valid(&grid, &result.path);
        for p in &result.path {
            assert!(!grid.is_blacklisted(grid.world_to_grid(*p)));
        }
    }

    #[test]
    fn test_bidirectional_fails_when_sealed() {
        let mut grid = open_grid(20);
        for z in 0..20 {
            grid.set_walkable(GridCoord::new(10, z), false);
        }
        let result = BidirectionalPlanner::with_defaults(&grid).find_path(WorldPoint::new(2.0, 2.0), WorldPoint::new(18.0, 2.0));
        assert!(!result.success);
    }

    #[test]
    fn test_bidirectional_same_cell() {
        let grid = open_grid(10);
        let start = WorldPoint::new(4.2, 4.2);
        let goal = WorldPoint::new(4.7, 4.6);
        let result = BidirectionalPlanner::with_defaults(&grid).find_path(start, goal);
        assert_eq!(result.path, vec![start, goal]);
    }
}
