//! Plain A* planner.

use log::{debug, trace, warn};

use crate::core::WorldPoint;
use crate::grid::NavGrid;

use super::frontier::{Frontier, finish_route};
use super::types::{PathFailure, PathResult, PlannerConfig};

/// A* pathfinder over the 8-connected navigation grid
pub struct AStarPlanner<'a> {
    grid: &'a NavGrid,
    config: PlannerConfig,
}

impl<'a> AStarPlanner<'a> {
    /// Create a new A* planner
    pub fn new(grid: &'a NavGrid, config: PlannerConfig) -> Self {
        Self { grid, config }
    }

    /// Create with default configuration
    pub fn with_defaults(grid: &'a NavGrid) -> Self {
        Self::new(grid, PlannerConfig::default())
    }

    /// Find a route from `start` to `goal`.
    ///
    /// The route starts at `start` and ends at `goal` exactly; the points
    /// in between are cell anchors. Succeeds once a node within one cell
    /// of the goal cell is popped.
    pub fn find_path(&self, start: WorldPoint, goal: WorldPoint) -> PathResult {
        trace!(
            "[AStar] find_path: start=({:.2},{:.2}) goal=({:.2},{:.2})",
            start.x, start.z, goal.x, goal.z
        );

        let mut frontier = Frontier::new(self.grid, &self.config, start, goal);

        while let Some(current) = frontier.pop() {
            if frontier.expanded > self.config.max_iterations {
                warn!(
                    "[AStar] FAILED: MaxIterationsExceeded ({} nodes)",
                    frontier.expanded
                );
                return PathResult::failed(PathFailure::MaxIterationsExceeded, frontier.expanded);
            }

            if frontier.reaches_target(current) {
                let mut path = frontier.path_to(current);
                finish_route(self.grid, &mut path, goal);
                trace!(
                    "[AStar] SUCCESS: {} points, cost={:.2}, nodes_expanded={}, nodes_created={}",
                    path.len(),
                    frontier.g_cost(current),
                    frontier.expanded,
                    frontier.node_count()
                );
                return PathResult::found(path, frontier.expanded);
            }

            frontier.expand(current);
        }

        debug!(
            "[AStar] FAILED: NoPath after expanding {} of {} nodes",
            frontier.expanded,
            frontier.node_count()
        );
        PathResult::failed(PathFailure::NoPath, frontier.expanded)
    }
}
