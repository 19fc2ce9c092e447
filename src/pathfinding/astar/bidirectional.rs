//! Bidirectional A* planner.
//!
//! Two frontiers, one from each end, advance alternately by one node.
//! Whenever a node closed on one side is already closed on the other it
//! becomes a meeting candidate with cost `g_forward + g_backward`. The
//! search stops when neither side's best open `f` can beat the best
//! candidate, or when either side runs dry.

use log::{debug, trace, warn};

use crate::core::{GridCoord, WorldPoint};
use crate::grid::NavGrid;

use super::frontier::{Frontier, finish_route};
use super::types::{NodeId, PathFailure, PathResult, PlannerConfig};

/// Best meeting point seen so far
#[derive(Clone, Copy, Debug)]
struct Meeting {
    coord: GridCoord,
    cost: f32,
}

/// Two-frontier A* pathfinder
pub struct BidirectionalPlanner<'a> {
    grid: &'a NavGrid,
    config: PlannerConfig,
}

impl<'a> BidirectionalPlanner<'a> {
    /// Create a new bidirectional planner
    pub fn new(grid: &'a NavGrid, config: PlannerConfig) -> Self {
        Self { grid, config }
    }

    /// Create with default configuration
    pub fn with_defaults(grid: &'a NavGrid) -> Self {
        Self::new(grid, PlannerConfig::default())
    }

    /// Find a route from `start` to `goal`; see the module docs.
    pub fn find_path(&self, start: WorldPoint, goal: WorldPoint) -> PathResult {
        trace!(
            "[BiAStar] find_path: start=({:.2},{:.2}) goal=({:.2},{:.2})",
            start.x, start.z, goal.x, goal.z
        );

        let mut forward = Frontier::new(self.grid, &self.config, start, goal);
        let mut backward = Frontier::new(self.grid, &self.config, goal, start);
        let mut best: Option<Meeting> = None;
        let mut iterations = 0;
        let mut capped = false;

        loop {
            iterations += 1;
            if iterations > self.config.max_iterations {
                capped = true;
                break;
            }

            let Some(id) = forward.pop() else { break };
            forward.expand(id);
            consider_meeting(&forward, &backward, id, &mut best);

            let Some(id) = backward.pop() else { break };
            backward.expand(id);
            consider_meeting(&backward, &forward, id, &mut best);

            if let Some(meeting) = best {
                let settled = |bound: Option<f32>| bound.is_none_or(|f| f >= meeting.cost);
                if settled(forward.min_open_f()) && settled(backward.min_open_f()) {
                    break;
                }
            }
        }

        let nodes_expanded = forward.expanded + backward.expanded;
        let Some(meeting) = best else {
            if capped {
                warn!(
                    "[BiAStar] FAILED: MaxIterationsExceeded ({} nodes)",
                    nodes_expanded
                );
                return PathResult::failed(PathFailure::MaxIterationsExceeded, nodes_expanded);
            }
            debug!("[BiAStar] FAILED: frontiers never met ({} nodes)", nodes_expanded);
            return PathResult::failed(PathFailure::NoPath, nodes_expanded);
        };

        let (Some(fid), Some(bid)) = (forward.lookup(meeting.coord), backward.lookup(meeting.coord)) else {
            return PathResult::failed(PathFailure::NoPath, nodes_expanded);
        };
        let mut path = join_at_meeting(forward.path_to(fid), backward.path_to(bid), goal);
        finish_route(self.grid, &mut path, goal);

        trace!(
            "[BiAStar] SUCCESS: met at ({},{}), {} points, cost={:.2}, nodes_expanded={}",
            meeting.coord.x,
            meeting.coord.z,
            path.len(),
            meeting.cost,
            nodes_expanded
        );
        PathResult::found(path, nodes_expanded)
    }
}

/// Record `id` (just closed on `closing`) if `other` has closed it too
fn consider_meeting(closing: &Frontier<'_>, other: &Frontier<'_>, id: NodeId, best: &mut Option<Meeting>) {
    let coord = closing.coord(id);
    if let Some(other_g) = other.closed_cost(coord) {
        let cost = closing.g_cost(id) + other_g;
        if best.is_none_or(|m| cost < m.cost) {
            *best = Some(Meeting { coord, cost });
        }
    }
}

/// Splice the forward half (start..=meet) onto the reversed backward half
/// (meet..=goal), keeping the meeting cell once.
fn join_at_meeting(forward: Vec<WorldPoint>, mut backward: Vec<WorldPoint>, goal: WorldPoint) -> Vec<WorldPoint> {
    backward.reverse();
    let mut route = forward;
    if backward.len() > 1 {
        route.extend(backward.into_iter().skip(1));
    } else {
        // Met at the goal's own cell
        if route.len() > 1 {
            route.pop();
        }
        if route.last() != Some(&goal) {
            route.push(goal);
        }
    }
    route
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_in_the_middle() {
        let forward = vec![WorldPoint::new(0.2, 0.0), WorldPoint::new(1.0, 0.0), WorldPoint::new(2.0, 0.0)];
        let backward = vec![WorldPoint::new(4.3, 0.0), WorldPoint::new(3.0, 0.0), WorldPoint::new(2.0, 0.0)];
        let route = join_at_meeting(forward, backward, WorldPoint::new(4.3, 0.0));
        let xs: Vec<f32> = route.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.2, 1.0, 2.0, 3.0, 4.3]);
    }

    #[test]
    fn test_join_at_goal_root() {
        let forward = vec![WorldPoint::new(0.2, 0.0), WorldPoint::new(1.0, 0.0), WorldPoint::new(2.0, 0.0)];
        let backward = vec![WorldPoint::new(2.4, 0.0)];
        let route = join_at_meeting(forward, backward, WorldPoint::new(2.4, 0.0));
        let xs: Vec<f32> = route.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.2, 1.0, 2.4]);
    }

    #[test]
    fn test_join_at_start_root() {
        let forward = vec![WorldPoint::new(0.2, 0.0)];
        let backward = vec![WorldPoint::new(3.5, 0.0), WorldPoint::new(1.0, 0.0), WorldPoint::new(0.0, 0.0)];
        let route = join_at_meeting(forward, backward, WorldPoint::new(3.5, 0.0));
        let xs: Vec<f32> = route.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.2, 1.0, 3.5]);
    }
}
