//! Fallback route used when search fails.

use log::warn;

use crate::core::WorldPoint;
use crate::grid::NavGrid;

use super::astar::PlannerConfig;

/// Straight-line route from `start` to `end`, snapped to usable cells.
///
/// The line is split into between `emergency_min_points` and
/// `emergency_max_points` points (more for longer distances). Interior
/// points move to the nearest usable cell within the configured ring
/// radius when one exists. Always returns at least two points.
pub fn create_emergency_path(
    grid: &NavGrid,
    start: WorldPoint,
    end: WorldPoint,
    config: &PlannerConfig,
) -> Vec<WorldPoint> {
    let distance = start.distance(&end);
    let min_points = config.emergency_min_points.max(2);
    let max_points = config.emergency_max_points.max(min_points);
    let extra = if config.emergency_point_spacing > 0.0 {
        (distance / config.emergency_point_spacing) as usize
    } else {
        0
    };
    let count = (min_points + extra).min(max_points);

    warn!(
        "[Emergency] Straight-line fallback over {:.1} units with {} points",
        distance, count
    );

    (0..count)
        .map(|i| {
            if i == 0 {
                return start;
            }
            if i == count - 1 {
                return end;
            }
            let t = i as f32 / (count - 1) as f32;
            let point = start.lerp(&end, t);
            grid.nearest_passable(grid.world_to_grid(point), config.emergency_search_radius)
                .map_or(point, |c| grid.grid_to_world(c))
        })
        .collect()
}
