//! One search frontier: node arena, expansion rules and cost terms.

use crate::core::{GridCoord, WorldPoint};
use crate::grid::NavGrid;

use super::types::{CostNode, NodeId, PlannerConfig, SearchArena};

/// Blend of Manhattan and Euclidean distance, scaled by `weight`
#[inline]
pub(super) fn heuristic(from: WorldPoint, to: WorldPoint, weight: f32) -> f32 {
    let dx = (from.x - to.x).abs();
    let dz = (from.z - to.z).abs();
    (0.5 * (dx + dz) + 0.5 * (dx * dx + dz * dz).sqrt()) * weight
}

/// Wall and blacklist proximity penalties for a cell.
///
/// Every cell in the square window of `wall_clearance` around `coord`
/// contributes: non-walkable cells closer than the clearance add a
/// quadratic term, blacklisted cells add a linear term that fades out at
/// twice the clearance.
pub(super) fn proximity_penalties(
    grid: &NavGrid,
    coord: GridCoord,
    config: &PlannerConfig,
) -> (f32, f32) {
    let clearance = config.wall_clearance;
    if clearance <= 0.0 {
        return (0.0, 0.0);
    }
    let reach = (clearance / grid.cell_size()).ceil() as i32;
    let far = 2.0 * clearance;

    let mut wall = 0.0;
    let mut blacklist = 0.0;
    for dx in -reach..=reach {
        for dz in -reach..=reach {
            if dx == 0 && dz == 0 {
                continue;
            }
            let n = coord.offset(dx, dz);
            let d = ((dx * dx + dz * dz) as f32).sqrt() * grid.cell_size();
            if d < clearance && !grid.is_walkable(n) {
                let gap = clearance - d;
                wall += config.wall_penalty_weight * gap * gap;
            }
            if grid.is_blacklisted(n) {
                blacklist += config.blacklist_penalty_weight * (far - d.min(far));
            }
        }
    }
    (wall, blacklist)
}

/// A single-direction A* frontier rooted at an exact world point
pub(super) struct Frontier<'a> {
    grid: &'a NavGrid,
    config: &'a PlannerConfig,
    target: WorldPoint,
    arena: SearchArena,
    /// Nodes popped so far
    pub expanded: usize,
}

impl<'a> Frontier<'a> {
    /// Start a frontier at `root` heading for the cell containing `target`
    pub fn new(grid: &'a NavGrid, config: &'a PlannerConfig, root: WorldPoint, target: WorldPoint) -> Self {
        let target = grid.grid_to_world(grid.world_to_grid(target));
        let mut frontier = Self {
            grid,
            config,
            target,
            arena: SearchArena::new(),
            expanded: 0,
        };
        let coord = grid.world_to_grid(root);
        let (wall_penalty, blacklist_penalty) = proximity_penalties(grid, coord, config);
        frontier.arena.open(CostNode {
            coord,
            position: root,
            parent: None,
            g_cost: 0.0,
            h_cost: heuristic(grid.grid_to_world(coord), target, config.heuristic_weight),
            wall_penalty,
            blacklist_penalty,
            closed: false,
        });
        frontier
    }

    /// Close and return the best open node
    pub fn pop(&mut self) -> Option<NodeId> {
        let id = self.arena.pop_and_close()?;
        self.expanded += 1;
        Some(id)
    }

    pub fn coord(&self, id: NodeId) -> GridCoord {
        self.arena.node(id).coord
    }

    pub fn g_cost(&self, id: NodeId) -> f32 {
        self.arena.node(id).g_cost
    }

    pub fn lookup(&self, coord: GridCoord) -> Option<NodeId> {
        self.arena.lookup(coord)
    }

    /// Within one cell of the target cell
    pub fn reaches_target(&self, id: NodeId) -> bool {
        let anchor = self.grid.grid_to_world(self.coord(id));
        anchor.distance(&self.target) <= self.grid.cell_size() * 1.001
    }

    pub fn closed_cost(&self, coord: GridCoord) -> Option<f32> {
        self.arena.closed_cost(coord)
    }

    pub fn min_open_f(&mut self) -> Option<f32> {
        self.arena.min_open_f()
    }

    pub fn path_to(&self, id: NodeId) -> Vec<WorldPoint> {
        self.arena.path_to(id)
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Open or improve every usable neighbour of `id`.
    ///
    /// Only walkable, non-blacklisted cells are entered. Diagonal moves
    /// also need both adjacent cardinal cells usable. Closed nodes are
    /// never reopened.
    pub fn expand(&mut self, id: NodeId) {
        let (coord, g_cost) = {
            let node = self.arena.node(id);
            (node.coord, node.g_cost)
        };
        let from = self.grid.grid_to_world(coord);

        for (i, neighbor) in coord.neighbors_8().into_iter().enumerate() {
            if !self.grid.is_passable(neighbor) {
                continue;
            }
            // Indices 4..8 are diagonals
            let diagonal = i >= 4;
            if diagonal
                && !(self.grid.is_passable(GridCoord::new(neighbor.x, coord.z))
                    && self.grid.is_passable(GridCoord::new(coord.x, neighbor.z)))
            {
                continue;
            }

            let to = self.grid.grid_to_world(neighbor);
            let mut step = from.distance(&to);
            if diagonal {
                step *= self.config.diagonal_weight;
            }
            let tentative = g_cost + step;

            match self.arena.lookup(neighbor) {
                Some(existing) => {
                    let node = self.arena.node(existing);
                    if !node.closed && tentative < node.g_cost {
                        self.arena.improve(existing, tentative, id);
                    }
                }
                None => {
                    let (wall_penalty, blacklist_penalty) =
                        proximity_penalties(self.grid, neighbor, self.config);
                    self.arena.open(CostNode {
                        coord: neighbor,
                        position: to,
                        parent: Some(id),
                        g_cost: tentative,
                        h_cost: heuristic(to, self.target, self.config.heuristic_weight),
                        wall_penalty,
                        blacklist_penalty,
                        closed: false,
                    });
                }
            }
        }
    }
}

/// Make the route end exactly at `goal`.
///
/// The last node's cell anchor is swapped for the exact goal when it is
/// the goal cell; otherwise the goal is appended.
pub(super) fn finish_route(grid: &NavGrid, route: &mut Vec<WorldPoint>, goal: WorldPoint) {
    let Some(&last) = route.last() else {
        return;
    };
    if last == goal {
        return;
    }
    if route.len() > 1 && grid.world_to_grid(last) == grid.world_to_grid(goal) {
        route.pop();
    }
    route.push(goal);
}
