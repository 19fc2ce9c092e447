//! A* search types.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

use crate::core::{GridCoord, WorldPoint};

/// Index of a node in a [`SearchArena`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(super) struct NodeId(usize);

/// A node in the search graph.
///
/// Penalties are computed once when the node is created and only affect
/// open-set ordering; they are never accumulated into `g_cost`.
#[derive(Clone, Debug)]
pub(super) struct CostNode {
    pub coord: GridCoord,
    /// Exact world point for the root, cell anchor otherwise
    pub position: WorldPoint,
    pub parent: Option<NodeId>,
    pub g_cost: f32,
    pub h_cost: f32,
    pub wall_penalty: f32,
    pub blacklist_penalty: f32,
    pub closed: bool,
}

impl CostNode {
    #[inline]
    pub fn f_cost(&self) -> f32 {
        self.g_cost + self.h_cost
    }

    /// Open-set ordering key
    #[inline]
    pub fn priority(&self) -> f32 {
        self.f_cost() + self.wall_penalty + self.blacklist_penalty
    }
}

/// Open-set entry. Entries whose `g_cost` no longer matches the node are stale.
#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    priority: f32,
    h_cost: f32,
    g_cost: f32,
    id: NodeId,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; ties broken by lower h
        other
            .priority
            .partial_cmp(&self.priority)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                other
                    .h_cost
                    .partial_cmp(&self.h_cost)
                    .unwrap_or(Ordering::Equal)
            })
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

/// Node storage for one search frontier.
///
/// Nodes live in a flat vector and refer to their parent by index.
#[derive(Debug, Default)]
pub(super) struct SearchArena {
    nodes: Vec<CostNode>,
    index: HashMap<GridCoord, NodeId>,
    open: BinaryHeap<OpenEntry>,
}

impl SearchArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, coord: GridCoord) -> Option<NodeId> {
        self.index.get(&coord).copied()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &CostNode {
        &self.nodes[id.0]
    }

    /// Add a new node to the open set
    pub fn open(&mut self, node: CostNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.index.insert(node.coord, id);
        self.open.push(OpenEntry {
            priority: node.priority(),
            h_cost: node.h_cost,
            g_cost: node.g_cost,
            id,
        });
        self.nodes.push(node);
        id
    }

    /// Lower an open node's cost and re-queue it
    pub fn improve(&mut self, id: NodeId, g_cost: f32, parent: NodeId) {
        let node = &mut self.nodes[id.0];
        node.g_cost = g_cost;
        node.parent = Some(parent);
        self.open.push(OpenEntry {
            priority: node.priority(),
            h_cost: node.h_cost,
            g_cost,
            id,
        });
    }

    /// Pop the best open node and close it
    pub fn pop_and_close(&mut self) -> Option<NodeId> {
        self.discard_stale();
        let entry = self.open.pop()?;
        self.nodes[entry.id.0].closed = true;
        Some(entry.id)
    }

    /// Lowest `f_cost` among open nodes
    pub fn min_open_f(&mut self) -> Option<f32> {
        self.discard_stale();
        self.open.peek().map(|e| self.nodes[e.id.0].f_cost())
    }

    fn discard_stale(&mut self) {
        while let Some(top) = self.open.peek() {
            let node = &self.nodes[top.id.0];
            if node.closed || top.g_cost != node.g_cost {
                self.open.pop();
            } else {
                break;
            }
        }
    }

    /// `g_cost` of `coord` if it has been closed
    pub fn closed_cost(&self, coord: GridCoord) -> Option<f32> {
        self.lookup(coord)
            .map(|id| self.node(id))
            .filter(|n| n.closed)
            .map(|n| n.g_cost)
    }

    /// Positions from the root to `id`
    pub fn path_to(&self, id: NodeId) -> Vec<WorldPoint> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(cid) = current {
            let node = self.node(cid);
            path.push(node.position);
            current = node.parent;
        }
        path.reverse();
        path
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Planner configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Maximum number of nodes to expand before giving up
    pub max_iterations: usize,

    /// Scale applied to the heuristic (above 1 trades optimality for speed)
    pub heuristic_weight: f32,

    /// Multiplier on the step cost of diagonal moves
    pub diagonal_weight: f32,

    /// Routes longer than this (world units) use bidirectional search
    pub bidirectional_threshold: f32,

    /// Radius (world units) within which walls and blacklisted cells add penalties
    pub wall_clearance: f32,

    /// Weight of the quadratic wall-proximity penalty
    pub wall_penalty_weight: f32,

    /// Weight of the linear blacklist-proximity penalty
    pub blacklist_penalty_weight: f32,

    /// Maximum cached routes
    pub cache_capacity: usize,

    /// Fewest points in an emergency route
    pub emergency_min_points: usize,

    /// Most points in an emergency route
    pub emergency_max_points: usize,

    /// One extra emergency point per this many world units
    pub emergency_point_spacing: f32,

    /// Ring radius (cells) searched to snap emergency points
    pub emergency_search_radius: i32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20_000,
            heuristic_weight: 1.1,
            diagonal_weight: std::f32::consts::SQRT_2,
            bidirectional_threshold: 2000.0,
            wall_clearance: 3.0,
            wall_penalty_weight: 1.0,
            blacklist_penalty_weight: 25.0,
            cache_capacity: 100,
            emergency_min_points: 5,
            emergency_max_points: 10,
            emergency_point_spacing: 200.0,
            emergency_search_radius: 4,
        }
    }
}

impl PlannerConfig {
    /// Disable proximity penalties
    pub fn without_penalties(mut self) -> Self {
        self.wall_penalty_weight = 0.0;
        self.blacklist_penalty_weight = 0.0;
        self
    }
}

/// Result of a single search
#[derive(Clone, Debug)]
pub struct PathResult {
    /// Route in world coordinates, start first (empty on failure)
    pub path: Vec<WorldPoint>,
    /// Number of nodes expanded during search
    pub nodes_expanded: usize,
    /// Whether a path was found
    pub success: bool,
    /// Reason for failure (if any)
    pub failure_reason: Option<PathFailure>,
}

impl PathResult {
    pub(super) fn found(path: Vec<WorldPoint>, nodes_expanded: usize) -> Self {
        Self {
            path,
            nodes_expanded,
            success: true,
            failure_reason: None,
        }
    }

    pub(super) fn failed(reason: PathFailure, nodes_expanded: usize) -> Self {
        Self {
            path: Vec::new(),
            nodes_expanded,
            success: false,
            failure_reason: Some(reason),
        }
    }
}

/// Reason for search failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathFailure {
    /// The reachable region was exhausted
    NoPath,
    /// Maximum iterations exceeded
    MaxIterationsExceeded,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(coord: GridCoord, g: f32, h: f32) -> CostNode {
        CostNode {
            coord,
            position: WorldPoint::new(coord.x as f32, coord.z as f32),
            parent: None,
            g_cost: g,
            h_cost: h,
            wall_penalty: 0.0,
            blacklist_penalty: 0.0,
            closed: false,
        }
    }

    #[test]
    fn test_pops_lowest_priority_first() {
        let mut arena = SearchArena::new();
        arena.open(node(GridCoord::new(0, 0), 5.0, 5.0));
        let best = arena.open(node(GridCoord::new(1, 0), 1.0, 2.0));
        arena.open(node(GridCoord::new(2, 0), 3.0, 3.0));
        assert_eq!(arena.pop_and_close(), Some(best));
        assert_eq!(arena.min_open_f(), Some(6.0));
    }

    #[test]
    fn test_tie_broken_by_heuristic() {
        let mut arena = SearchArena::new();
        arena.open(node(GridCoord::new(0, 0), 4.0, 2.0));
        let closer = arena.open(node(GridCoord::new(1, 0), 5.0, 1.0));
        assert_eq!(arena.pop_and_close(), Some(closer));
    }

    #[test]
    fn test_penalty_orders_but_is_not_cost() {
        let mut arena = SearchArena::new();
        let mut penalized = node(GridCoord::new(0, 0), 1.0, 1.0);
        penalized.blacklist_penalty = 100.0;
        arena.open(penalized);
        let plain = arena.open(node(GridCoord::new(1, 0), 10.0, 10.0));
        assert_eq!(arena.pop_and_close(), Some(plain));
        // f_cost ignores penalties
        assert_eq!(arena.min_open_f(), Some(2.0));
    }

    #[test]
    fn test_improve_requeues_and_skips_stale() {
        let mut arena = SearchArena::new();
        let root = arena.open(node(GridCoord::new(0, 0), 0.0, 10.0));
        let other = arena.open(node(GridCoord::new(5, 5), 8.0, 8.0));
        assert_eq!(arena.pop_and_close(), Some(root));

        arena.improve(other, 2.0, root);
        assert_eq!(arena.min_open_f(), Some(10.0));
        assert_eq!(arena.pop_and_close(), Some(other));
        // The stale entry for the old cost must not resurface
        assert_eq!(arena.pop_and_close(), None);
        assert_eq!(arena.closed_cost(GridCoord::new(5, 5)), Some(2.0));
        assert_eq!(arena.path_to(other).len(), 2);
    }
}
