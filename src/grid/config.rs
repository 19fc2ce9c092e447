//! Configuration types for the navigation grid.

use crate::core::WorldPoint;
use serde::{Deserialize, Serialize};

/// Grid configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Grid size along X in cells
    pub size_x: usize,

    /// Grid size along Z in cells
    pub size_z: usize,

    /// World units per cell
    pub cell_size: f32,

    /// World coordinates of cell (0,0).
    /// If None, the grid is centered on the world origin.
    pub origin: Option<WorldPoint>,

    /// Radius (cells) used by `mark_walkable_area`; never below 2
    pub mark_radius: i32,

    /// Marks closer than this (world units) to the last accepted mark are throttled
    pub mark_min_distance: f32,

    /// ...unless at least this many milliseconds have passed
    pub mark_min_interval_ms: u64,

    /// Upper bound (cells) on a single blacklist event
    pub blacklist_radius_cap: f32,

    /// Ring limit (cells) for `find_nearest_walkable`
    pub nearest_walkable_max_radius: i32,

    /// Half-width (cells) of the corridor forced open by `ensure_path_exists`
    pub repair_half_width: i32,

    /// Sampling lattice step for `optimize_grid`
    pub thinning_stride: usize,

    /// Walkable neighbours (of 8) needed before a lattice cell is thinned
    pub thinning_min_neighbors: usize,

    /// Thinning is skipped when it would remove this share of walkable cells or more
    pub thinning_max_removal_ratio: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size_x: 5000,
            size_z: 5000,
            cell_size: 1.0,
            origin: None,
            mark_radius: 3,
            mark_min_distance: 5.0,
            mark_min_interval_ms: 100,
            blacklist_radius_cap: 2.0,
            nearest_walkable_max_radius: 20,
            repair_half_width: 1,
            thinning_stride: 8,
            thinning_min_neighbors: 5,
            thinning_max_removal_ratio: 0.5,
        }
    }
}

impl GridConfig {
    /// Configuration for a grid of the given size anchored at `origin`
    pub fn with_size(size_x: usize, size_z: usize, cell_size: f32, origin: WorldPoint) -> Self {
        Self {
            size_x,
            size_z,
            cell_size,
            origin: Some(origin),
            ..Default::default()
        }
    }

    /// Calculate the origin for a centered grid
    pub fn centered_origin(&self) -> WorldPoint {
        let half_x = (self.size_x as f32 * self.cell_size) / 2.0;
        let half_z = (self.size_z as f32 * self.cell_size) / 2.0;
        WorldPoint::new(-half_x, -half_z)
    }

    /// Get the effective origin (uses centered_origin if origin is None)
    pub fn effective_origin(&self) -> WorldPoint {
        self.origin.unwrap_or_else(|| self.centered_origin())
    }

    /// Memory used by both layers in bytes
    pub fn memory_bytes(&self) -> usize {
        self.size_x * self.size_z * 2
    }
}
