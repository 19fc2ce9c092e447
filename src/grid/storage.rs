//! Dual-layer grid storage.
//!
//! Two parallel boolean layers share one index space:
//! - `walkable`: cells the agent has been observed to occupy
//! - `blacklisted`: cells where it got stuck
//!
//! A cell is only usable for routing when it is walkable AND not
//! blacklisted. Cells are indexed x-major (`x * size_z + z`), which is
//! also the on-disk byte order.

use std::time::Duration;

use crate::core::{GridCoord, WorldPoint};

use super::config::GridConfig;
use super::throttle::MarkThrottle;

/// Per-layer cell counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridStats {
    /// Cells marked walkable
    pub walkable: usize,
    /// Cells marked blacklisted
    pub blacklisted: usize,
    /// Cells marked both (walkable but vetoed)
    pub walkable_and_blacklisted: usize,
    /// Total cell count
    pub total: usize,
}

impl GridStats {
    /// Share of cells usable for routing
    pub fn walkable_ratio(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.walkable - self.walkable_and_blacklisted) as f32 / self.total as f32
        }
    }
}

/// Navigation grid with walkable and blacklisted layers.
///
/// Cell (x, z) maps to world point `origin + (x, z) * cell_size`.
#[derive(Clone, Debug)]
pub struct NavGrid {
    walkable: Vec<bool>,
    blacklisted: Vec<bool>,
    size_x: usize,
    size_z: usize,
    cell_size: f32,
    origin: WorldPoint,
    pub(super) config: GridConfig,
    pub(super) throttle: MarkThrottle,
}

impl NavGrid {
    /// Create an empty grid from configuration
    pub fn new(config: GridConfig) -> Self {
        let size = config.size_x * config.size_z;
        let throttle = MarkThrottle::new(
            config.mark_min_distance,
            Duration::from_millis(config.mark_min_interval_ms),
        );
        Self {
            walkable: vec![false; size],
            blacklisted: vec![false; size],
            size_x: config.size_x,
            size_z: config.size_z,
            cell_size: config.cell_size,
            origin: config.effective_origin(),
            config,
            throttle,
        }
    }

    /// Create an empty grid with default tuning
    pub fn with_dimensions(size_x: usize, size_z: usize, cell_size: f32, origin: WorldPoint) -> Self {
        Self::new(GridConfig::with_size(size_x, size_z, cell_size, origin))
    }

    /// Grid size along X in cells
    #[inline]
    pub fn size_x(&self) -> usize {
        self.size_x
    }

    /// Grid size along Z in cells
    #[inline]
    pub fn size_z(&self) -> usize {
        self.size_z
    }

    /// World units per cell
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World coordinates of cell (0, 0)
    #[inline]
    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Move the grid anchor (used when a stored layer carries its own origin)
    pub fn set_origin(&mut self, origin: WorldPoint) {
        self.origin = origin;
    }

    /// Active tuning
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Total number of cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.size_x * self.size_z
    }

    /// Convert world coordinates to grid coordinates.
    ///
    /// The small bias keeps `world_to_grid(grid_to_world(c)) == c` under
    /// float rounding.
    #[inline]
    pub fn world_to_grid(&self, point: WorldPoint) -> GridCoord {
        let x = ((point.x - self.origin.x) / self.cell_size + 1e-4).floor() as i32;
        let z = ((point.z - self.origin.z) / self.cell_size + 1e-4).floor() as i32;
        GridCoord::new(x, z)
    }

    /// Convert grid coordinates to world coordinates
    #[inline]
    pub fn grid_to_world(&self, coord: GridCoord) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + coord.x as f32 * self.cell_size,
            self.origin.z + coord.z as f32 * self.cell_size,
        )
    }

    /// Check if grid coordinates are within bounds
    #[inline]
    pub fn is_valid(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.z >= 0
            && (coord.x as usize) < self.size_x
            && (coord.z as usize) < self.size_z
    }

    /// Clamp grid coordinates into bounds
    pub fn clamp(&self, coord: GridCoord) -> GridCoord {
        GridCoord::new(
            coord.x.clamp(0, self.size_x.saturating_sub(1) as i32),
            coord.z.clamp(0, self.size_z.saturating_sub(1) as i32),
        )
    }

    #[inline]
    fn index(&self, coord: GridCoord) -> Option<usize> {
        if self.is_valid(coord) {
            Some(coord.x as usize * self.size_z + coord.z as usize)
        } else {
            None
        }
    }

    /// Walkable flag (false outside the grid)
    #[inline]
    pub fn is_walkable(&self, coord: GridCoord) -> bool {
        self.index(coord).is_some_and(|i| self.walkable[i])
    }

    /// Blacklisted flag (false outside the grid)
    #[inline]
    pub fn is_blacklisted(&self, coord: GridCoord) -> bool {
        self.index(coord).is_some_and(|i| self.blacklisted[i])
    }

    /// Walkable and not blacklisted
    #[inline]
    pub fn is_passable(&self, coord: GridCoord) -> bool {
        self.index(coord)
            .is_some_and(|i| self.walkable[i] && !self.blacklisted[i])
    }

    /// `is_passable` for the cell containing a world point
    #[inline]
    pub fn is_passable_world(&self, point: WorldPoint) -> bool {
        self.is_passable(self.world_to_grid(point))
    }

    /// Set the walkable flag. Returns true if the cell changed.
    pub fn set_walkable(&mut self, coord: GridCoord, value: bool) -> bool {
        match self.index(coord) {
            Some(i) if self.walkable[i] != value => {
                self.walkable[i] = value;
                true
            }
            _ => false,
        }
    }

    /// Set the blacklisted flag. Returns true if the cell changed.
    pub fn set_blacklisted(&mut self, coord: GridCoord, value: bool) -> bool {
        match self.index(coord) {
            Some(i) if self.blacklisted[i] != value => {
                self.blacklisted[i] = value;
                true
            }
            _ => false,
        }
    }

    /// Mark every in-bounds cell of an inclusive rectangle walkable.
    /// Returns the number of cells changed.
    pub fn fill_walkable_rect(&mut self, min: GridCoord, max: GridCoord) -> usize {
        let mut changed = 0;
        for x in min.x.min(max.x)..=min.x.max(max.x) {
            for z in min.z.min(max.z)..=min.z.max(max.z) {
                if self.set_walkable(GridCoord::new(x, z), true) {
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Reset both layers and the marking throttle
    pub fn clear_all(&mut self) {
        self.walkable.fill(false);
        self.blacklisted.fill(false);
        self.throttle.reset();
    }

    /// Walkable layer in storage order
    pub fn walkable_layer(&self) -> &[bool] {
        &self.walkable
    }

    /// Blacklisted layer in storage order
    pub fn blacklisted_layer(&self) -> &[bool] {
        &self.blacklisted
    }

    /// Replace the walkable layer. Rejected (false) if the length differs.
    pub fn replace_walkable_layer(&mut self, cells: Vec<bool>) -> bool {
        if cells.len() != self.cell_count() {
            return false;
        }
        self.walkable = cells;
        true
    }

    /// Replace the blacklisted layer. Rejected (false) if the length differs.
    pub fn replace_blacklisted_layer(&mut self, cells: Vec<bool>) -> bool {
        if cells.len() != self.cell_count() {
            return false;
        }
        self.blacklisted = cells;
        true
    }

    /// Count cells per layer
    pub fn stats(&self) -> GridStats {
        let mut stats = GridStats {
            total: self.cell_count(),
            ..Default::default()
        };
        for (&w, &b) in self.walkable.iter().zip(&self.blacklisted) {
            stats.walkable += w as usize;
            stats.blacklisted += b as usize;
            stats.walkable_and_blacklisted += (w && b) as usize;
        }
        stats
    }
}
