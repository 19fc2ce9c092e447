//! Mutating and search operations on the navigation grid.

use std::time::Instant;

use log::{debug, info, warn};

use crate::core::{GridCoord, WorldPoint};

use super::storage::NavGrid;

/// Result of a walkable-marking request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    /// Dropped by the rate limiter; nothing changed
    Throttled,
    /// Applied
    Marked {
        /// Cells that flipped from non-walkable to walkable
        cells_changed: usize,
        /// The centre fell outside the grid and was clamped
        clamped: bool,
    },
}

impl NavGrid {
    /// Mark a disc around `position` walkable, using the configured radius.
    pub fn mark_walkable_area(&mut self, position: WorldPoint) -> MarkOutcome {
        let radius = self.config.mark_radius;
        self.mark_walkable_area_at(position, radius, Instant::now())
    }

    /// Mark a disc of `radius` cells around `position` walkable.
    ///
    /// Requests closer than the throttle distance to the last accepted one
    /// and arriving within the throttle interval are ignored. The radius
    /// is raised to at least 2 cells. A centre outside the grid is clamped
    /// onto the nearest edge cell.
    pub fn mark_walkable_area_at(
        &mut self,
        position: WorldPoint,
        radius: i32,
        now: Instant,
    ) -> MarkOutcome {
        if !self.throttle.accepts(position, now) {
            return MarkOutcome::Throttled;
        }
        self.throttle.record(position, now);

        let raw = self.world_to_grid(position);
        let center = self.clamp(raw);
        let clamped = center != raw;
        if clamped {
            warn!(
                "[NavGrid] Mark position ({:.2}, {:.2}) outside grid, clamped {:?} -> {:?}",
                position.x, position.z, raw, center
            );
        }

        let radius = radius.max(2);
        let radius_sq = radius * radius;
        let mut cells_changed = 0;
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                if dx * dx + dz * dz > radius_sq {
                    continue;
                }
                if self.set_walkable(center.offset(dx, dz), true) {
                    cells_changed += 1;
                }
            }
        }

        MarkOutcome::Marked {
            cells_changed,
            clamped,
        }
    }

    /// Blacklist cells within `radius` cells of `position`.
    ///
    /// The radius is capped by configuration. A centre outside the grid is
    /// ignored. Returns the cells that became blacklisted.
    pub fn blacklist_cells(&mut self, position: WorldPoint, radius: f32) -> Vec<GridCoord> {
        let center = self.world_to_grid(position);
        if !self.is_valid(center) {
            debug!(
                "[NavGrid] Blacklist position ({:.2}, {:.2}) outside grid, ignored",
                position.x, position.z
            );
            return Vec::new();
        }

        let radius = radius.clamp(0.0, self.config.blacklist_radius_cap);
        let reach = radius.ceil() as i32;
        let mut changed = Vec::new();
        for dx in -reach..=reach {
            for dz in -reach..=reach {
                if ((dx * dx + dz * dz) as f32).sqrt() > radius {
                    continue;
                }
                let coord = center.offset(dx, dz);
                if self.set_blacklisted(coord, true) {
                    changed.push(coord);
                }
            }
        }
        changed
    }

    /// Closest usable cell to `coord` by Chebyshev ring, up to `max_radius`.
    ///
    /// Rings are scanned outward; within a ring the first usable cell wins.
    pub fn nearest_passable(&self, coord: GridCoord, max_radius: i32) -> Option<GridCoord> {
        if coord.chebyshev_distance(&self.clamp(coord)) > max_radius {
            return None;
        }
        (0..=max_radius).find_map(|r| coord.ring(r).find(|&c| self.is_passable(c)))
    }

    /// Snap a world point onto the nearest walkable, non-blacklisted cell.
    ///
    /// Returns the point unchanged if its own cell is usable or nothing
    /// usable exists within the configured ring limit.
    pub fn find_nearest_walkable(&self, position: WorldPoint) -> WorldPoint {
        let coord = self.world_to_grid(position);
        if self.is_passable(coord) {
            return position;
        }
        match self.nearest_passable(coord, self.config.nearest_walkable_max_radius) {
            Some(found) => self.grid_to_world(found),
            None => position,
        }
    }

    /// Force a thick walkable corridor between two world points.
    ///
    /// Every cell within the configured half-width of the straight line is
    /// made walkable and removed from the blacklist. Endpoints outside the
    /// grid are clamped onto its edge. Returns the number of cells touched
    /// (either flag changed).
    pub fn ensure_path_exists(&mut self, from: WorldPoint, to: WorldPoint) -> usize {
        let a = self.clamp(self.world_to_grid(from));
        let b = self.clamp(self.world_to_grid(to));
        let half = self.config.repair_half_width.max(0);
        let mut changed = 0;
        for cell in line_cells(a, b) {
            for dx in -half..=half {
                for dz in -half..=half {
                    let c = cell.offset(dx, dz);
                    let w = self.set_walkable(c, true);
                    let b = self.set_blacklisted(c, false);
                    if w || b {
                        changed += 1;
                    }
                }
            }
        }
        debug!("[NavGrid] Repaired corridor {:?} -> {:?}: {} cells", a, b, changed);
        changed
    }

    /// Thin dense walkable regions.
    ///
    /// Walkable cells on a sparse lattice with many walkable neighbours are
    /// cleared. Skipped entirely if that would remove too large a share of
    /// the walkable cells. Returns the number of cells removed.
    pub fn optimize_grid(&mut self) -> usize {
        let stride = self.config.thinning_stride.max(1);
        let min_neighbors = self.config.thinning_min_neighbors;

        let mut candidates = Vec::new();
        for x in (0..self.size_x()).step_by(stride) {
            for z in (0..self.size_z()).step_by(stride) {
                let c = GridCoord::new(x as i32, z as i32);
                if !self.is_walkable(c) {
                    continue;
                }
                let walkable_neighbors = c
                    .neighbors_8()
                    .iter()
                    .filter(|n| self.is_walkable(**n))
                    .count();
                if walkable_neighbors >= min_neighbors {
                    candidates.push(c);
                }
            }
        }

        let total_walkable = self.stats().walkable;
        if candidates.is_empty() || total_walkable == 0 {
            return 0;
        }
        let ratio = candidates.len() as f32 / total_walkable as f32;
        if ratio >= self.config.thinning_max_removal_ratio {
            warn!(
                "[NavGrid] Thinning would remove {:.0}% of walkable cells, skipped",
                ratio * 100.0
            );
            return 0;
        }

        for c in &candidates {
            self.set_walkable(*c, false);
        }
        info!(
            "[NavGrid] Thinned {} of {} walkable cells",
            candidates.len(),
            total_walkable
        );
        candidates.len()
    }
}

/// Cells on the Bresenham line from `from` to `to`, both ends included.
pub fn line_cells(from: GridCoord, to: GridCoord) -> Vec<GridCoord> {
    let (mut x0, mut z0) = (i64::from(from.x), i64::from(from.z));
    let (x1, z1) = (i64::from(to.x), i64::from(to.z));
    let dx = (x1 - x0).abs();
    let dz = (z1 - z0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sz = if z0 < z1 { 1 } else { -1 };
    let mut err = dx - dz;

    let mut cells = Vec::with_capacity((dx.max(dz) + 1) as usize);
    loop {
        // Stays between the two i32 endpoints
        cells.push(GridCoord::new(x0 as i32, z0 as i32));
        if x0 == x1 && z0 == z1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dz {
            err -= dz;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            z0 += sz;
        }
    }
    cells
}
