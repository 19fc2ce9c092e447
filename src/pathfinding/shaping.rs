//! Route shaping.
//!
//! Three passes run in order on a successful search result:
//! - Wall nudge: push interior waypoints away from nearby unusable cells
//! - Simplification: drop waypoints on near-straight stretches
//! - Spline smoothing: corner cutting plus Hermite interpolation
//!
//! Every candidate point must land on a walkable, non-blacklisted cell;
//! otherwise the original point is kept. The first and last points are
//! never moved.

use serde::{Deserialize, Serialize};

use crate::core::WorldPoint;
use crate::grid::NavGrid;

/// Route shaping configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaperConfig {
    /// Run the wall nudge pass
    pub nudge_enabled: bool,
    /// Run the simplification pass
    pub simplify_enabled: bool,
    /// Run the spline pass
    pub smooth_enabled: bool,
    /// Nudge search radius and displacement (world units)
    pub wall_clearance: f32,
    /// Waypoints turning more than this (degrees) are kept
    pub turn_threshold_deg: f32,
    /// Waypoints further than this from the last kept one are kept
    pub min_spacing: f32,
    /// Position of the corner-cut point along each segment
    pub cut_ratio: f32,
    /// Hermite tangent scale
    pub tangent_scale: f32,
    /// Segments shorter than this get no interpolated points
    pub min_spline_segment: f32,
    /// Upper bound on interpolated points per segment
    pub max_inserted_points: usize,
}

impl Default for ShaperConfig {
    fn default() -> Self {
        Self {
            nudge_enabled: true,
            simplify_enabled: true,
            smooth_enabled: true,
            wall_clearance: 3.0,
            turn_threshold_deg: 40.0,
            min_spacing: 5.0,
            cut_ratio: 0.7,
            tangent_scale: 0.5,
            min_spline_segment: 3.0,
            max_inserted_points: 4,
        }
    }
}

impl ShaperConfig {
    /// All passes off; routes come back as searched
    pub fn disabled() -> Self {
        Self {
            nudge_enabled: false,
            simplify_enabled: false,
            smooth_enabled: false,
            ..Default::default()
        }
    }
}

/// Route shaper
pub struct PathShaper<'a> {
    grid: &'a NavGrid,
    config: ShaperConfig,
}

impl<'a> PathShaper<'a> {
    /// Create a new route shaper
    pub fn new(grid: &'a NavGrid, config: ShaperConfig) -> Self {
        Self { grid, config }
    }

    /// Create with default configuration
    pub fn with_defaults(grid: &'a NavGrid) -> Self {
        Self::new(grid, ShaperConfig::default())
    }

    /// Run the enabled passes in order
    pub fn shape(&self, route: &[WorldPoint]) -> Vec<WorldPoint> {
        let mut shaped = route.to_vec();
        if self.config.nudge_enabled {
            self.nudge_from_walls(&mut shaped);
        }
        if self.config.simplify_enabled {
            shaped = self.simplify(&shaped);
        }
        if self.config.smooth_enabled {
            shaped = self.smooth(&shaped);
        }
        shaped
    }

    /// Move interior waypoints away from unusable cells.
    ///
    /// Each unusable cell within the clearance window pushes with weight
    /// `1 / d^2`. The waypoint moves by the full clearance along the summed
    /// direction, only if the destination is usable. Waypoints are updated
    /// in place, so later ones see earlier moves.
    pub fn nudge_from_walls(&self, route: &mut [WorldPoint]) {
        if route.len() <= 2 || self.config.wall_clearance <= 0.0 {
            return;
        }
        let cell_size = self.grid.cell_size();
        let reach = (self.config.wall_clearance / cell_size).ceil() as i32;
        let last = route.len() - 1;

        for point in &mut route[1..last] {
            let center = self.grid.world_to_grid(*point);
            let mut push = WorldPoint::ZERO;
            for dx in -reach..=reach {
                for dz in -reach..=reach {
                    if dx == 0 && dz == 0 {
                        continue;
                    }
                    let cell = center.offset(dx, dz);
                    if self.grid.is_passable(cell) {
                        continue;
                    }
                    let away = *point - self.grid.grid_to_world(cell);
                    let d_sq = away.distance_squared(&WorldPoint::ZERO);
                    if d_sq < 1e-6 {
                        continue;
                    }
                    push = push + away.normalize() * (1.0 / d_sq);
                }
            }
            if push.length() < 1e-6 {
                continue;
            }
            let candidate = *point + push.normalize() * self.config.wall_clearance;
            if self.grid.is_passable_world(candidate) {
                *point = candidate;
            }
        }
    }

    /// Drop waypoints on near-straight stretches.
    ///
    /// A waypoint survives if the route turns there by more than the
    /// threshold, or if it is further than the minimum spacing from the
    /// last surviving point. Endpoints always survive.
    pub fn simplify(&self, route: &[WorldPoint]) -> Vec<WorldPoint> {
        simplify_route(route, self.config.turn_threshold_deg, self.config.min_spacing)
    }

    /// Corner-cut then interpolate.
    ///
    /// Routes of fewer than 4 points are returned unchanged.
    pub fn smooth(&self, route: &[WorldPoint]) -> Vec<WorldPoint> {
        if route.len() < 4 {
            return route.to_vec();
        }
        let control = self.cut_corners(route);
        self.interpolate(&control)
    }

    /// Replace each segment's end with the point at `cut_ratio` along it,
    /// when that point is usable.
    fn cut_corners(&self, route: &[WorldPoint]) -> Vec<WorldPoint> {
        let last = route[route.len() - 1];
        let mut control = Vec::with_capacity(route.len() + 1);
        control.push(route[0]);
        for pair in route.windows(2) {
            let cut = pair[0].lerp(&pair[1], self.config.cut_ratio);
            control.push(if self.grid.is_passable_world(cut) { cut } else { pair[1] });
        }
        if control.last() != Some(&last) {
            control.push(last);
        }
        control
    }

    /// Insert Hermite samples on long segments of the control polygon
    fn interpolate(&self, control: &[WorldPoint]) -> Vec<WorldPoint> {
        let n = control.len();
        let mut out = Vec::with_capacity(n * 2);
        for i in 0..n - 1 {
            let p0 = control[i.saturating_sub(1)];
            let p1 = control[i];
            let p2 = control[i + 1];
            let p3 = control[(i + 2).min(n - 1)];
            out.push(p1);

            let length = p1.distance(&p2);
            if length <= self.config.min_spline_segment {
                continue;
            }
            let inserts = ((length / self.config.min_spline_segment) as usize).min(self.config.max_inserted_points);
            let m1 = (p2 - p0) * self.config.tangent_scale;
            let m2 = (p3 - p1) * self.config.tangent_scale;
            for k in 1..=inserts {
                let t = k as f32 / (inserts + 1) as f32;
                let sample = hermite(p1, p2, m1, m2, t);
                if self.grid.is_passable_world(sample) {
                    out.push(sample);
                }
            }
        }
        out.push(control[n - 1]);
        out
    }
}

/// Cubic Hermite point between `p1` and `p2` with tangents `m1`, `m2`
fn hermite(p1: WorldPoint, p2: WorldPoint, m1: WorldPoint, m2: WorldPoint, t: f32) -> WorldPoint {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    p1 * h00 + m1 * h10 + p2 * h01 + m2 * h11
}

/// Turn angle at `curr` between the incoming and outgoing segments, in
/// degrees. Zero-length segments count as straight.
pub fn turn_angle_degrees(prev: WorldPoint, curr: WorldPoint, next: WorldPoint) -> f32 {
    let a = curr - prev;
    let b = next - curr;
    let la = a.length();
    let lb = b.length();
    if la < 1e-6 || lb < 1e-6 {
        return 0.0;
    }
    (a.dot(&b) / (la * lb)).clamp(-1.0, 1.0).acos().to_degrees()
}

/// See [`PathShaper::simplify`]
pub fn simplify_route(route: &[WorldPoint], turn_threshold_deg: f32, min_spacing: f32) -> Vec<WorldPoint> {
    if route.len() <= 2 {
        return route.to_vec();
    }
    let mut kept = vec![route[0]];
    for i in 1..route.len() - 1 {
        let turn = turn_angle_degrees(route[i - 1], route[i], route[i + 1]);
        let spacing = kept.last().map_or(0.0, |k| k.distance(&route[i]));
        if turn > turn_threshold_deg || spacing > min_spacing {
            kept.push(route[i]);
        }
    }
    kept.push(route[route.len() - 1]);
    kept
}

/// Total length of a route
pub fn path_length(route: &[WorldPoint]) -> f32 {
    route.windows(2).map(|w| w[0].distance(&w[1])).sum()
}
