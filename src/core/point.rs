//! Point and coordinate types for the navigation grid.
//!
//! The world is navigated on its horizontal plane, so both types use the
//! `x` and `z` axes. Height is never part of the grid.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Grid coordinates (integer cell indices)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    /// X cell index
    pub x: i32,
    /// Z cell index
    pub z: i32,
}

impl GridCoord {
    /// Create a new grid coordinate
    #[inline]
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Coordinate shifted by `(dx, dz)`, saturating at the `i32` range
    #[inline]
    pub fn offset(&self, dx: i32, dz: i32) -> GridCoord {
        GridCoord::new(self.x.saturating_add(dx), self.z.saturating_add(dz))
    }

    /// Manhattan distance to another coordinate
    #[inline]
    pub fn manhattan_distance(&self, other: &GridCoord) -> i32 {
        let d = self.x.abs_diff(other.x).saturating_add(self.z.abs_diff(other.z));
        i32::try_from(d).unwrap_or(i32::MAX)
    }

    /// Chebyshev distance (ring index around `other`)
    #[inline]
    pub fn chebyshev_distance(&self, other: &GridCoord) -> i32 {
        let d = self.x.abs_diff(other.x).max(self.z.abs_diff(other.z));
        i32::try_from(d).unwrap_or(i32::MAX)
    }

    /// Euclidean distance in cells
    #[inline]
    pub fn euclidean_distance(&self, other: &GridCoord) -> f32 {
        let dx = self.x.abs_diff(other.x) as f32;
        let dz = self.z.abs_diff(other.z) as f32;
        (dx * dx + dz * dz).sqrt()
    }

    /// The 8 neighbours, cardinals first (N, E, S, W, NE, SE, SW, NW).
    ///
    /// Indices `4..8` are the diagonals.
    #[inline]
    pub fn neighbors_8(&self) -> [GridCoord; 8] {
        [
            self.offset(0, 1),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(-1, 0),
            self.offset(1, 1),
            self.offset(1, -1),
            self.offset(-1, -1),
            self.offset(-1, 1),
        ]
    }

    /// Cells on the perimeter of the Chebyshev ring of `radius` around `self`.
    ///
    /// Radius 0 yields only `self`.
    pub fn ring(&self, radius: i32) -> impl Iterator<Item = GridCoord> + '_ {
        let r = radius.max(0);
        (-r..=r).flat_map(move |dx| {
            (-r..=r).filter_map(move |dz| {
                if dx.abs() == r || dz.abs() == r {
                    Some(self.offset(dx, dz))
                } else {
                    None
                }
            })
        })
    }
}

impl Add for GridCoord {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        self.offset(other.x, other.z)
    }
}

impl Sub for GridCoord {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        GridCoord::new(self.x.saturating_sub(other.x), self.z.saturating_sub(other.z))
    }
}

/// World coordinates (game units, f32)
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    /// X coordinate
    pub x: f32,
    /// Z coordinate
    pub z: f32,
}

impl WorldPoint {
    /// Create a new world point
    #[inline]
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Zero point (origin)
    pub const ZERO: WorldPoint = WorldPoint { x: 0.0, z: 0.0 };

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &WorldPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance (avoids sqrt)
    #[inline]
    pub fn distance_squared(&self, other: &WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }

    /// Length of this point as a vector from the origin
    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// Normalize to unit length (zero vectors are returned unchanged)
    #[inline]
    pub fn normalize(&self) -> WorldPoint {
        let len = self.length();
        if len > 0.0 {
            WorldPoint::new(self.x / len, self.z / len)
        } else {
            *self
        }
    }

    /// Dot product with another point (as vectors)
    #[inline]
    pub fn dot(&self, other: &WorldPoint) -> f32 {
        self.x * other.x + self.z * other.z
    }

    /// Linear interpolation towards `other` (`t = 0` is `self`)
    #[inline]
    pub fn lerp(&self, other: &WorldPoint, t: f32) -> WorldPoint {
        WorldPoint::new(
            self.x + (other.x - self.x) * t,
            self.z + (other.z - self.z) * t,
        )
    }
}

impl Add for WorldPoint {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        WorldPoint::new(self.x + other.x, self.z + other.z)
    }
}

impl Sub for WorldPoint {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        WorldPoint::new(self.x - other.x, self.z - other.z)
    }
}

impl Mul<f32> for WorldPoint {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f32) -> Self {
        WorldPoint::new(self.x * scalar, self.z * scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_cardinals_first() {
        let c = GridCoord::new(5, 5);
        let n = c.neighbors_8();
        assert_eq!(n[0], GridCoord::new(5, 6));
        assert_eq!(n[1], GridCoord::new(6, 5));
        assert_eq!(n[2], GridCoord::new(5, 4));
        assert_eq!(n[3], GridCoord::new(4, 5));
        for diag in &n[4..] {
            assert_eq!(diag.manhattan_distance(&c), 2);
        }
    }

    #[test]
    fn test_ring_perimeter_only() {
        let c = GridCoord::new(0, 0);
        assert_eq!(c.ring(0).collect::<Vec<_>>(), vec![c]);

        let ring2: Vec<_> = c.ring(2).collect();
        assert_eq!(ring2.len(), 16);
        assert!(ring2.iter().all(|p| p.chebyshev_distance(&c) == 2));
    }

    #[test]
    fn test_extreme_coordinates_saturate() {
        let edge = GridCoord::new(i32::MAX, i32::MIN);
        let n = edge.neighbors_8();
        assert_eq!(n[1], GridCoord::new(i32::MAX, i32::MIN));
        assert_eq!(n[2], GridCoord::new(i32::MAX, i32::MIN));
        assert_eq!(edge.ring(3).count(), 24);
        assert_eq!(edge.chebyshev_distance(&GridCoord::new(0, 0)), i32::MAX);
        assert_eq!(GridCoord::new(i32::MIN, 0).manhattan_distance(&GridCoord::new(i32::MAX, 0)), i32::MAX);
    }

    #[test]
    fn test_world_point_distance() {
        let a = WorldPoint::new(0.0, 0.0);
        let b = WorldPoint::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_lerp() {
        let a = WorldPoint::new(0.0, 0.0);
        let b = WorldPoint::new(10.0, -10.0);
        let p = a.lerp(&b, 0.7);
        assert!((p.x - 7.0).abs() < 1e-5);
        assert!((p.z + 7.0).abs() < 1e-5);
    }
}
