//! Core coordinate types shared by the grid, planner and shaper.
//!
//! - [`GridCoord`]: integer cell indices on the x/z plane
//! - [`WorldPoint`]: continuous world position on the x/z plane

mod point;

pub use point::{GridCoord, WorldPoint};
