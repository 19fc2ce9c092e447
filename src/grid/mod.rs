//! Navigation grid: walkable and blacklisted layers over the x/z plane.
//!
//! The walkable layer grows from agent observation
//! ([`NavGrid::mark_walkable_area`]); the blacklisted layer records places
//! the agent got stuck and vetoes them for routing.

mod config;
mod operations;
mod storage;
mod throttle;

pub use config::GridConfig;
pub use operations::{MarkOutcome, line_cells};
pub use storage::{GridStats, NavGrid};
pub use throttle::MarkThrottle;
