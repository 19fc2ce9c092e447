//! Route planning on the navigation grid.
//!
//! - **A* Search**: plain and bidirectional, with proximity penalties
//! - **Route cache**: FIFO, keyed by exact endpoints
//! - **Emergency path**: straight-line fallback when search fails
//! - **Shaping**: wall nudge, simplification, spline smoothing
//!
//! ```rust,ignore
//! use marga_nav::pathfinding::RoutePlanner;
//!
//! let planner = RoutePlanner::with_defaults();
//! let route = planner.find_path(&grid, start, end);
//! assert!(!route.is_empty());
//! ```

pub mod astar;
pub mod cache;
pub mod emergency;
pub mod planner;
pub mod shaping;

pub use astar::{
    AStarPlanner, BidirectionalPlanner, PathFailure, PathResult, PlannerConfig, find_path,
    path_exists,
};
pub use cache::PathCache;
pub use emergency::create_emergency_path;
pub use planner::{PlanOutcome, PlanSource, RoutePlanner};
pub use shaping::{
    PathShaper, ShaperConfig, path_length, simplify_route, turn_angle_degrees,
};
