//! # Marga-Nav: Learned-Grid Route Planning
//!
//! Route planning for an agent that learns where it can walk by walking.
//! Observed positions paint a walkable layer; places where the agent got
//! stuck paint a blacklist that vetoes routing. The planner searches that
//! grid and turns the result into a smooth, wall-shy list of waypoints.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use marga_nav::core::{GridCoord, WorldPoint};
//! use marga_nav::grid::NavGrid;
//! use marga_nav::pathfinding::RoutePlanner;
//!
//! let mut grid = NavGrid::with_dimensions(200, 200, 1.0, WorldPoint::ZERO);
//! grid.fill_walkable_rect(GridCoord::new(10, 10), GridCoord::new(190, 190));
//!
//! let planner = RoutePlanner::with_defaults();
//! let route = planner.find_path(&grid, WorldPoint::new(20.0, 20.0), WorldPoint::new(180.0, 150.0));
//! println!("{} waypoints", route.len());
//! ```
//!
//! ## Coordinate Frame
//!
//! Navigation happens on the horizontal `x`/`z` plane. Cell `(x, z)` sits at
//! world point `origin + (x, z) * cell_size`.
//!
//! ## Architecture
//!
//! - [`core`]: Coordinate types (GridCoord, WorldPoint)
//! - [`grid`]: Walkable/blacklisted layers and their operations
//! - [`map`]: Thread-safe map with persistence and obstacle notifications
//! - [`io`]: Layer file format and stores
//! - [`pathfinding`]: A*, bidirectional A*, route cache, shaping, emergency path
//! - [`config`]: YAML configuration
//!
//! ## Data Flow
//!
//! ```text
//!   position feed ──► mark_walkable_area ──┐
//!                                          ▼
//!   stuck detector ─► blacklist_area ──► NavGrid ◄──► GridStore (.mgl/.meta)
//!                                          │
//!                                          ▼
//!   find_path ─► cache ─► resolve ─► A* / BiA* ─► shape ─► route
//!                                       │
//!                                       └─ (fail) ─► emergency path
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod grid;
pub mod io;
pub mod map;
pub mod pathfinding;

pub use config::NavConfig;
pub use crate::core::{GridCoord, WorldPoint};
pub use error::{NavError, Result};
pub use grid::{GridConfig, GridStats, MarkOutcome, NavGrid};
pub use map::{LoadOutcome, LoadReport, NavMap, ObstacleSink};
pub use pathfinding::{PlanOutcome, PlanSource, PlannerConfig, RoutePlanner, ShaperConfig};
