//! Configuration loading for marga-nav.
//!
//! Loads all configuration from a single YAML file with sensible defaults.
//!
//! ```rust,ignore
//! use marga_nav::config::NavConfig;
//!
//! // Load from default path (configs/marga.yaml), or defaults if absent
//! let config = NavConfig::load_default()?;
//!
//! let map = NavMap::from_config(&config);
//! let planner = config.route_planner();
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | `grid` | Dimensions, origin, marking and blacklist tuning |
//! | `planner` | Search limits, penalties, cache, emergency path |
//! | `shaper` | Route shaping passes |
//! | [`PersistenceSection`] | Layer directory, file stems, autosave, lock retry |
//!
//! ## Example YAML
//!
//! ```yaml
//! grid:
//!   size_x: 2000
//!   size_z: 2000
//!   cell_size: 1.0
//! planner:
//!   max_iterations: 20000
//!   bidirectional_threshold: 2000.0
//! persistence:
//!   directory: ./navdata
//!   autosave_interval_secs: 60
//! ```

mod defaults;
mod nav;
mod persistence;

pub use nav::NavConfig;
pub use persistence::PersistenceSection;
