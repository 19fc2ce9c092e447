//! Main NavConfig and conversion methods.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};
use crate::grid::{GridConfig, NavGrid};
use crate::pathfinding::{PlannerConfig, RoutePlanner, ShaperConfig};

use super::persistence::PersistenceSection;

/// Full marga-nav configuration loaded from YAML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct NavConfig {
    /// Grid settings
    #[serde(default)]
    pub grid: GridConfig,

    /// Search settings
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Route shaping settings
    #[serde(default)]
    pub shaper: ShaperConfig,

    /// Persistence settings
    #[serde(default)]
    pub persistence: PersistenceSection,
}

impl NavConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/marga.yaml)
    pub fn load_default() -> Result<Self> {
        let path = Path::new("configs/marga.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no grid can be built from
    pub fn validate(&self) -> Result<()> {
        if self.grid.size_x == 0 || self.grid.size_z == 0 {
            return Err(NavError::Config("grid dimensions must be non-zero".to_string()));
        }
        if self.grid.cell_size.is_nan() || self.grid.cell_size <= 0.0 {
            return Err(NavError::Config(format!(
                "cell_size must be positive, got {}",
                self.grid.cell_size
            )));
        }
        Ok(())
    }

    /// Empty grid for this configuration
    pub fn build_grid(&self) -> NavGrid {
        NavGrid::new(self.grid.clone())
    }

    /// Route planner for this configuration
    pub fn route_planner(&self) -> RoutePlanner {
        RoutePlanner::new(self.planner.clone(), self.shaper.clone())
    }
}
