//! Persistence configuration section.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::io::FileGridStore;

use super::defaults;

/// Persistence settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersistenceSection {
    /// Directory holding the layer files
    #[serde(default = "defaults::directory")]
    pub directory: String,

    /// File stem of the walkable layer
    #[serde(default = "defaults::walkable_stem")]
    pub walkable_stem: String,

    /// File stem of the blacklist layer
    #[serde(default = "defaults::blacklist_stem")]
    pub blacklist_stem: String,

    /// Auto-save interval (seconds, 0=disabled)
    #[serde(default = "defaults::autosave_interval_secs")]
    pub autosave_interval_secs: u64,

    /// Attempts per file operation while the file is locked
    #[serde(default = "defaults::lock_retry_attempts")]
    pub lock_retry_attempts: u32,

    /// Pause between attempts (milliseconds)
    #[serde(default = "defaults::lock_retry_delay_ms")]
    pub lock_retry_delay_ms: u64,
}

impl Default for PersistenceSection {
    fn default() -> Self {
        Self {
            directory: defaults::directory(),
            walkable_stem: defaults::walkable_stem(),
            blacklist_stem: defaults::blacklist_stem(),
            autosave_interval_secs: defaults::autosave_interval_secs(),
            lock_retry_attempts: defaults::lock_retry_attempts(),
            lock_retry_delay_ms: defaults::lock_retry_delay_ms(),
        }
    }
}

impl PersistenceSection {
    /// Autosave period, None when disabled
    pub fn autosave_interval(&self) -> Option<Duration> {
        (self.autosave_interval_secs > 0).then(|| Duration::from_secs(self.autosave_interval_secs))
    }

    /// File store for this section
    pub fn file_store(&self) -> FileGridStore {
        FileGridStore::new(&self.directory)
            .with_stems(&self.walkable_stem, &self.blacklist_stem)
            .with_retry(
                self.lock_retry_attempts,
                Duration::from_millis(self.lock_retry_delay_ms),
            )
    }
}
