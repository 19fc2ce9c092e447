//! Shared navigation map.
//!
//! [`NavMap`] owns the [`NavGrid`] behind a reader-writer lock so that the
//! observation feed, stuck detection and planning threads can share it.
//! It also wires the grid to persistence and to an optional obstacle sink.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use log::{error, info, warn};
use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::NavConfig;
use crate::core::WorldPoint;
use crate::error::NavError;
use crate::grid::{MarkOutcome, NavGrid};
use crate::io::{GridStore, LayerKind, LayerMetadata};

/// Receives a notification for every blacklisting event.
///
/// Typically a visualizer that draws the new obstacle.
pub trait ObstacleSink: Send + Sync {
    /// A disc of `display_radius` world units around `position` was blacklisted
    fn add_obstacle(&self, position: WorldPoint, display_radius: f32);
}

/// Result of loading one layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Layer replaced from the store
    Loaded,
    /// Nothing stored yet
    NotFound,
    /// Stored geometry differs; current layer kept
    Mismatch,
    /// Read failed; current layer kept
    Failed,
    /// No store configured
    NoStore,
}

/// Per-layer load results
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadReport {
    pub walkable: LoadOutcome,
    pub blacklisted: LoadOutcome,
}

impl LoadReport {
    /// Both layers came from the store
    pub fn is_loaded(&self) -> bool {
        self.walkable == LoadOutcome::Loaded && self.blacklisted == LoadOutcome::Loaded
    }
}

/// Thread-safe navigation map
pub struct NavMap {
    grid: RwLock<NavGrid>,
    store: Option<Box<dyn GridStore>>,
    sink: Option<Arc<dyn ObstacleSink>>,
    revision: AtomicU64,
    autosave_interval: Option<Duration>,
    last_save: Mutex<Instant>,
}

impl NavMap {
    /// Wrap a grid with no store, sink or autosave
    pub fn new(grid: NavGrid) -> Self {
        Self {
            grid: RwLock::new(grid),
            store: None,
            sink: None,
            revision: AtomicU64::new(0),
            autosave_interval: None,
            last_save: Mutex::new(Instant::now()),
        }
    }

    /// Build an empty map with a file store and autosave as configured
    pub fn from_config(config: &NavConfig) -> Self {
        Self::new(NavGrid::new(config.grid.clone()))
            .with_store(config.persistence.file_store())
            .with_autosave_interval(config.persistence.autosave_interval())
    }

    /// Attach a layer store
    pub fn with_store(mut self, store: impl GridStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Attach an obstacle sink
    pub fn with_obstacle_sink(mut self, sink: Arc<dyn ObstacleSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the autosave interval (None disables)
    pub fn with_autosave_interval(mut self, interval: Option<Duration>) -> Self {
        self.autosave_interval = interval;
        self
    }

    /// Shared access to the grid
    pub fn read(&self) -> RwLockReadGuard<'_, NavGrid> {
        self.grid.read()
    }

    /// Exclusive access to the grid.
    ///
    /// Changes made through this guard do not bump [`NavMap::revision`].
    pub fn write(&self) -> RwLockWriteGuard<'_, NavGrid> {
        self.grid.write()
    }

    /// Counter bumped whenever the blacklist layer changes
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    fn bump_revision(&self) {
        self.revision.fetch_add(1, Ordering::AcqRel);
    }

    /// See [`NavGrid::mark_walkable_area`]
    pub fn mark_walkable_area(&self, position: WorldPoint) -> MarkOutcome {
        self.grid.write().mark_walkable_area(position)
    }

    /// See [`NavGrid::mark_walkable_area_at`]
    pub fn mark_walkable_area_at(&self, position: WorldPoint, radius: i32, now: Instant) -> MarkOutcome {
        self.grid.write().mark_walkable_area_at(position, radius, now)
    }

    /// Blacklist around `position`, notify the sink and persist the
    /// blacklist layer immediately.
    ///
    /// Returns the number of newly blacklisted cells.
    pub fn blacklist_area(&self, position: WorldPoint, radius: f32) -> usize {
        let (changed, display_radius) = {
            let mut grid = self.grid.write();
            let changed = grid.blacklist_cells(position, radius).len();
            let capped = radius.clamp(0.0, grid.config().blacklist_radius_cap);
            (changed, capped * grid.cell_size())
        };
        if changed == 0 {
            return 0;
        }

        self.bump_revision();
        warn!(
            "[NavMap] Blacklisted {} cells around ({:.2}, {:.2})",
            changed, position.x, position.z
        );
        if let Some(sink) = &self.sink {
            sink.add_obstacle(position, display_radius);
        }
        self.save_layer(LayerKind::Blacklisted);
        changed
    }

    /// See [`NavGrid::find_nearest_walkable`]
    pub fn find_nearest_walkable(&self, position: WorldPoint) -> WorldPoint {
        self.grid.read().find_nearest_walkable(position)
    }

    /// See [`NavGrid::ensure_path_exists`]. Bumps the revision if anything
    /// changed, since cleared blacklist cells open new routes.
    pub fn ensure_path_exists(&self, from: WorldPoint, to: WorldPoint) -> usize {
        let changed = self.grid.write().ensure_path_exists(from, to);
        if changed > 0 {
            self.bump_revision();
        }
        changed
    }

    /// See [`NavGrid::optimize_grid`]
    pub fn optimize_grid(&self) -> usize {
        self.grid.write().optimize_grid()
    }

    /// Clear both layers in memory
    pub fn clear_all_data(&self) {
        self.grid.write().clear_all();
        self.bump_revision();
        info!("[NavMap] Cleared all navigation data");
    }

    fn snapshot(&self, layer: LayerKind) -> (Vec<bool>, LayerMetadata) {
        let grid = self.grid.read();
        let cells = match layer {
            LayerKind::Walkable => grid.walkable_layer().to_vec(),
            LayerKind::Blacklisted => grid.blacklisted_layer().to_vec(),
        };
        (cells, layer_metadata(&grid))
    }

    /// Persist one layer. Returns false if there is no store or the save failed.
    pub fn save_layer(&self, layer: LayerKind) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        let (cells, metadata) = self.snapshot(layer);
        match store.save(layer, &cells, &metadata) {
            Ok(()) => true,
            Err(e) => {
                error!("[NavMap] Failed to save {:?} layer: {}", layer, e);
                false
            }
        }
    }

    /// Persist both layers
    pub fn save(&self) -> bool {
        let walkable = self.save_layer(LayerKind::Walkable);
        let blacklisted = self.save_layer(LayerKind::Blacklisted);
        *self.last_save.lock() = Instant::now();
        if walkable && blacklisted {
            info!("[NavMap] Saved navigation layers");
        }
        walkable && blacklisted
    }

    /// Replace one layer from the store.
    ///
    /// On any failure the in-memory layer is left untouched. A stored
    /// origin is adopted when the dimensions match.
    pub fn load_layer(&self, layer: LayerKind) -> LoadOutcome {
        let Some(store) = &self.store else {
            return LoadOutcome::NoStore;
        };
        if !store.exists(layer) {
            return LoadOutcome::NotFound;
        }

        let expected = layer_metadata(&self.grid.read());
        let loaded = match store.load(layer, &expected) {
            Ok(loaded) => loaded,
            Err(e @ NavError::DimensionMismatch { .. }) => {
                warn!("[NavMap] {:?} layer not loaded, keeping current grid: {}", layer, e);
                return LoadOutcome::Mismatch;
            }
            Err(e) => {
                warn!("[NavMap] {:?} layer not loaded: {}", layer, e);
                return LoadOutcome::Failed;
            }
        };

        let mut grid = self.grid.write();
        let replaced = match layer {
            LayerKind::Walkable => grid.replace_walkable_layer(loaded.cells),
            LayerKind::Blacklisted => grid.replace_blacklisted_layer(loaded.cells),
        };
        if !replaced {
            warn!("[NavMap] {:?} layer has the wrong cell count, ignored", layer);
            return LoadOutcome::Failed;
        }
        if loaded.metadata.origin != grid.origin() {
            info!(
                "[NavMap] Adopting stored origin ({:.2}, {:.2})",
                loaded.metadata.origin.x, loaded.metadata.origin.z
            );
            grid.set_origin(loaded.metadata.origin);
        }
        drop(grid);

        if layer == LayerKind::Blacklisted {
            self.bump_revision();
        }
        LoadOutcome::Loaded
    }

    /// Load both layers
    pub fn load(&self) -> LoadReport {
        LoadReport {
            walkable: self.load_layer(LayerKind::Walkable),
            blacklisted: self.load_layer(LayerKind::Blacklisted),
        }
    }

    /// Whether the autosave interval has elapsed at `now`
    pub fn autosave_due(&self, now: Instant) -> bool {
        match self.autosave_interval {
            Some(interval) => now.saturating_duration_since(*self.last_save.lock()) >= interval,
            None => false,
        }
    }

    /// Save both layers if the autosave interval has elapsed.
    /// Returns true if a save ran and succeeded.
    pub fn save_if_due(&self, now: Instant) -> bool {
        if !self.autosave_due(now) {
            return false;
        }
        let saved = self.save();
        *self.last_save.lock() = now;
        saved
    }

    /// Final save
    pub fn shutdown(&self) -> bool {
        if self.store.is_none() {
            return true;
        }
        self.save()
    }
}

fn layer_metadata(grid: &NavGrid) -> LayerMetadata {
    LayerMetadata::new(grid.origin(), grid.size_x(), grid.size_z(), grid.cell_size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GridCoord;
    use crate::io::FileGridStore;
    use std::thread;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingSink {
        obstacles: Mutex<Vec<(WorldPoint, f32)>>,
    }

    impl ObstacleSink for RecordingSink {
        fn add_obstacle(&self, position: WorldPoint, display_radius: f32) {
            self.obstacles.lock().push((position, display_radius));
        }
    }

    fn grid() -> NavGrid {
        NavGrid::with_dimensions(40, 40, 1.0, WorldPoint::ZERO)
    }

    #[test]
    fn test_blacklist_notifies_and_persists() {
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let map = NavMap::new(grid())
            .with_store(FileGridStore::new(dir.path()))
            .with_obstacle_sink(sink.clone());

        let changed = map.blacklist_area(WorldPoint::new(10.0, 10.0), 1.0);
        assert_eq!(changed, 5);
        assert_eq!(map.revision(), 1);
        assert_eq!(sink.obstacles.lock().as_slice(), &[(WorldPoint::new(10.0, 10.0), 1.0)]);
        assert!(dir.path().join("blacklist.mgl").is_file());
        assert!(!dir.path().join("walkable.mgl").exists());

        // Nothing new: no revision bump, no notification
        assert_eq!(map.blacklist_area(WorldPoint::new(10.0, 10.0), 1.0), 0);
        assert_eq!(map.revision(), 1);
        assert_eq!(sink.obstacles.lock().len(), 1);
    }

    #[test]
    fn test_marking_does_not_bump_revision() {
        let map = NavMap::new(grid());
        map.mark_walkable_area(WorldPoint::new(5.0, 5.0));
        assert_eq!(map.revision(), 0);
        assert!(map.read().is_walkable(GridCoord::new(5, 5)));
    }

    #[test]
    fn test_save_and_load_layers() {
        let dir = TempDir::new().unwrap();
        let map = NavMap::new(grid()).with_store(FileGridStore::new(dir.path()));
        map.write().fill_walkable_rect(GridCoord::new(2, 2), GridCoord::new(6, 6));
        map.write().set_blacklisted(GridCoord::new(3, 3), true);
        assert!(map.save());

        let restored = NavMap::new(grid()).with_store(FileGridStore::new(dir.path()));
        let report = restored.load();
        assert!(report.is_loaded());
        assert_eq!(restored.read().stats(), map.read().stats());
        assert!(restored.read().is_blacklisted(GridCoord::new(3, 3)));
        assert_eq!(restored.revision(), 1);
    }

    #[test]
    fn test_load_mismatch_keeps_grid() {
        let dir = TempDir::new().unwrap();
        let map = NavMap::new(grid()).with_store(FileGridStore::new(dir.path()));
        assert!(map.save());

        let other = NavMap::new(NavGrid::with_dimensions(30, 40, 1.0, WorldPoint::ZERO))
            .with_store(FileGridStore::new(dir.path()));
        other.write().set_walkable(GridCoord::new(1, 1), true);
        let report = other.load();
        assert_eq!(report.walkable, LoadOutcome::Mismatch);
        assert_eq!(report.blacklisted, LoadOutcome::Mismatch);
        assert!(other.read().is_walkable(GridCoord::new(1, 1)));
        assert_eq!(other.read().size_x(), 30);
    }

    #[test]
    fn test_load_without_store_or_files() {
        assert_eq!(NavMap::new(grid()).load_layer(LayerKind::Walkable), LoadOutcome::NoStore);

        let dir = TempDir::new().unwrap();
        let map = NavMap::new(grid()).with_store(FileGridStore::new(dir.path()));
        assert_eq!(map.load_layer(LayerKind::Walkable), LoadOutcome::NotFound);
    }

    #[test]
    fn test_autosave_schedule() {
        let dir = TempDir::new().unwrap();
        let map = NavMap::new(grid())
            .with_store(FileGridStore::new(dir.path()))
            .with_autosave_interval(Some(Duration::from_secs(60)));
        let start = Instant::now();

        assert!(!map.autosave_due(start));
        assert!(map.autosave_due(start + Duration::from_secs(61)));
        assert!(map.save_if_due(start + Duration::from_secs(61)));
        assert!(!map.autosave_due(start + Duration::from_secs(62)));
        assert!(dir.path().join("walkable.mgl").is_file());

        let disabled = NavMap::new(grid());
        assert!(!disabled.autosave_due(start + Duration::from_secs(3600)));
    }

    #[test]
    fn test_concurrent_mark_and_read() {
        let map = Arc::new(NavMap::new(grid()));
        let writer = {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                let start = Instant::now();
                for i in 0..30 {
                    let p = WorldPoint::new(5.0 + i as f32, 20.0);
                    map.mark_walkable_area_at(p, 2, start + Duration::from_secs(i));
                }
            })
        };
        for _ in 0..30 {
            let snapped = map.find_nearest_walkable(WorldPoint::new(20.0, 20.0));
            assert!(snapped.x.is_finite());
        }
        writer.join().unwrap();
        assert!(map.read().is_walkable(GridCoord::new(34, 20)));
    }
}
