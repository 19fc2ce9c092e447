//! Route planner: cache, endpoint resolution, search strategy, shaping
//! and emergency fallback behind one call.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use log::{debug, warn};
use parking_lot::Mutex;

use crate::core::WorldPoint;
use crate::grid::NavGrid;
use crate::map::NavMap;

use super::astar::{AStarPlanner, BidirectionalPlanner, PlannerConfig};
use super::cache::PathCache;
use super::emergency::create_emergency_path;
use super::shaping::{PathShaper, ShaperConfig};

/// Where a planned route came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanSource {
    /// Served from the route cache
    Cached,
    /// Plain A*
    Direct,
    /// Bidirectional A*
    Bidirectional,
    /// Bidirectional A* failed; plain A* succeeded
    BidirectionalFallback,
    /// Every search failed; straight-line fallback
    Emergency,
}

/// A planned route with diagnostics
#[derive(Clone, Debug)]
pub struct PlanOutcome {
    /// Never empty
    pub route: Vec<WorldPoint>,
    pub source: PlanSource,
    /// Nodes expanded across all searches in this call
    pub nodes_expanded: usize,
    /// Start after snapping to the nearest usable cell
    pub resolved_start: WorldPoint,
    /// End after snapping to the nearest usable cell
    pub resolved_end: WorldPoint,
}

/// Stateful route planner.
///
/// Owns the route cache; safe to share between threads.
pub struct RoutePlanner {
    config: PlannerConfig,
    shaper_config: ShaperConfig,
    cache: Mutex<PathCache>,
    searches: AtomicUsize,
    seen_revision: AtomicU64,
}

impl RoutePlanner {
    /// Create a planner
    pub fn new(config: PlannerConfig, shaper_config: ShaperConfig) -> Self {
        let cache = PathCache::new(config.cache_capacity);
        Self {
            config,
            shaper_config,
            cache: Mutex::new(cache),
            searches: AtomicUsize::new(0),
            seen_revision: AtomicU64::new(0),
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(PlannerConfig::default(), ShaperConfig::default())
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Find a route from `start` to `end`. Never returns an empty route.
    pub fn find_path(&self, grid: &NavGrid, start: WorldPoint, end: WorldPoint) -> Vec<WorldPoint> {
        self.plan(grid, start, end).route
    }

    /// Plan against a shared map, clearing the cache first if the map's
    /// blacklist changed since the last call.
    pub fn find_path_on(&self, map: &NavMap, start: WorldPoint, end: WorldPoint) -> Vec<WorldPoint> {
        let grid = map.read();
        self.invalidate_if_stale(map.revision());
        self.plan(&grid, start, end).route
    }

    /// Clear the cache if `revision` differs from the last one seen
    pub fn invalidate_if_stale(&self, revision: u64) -> bool {
        let previous = self.seen_revision.swap(revision, Ordering::AcqRel);
        if previous == revision {
            return false;
        }
        self.clear_cache();
        debug!("[RoutePlanner] Map revision {} -> {}, cache cleared", previous, revision);
        true
    }

    /// Find a route and report how it was produced.
    ///
    /// 1. Exact cache hit on the requested endpoints
    /// 2. Snap both endpoints to usable cells
    /// 3. Bidirectional search for long trips (plain A* if it fails),
    ///    plain A* otherwise
    /// 4. Shape the result; cache it if it has more than two points
    /// 5. Straight-line emergency route if every search failed
    pub fn plan(&self, grid: &NavGrid, start: WorldPoint, end: WorldPoint) -> PlanOutcome {
        if let Some(route) = self.cache.lock().get(start, end) {
            // Cached routes run exactly from the resolved start to the resolved end
            return PlanOutcome {
                route: route.to_vec(),
                source: PlanSource::Cached,
                nodes_expanded: 0,
                resolved_start: route.first().copied().unwrap_or(start),
                resolved_end: route.last().copied().unwrap_or(end),
            };
        }

        let resolved_start = grid.find_nearest_walkable(start);
        let resolved_end = grid.find_nearest_walkable(end);

        let (found, source, nodes_expanded) =
            if resolved_start.distance(&resolved_end) > self.config.bidirectional_threshold {
                self.searches.fetch_add(1, Ordering::Relaxed);
                let result = BidirectionalPlanner::new(grid, self.config.clone())
                    .find_path(resolved_start, resolved_end);
                if result.success {
                    (result.path, PlanSource::Bidirectional, result.nodes_expanded)
                } else {
                    debug!("[RoutePlanner] Bidirectional search failed, retrying with plain A*");
                    self.searches.fetch_add(1, Ordering::Relaxed);
                    let retry = AStarPlanner::new(grid, self.config.clone())
                        .find_path(resolved_start, resolved_end);
                    (
                        retry.path,
                        PlanSource::BidirectionalFallback,
                        result.nodes_expanded + retry.nodes_expanded,
                    )
                }
            } else {
                self.searches.fetch_add(1, Ordering::Relaxed);
                let result = AStarPlanner::new(grid, self.config.clone())
                    .find_path(resolved_start, resolved_end);
                (result.path, PlanSource::Direct, result.nodes_expanded)
            };

        if found.is_empty() {
            warn!(
                "[RoutePlanner] No route ({:.1},{:.1}) -> ({:.1},{:.1}), using emergency path",
                resolved_start.x, resolved_start.z, resolved_end.x, resolved_end.z
            );
            return PlanOutcome {
                route: self.create_emergency_path(grid, resolved_start, resolved_end),
                source: PlanSource::Emergency,
                nodes_expanded,
                resolved_start,
                resolved_end,
            };
        }

        let route = PathShaper::new(grid, self.shaper_config.clone()).shape(&found);
        if route.len() > 2 {
            self.cache.lock().insert(start, end, route.clone());
        }

        PlanOutcome {
            route,
            source,
            nodes_expanded,
            resolved_start,
            resolved_end,
        }
    }

    /// See [`create_emergency_path`]
    pub fn create_emergency_path(&self, grid: &NavGrid, start: WorldPoint, end: WorldPoint) -> Vec<WorldPoint> {
        create_emergency_path(grid, start, end, &self.config)
    }

    /// Number of searches run (cache hits excluded)
    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::Relaxed)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self::with_defaults()
    }
}
