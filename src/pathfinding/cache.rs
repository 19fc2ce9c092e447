//! FIFO route cache keyed by exact start/end points.

use std::collections::{HashMap, VecDeque};

use log::{debug, trace};

use crate::core::WorldPoint;

/// Bit-exact key for a (start, end) pair. `-0.0` and `0.0` share a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct RouteKey([u32; 4]);

impl RouteKey {
    fn new(start: WorldPoint, end: WorldPoint) -> Self {
        let bits = |v: f32| (v + 0.0).to_bits();
        Self([bits(start.x), bits(start.z), bits(end.x), bits(end.z)])
    }
}

/// Bounded route cache with first-in-first-out eviction.
///
/// Entries are never invalidated by grid changes; callers clear the
/// cache when that matters.
#[derive(Debug)]
pub struct PathCache {
    capacity: usize,
    routes: HashMap<RouteKey, Vec<WorldPoint>>,
    order: VecDeque<RouteKey>,
}

impl PathCache {
    /// Create a cache holding at most `capacity` routes (0 disables caching)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            routes: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Cached route for exactly this (start, end)
    pub fn get(&self, start: WorldPoint, end: WorldPoint) -> Option<&[WorldPoint]> {
        self.routes.get(&RouteKey::new(start, end)).map(Vec::as_slice)
    }

    pub fn contains(&self, start: WorldPoint, end: WorldPoint) -> bool {
        self.routes.contains_key(&RouteKey::new(start, end))
    }

    /// Store a route, evicting the oldest entry when full.
    /// Replacing an existing key keeps its queue position.
    pub fn insert(&mut self, start: WorldPoint, end: WorldPoint, route: Vec<WorldPoint>) {
        if self.capacity == 0 {
            return;
        }
        let key = RouteKey::new(start, end);
        if let Some(existing) = self.routes.get_mut(&key) {
            *existing = route;
            return;
        }
        while self.routes.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.routes.remove(&oldest);
            debug!("[PathCache] Evicted oldest route ({} cached)", self.routes.len());
        }
        self.order.push_back(key);
        self.routes.insert(key, route);
        trace!("[PathCache] Stored route ({} cached)", self.routes.len());
    }

    pub fn clear(&mut self) {
        self.routes.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32) -> WorldPoint {
        WorldPoint::new(x, 0.0)
    }

    fn route(x: f32) -> Vec<WorldPoint> {
        vec![p(x), p(x + 1.0), p(x + 2.0)]
    }

    #[test]
    fn test_exact_key_match() {
        let mut cache = PathCache::new(4);
        cache.insert(p(1.0), p(5.0), route(1.0));
        assert!(cache.contains(p(1.0), p(5.0)));
        assert_eq!(cache.get(p(1.0), p(5.0)).map(<[_]>::len), Some(3));
        assert!(cache.get(p(1.0001), p(5.0)).is_none());
        assert!(cache.get(p(5.0), p(1.0)).is_none());
    }

    #[test]
    fn test_negative_zero_shares_key() {
        let mut cache = PathCache::new(4);
        cache.insert(WorldPoint::new(0.0, 1.0), p(5.0), route(0.0));
        assert!(cache.contains(WorldPoint::new(-0.0, 1.0), p(5.0)));
    }

    #[test]
    fn test_fifo_eviction() {
        let mut cache = PathCache::new(3);
        for i in 0..4 {
            cache.insert(p(i as f32), p(100.0), route(i as f32));
        }
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(p(0.0), p(100.0)));
        assert!(cache.contains(p(1.0), p(100.0)));
        assert!(cache.contains(p(3.0), p(100.0)));
    }

    #[test]
    fn test_reinsert_does_not_duplicate() {
        let mut cache = PathCache::new(2);
        cache.insert(p(0.0), p(9.0), route(0.0));
        cache.insert(p(0.0), p(9.0), route(7.0));
        cache.insert(p(1.0), p(9.0), route(1.0));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(p(0.0), p(9.0)).map(|r| r[0]), Some(p(7.0)));

        // Oldest key is still (0, 9)
        cache.insert(p(2.0), p(9.0), route(2.0));
        assert!(!cache.contains(p(0.0), p(9.0)));
        assert!(cache.contains(p(1.0), p(9.0)));
    }

    #[test]
    fn test_zero_capacity_and_clear() {
        let mut disabled = PathCache::new(0);
        disabled.insert(p(0.0), p(1.0), route(0.0));
        assert!(disabled.is_empty());

        let mut cache = PathCache::new(2);
        cache.insert(p(0.0), p(1.0), route(0.0));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 2);
    }
}
