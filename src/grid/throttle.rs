//! Rate limiter for the walkable-marking feed.

use std::time::{Duration, Instant};

use crate::core::WorldPoint;

/// Drops marks that are both close to and soon after the last accepted one.
#[derive(Clone, Debug)]
pub struct MarkThrottle {
    min_distance: f32,
    min_interval: Duration,
    last: Option<(WorldPoint, Instant)>,
}

impl MarkThrottle {
    /// Create a throttle with the given distance and interval thresholds
    pub fn new(min_distance: f32, min_interval: Duration) -> Self {
        Self {
            min_distance,
            min_interval,
            last: None,
        }
    }

    /// Would a mark at `position` at time `now` be accepted?
    pub fn accepts(&self, position: WorldPoint, now: Instant) -> bool {
        match self.last {
            None => true,
            Some((last_pos, last_time)) => {
                let near = last_pos.distance(&position) < self.min_distance;
                let recent = now.saturating_duration_since(last_time) < self.min_interval;
                !(near && recent)
            }
        }
    }

    /// Remember an accepted mark
    pub fn record(&mut self, position: WorldPoint, now: Instant) {
        self.last = Some((position, now));
    }

    /// Forget the last accepted mark
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throttle() -> MarkThrottle {
        MarkThrottle::new(5.0, Duration::from_millis(100))
    }

    #[test]
    fn test_first_mark_accepted() {
        assert!(throttle().accepts(WorldPoint::ZERO, Instant::now()));
    }

    #[test]
    fn test_near_and_recent_rejected() {
        let mut t = throttle();
        let now = Instant::now();
        t.record(WorldPoint::ZERO, now);
        assert!(!t.accepts(WorldPoint::new(1.0, 1.0), now + Duration::from_millis(10)));
    }

    #[test]
    fn test_far_or_late_accepted() {
        let mut t = throttle();
        let now = Instant::now();
        t.record(WorldPoint::ZERO, now);
        // Moved far enough
        assert!(t.accepts(WorldPoint::new(6.0, 0.0), now + Duration::from_millis(10)));
        // Waited long enough
        assert!(t.accepts(WorldPoint::new(1.0, 0.0), now + Duration::from_millis(150)));
    }
}
