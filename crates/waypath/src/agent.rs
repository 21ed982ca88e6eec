//! Reference navigation agent that streams a known polyline.
//!
//! `WaypointAgent` does no pathfinding. A caller (or [`path_to`]) hands it a
//! list of waypoints and it walks them in straight lines, cutting each
//! [`advance`] query short at the next corner so every returned [`Segment`]
//! stays straight. The agent runs one segment ahead of the actor it serves:
//! after `advance` returns, the agent already stands at the segment end.
//!
//! [`path_to`]: NavigationProvider::path_to
//! [`advance`]: NavigationProvider::advance

use std::collections::VecDeque;
use std::time::Duration;

use glam::Vec3;
use tracing::trace;

use crate::{Bounds, NavigationProvider, Segment};

/// Straight-line agent over a queue of waypoints, confined to [`Bounds`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use glam::Vec3;
/// use waypath::{Bounds, NavigationProvider, WaypointAgent};
///
/// let mut agent = WaypointAgent::new(Vec3::ZERO).with_bounds(Bounds::new(20.0, 20.0, 20.0));
///
/// // Outside the walkable volume
/// assert!(!agent.path_to(Vec3::new(50.0, 0.0, 0.0)));
///
/// assert!(agent.path_to(Vec3::new(1.0, 0.0, 0.0)));
/// let segment = agent.advance(Duration::from_secs(1), 5.0).unwrap();
/// assert_eq!(segment.end, Vec3::new(1.0, 0.0, 0.0));
/// assert!(agent.advance(Duration::from_secs(1), 5.0).is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointAgent {
    position: Vec3,
    waypoints: VecDeque<Vec3>,
    bounds: Bounds,
}

impl WaypointAgent {
    /// Create an idle agent at `position` with unbounded walkable space.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            waypoints: VecDeque::new(),
            bounds: Bounds::unbounded(),
        }
    }

    /// Confine the agent to `bounds`. The current position is clamped.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self.position = bounds.clamp(self.position);
        self
    }

    /// Replace the current path with an explicit polyline.
    ///
    /// Returns `false` (and leaves the old path untouched) if any waypoint
    /// lies outside the bounds.
    pub fn set_path<I>(&mut self, waypoints: I) -> bool
    where
        I: IntoIterator<Item = Vec3>,
    {
        let waypoints: VecDeque<Vec3> = waypoints.into_iter().collect();
        if let Some(outside) = waypoints.iter().find(|p| !self.bounds.contains(**p)) {
            trace!(?outside, "waypoint outside walkable bounds");
            return false;
        }
        self.waypoints = waypoints;
        true
    }

    /// Drop the remaining path.
    pub fn clear_path(&mut self) {
        self.waypoints.clear();
    }

    /// Waypoints not yet reached, nearest first.
    #[must_use]
    pub fn remaining_waypoints(&self) -> &VecDeque<Vec3> {
        &self.waypoints
    }

    /// The walkable volume.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

impl NavigationProvider for WaypointAgent {
    fn update_position(&mut self, position: Vec3) {
        self.position = self.bounds.clamp(position);
    }

    fn agent_position(&self) -> Vec3 {
        self.position
    }

    fn advance(&mut self, lookahead: Duration, speed: f32) -> Option<Segment> {
        while self.waypoints.front() == Some(&self.position) {
            self.waypoints.pop_front();
        }
        let next = *self.waypoints.front()?;

        let travel = speed.max(0.0) * lookahead.as_secs_f32();
        let offset = next - self.position;
        let remaining_squared = offset.length_squared();

        let end = if remaining_squared <= travel * travel {
            self.waypoints.pop_front();
            next
        } else {
            self.position + offset * (travel / remaining_squared.sqrt())
        };

        let segment = Segment::new(self.position, end);
        self.position = end;
        Some(segment)
    }

    fn fly_advance(&mut self, from: Vec3, to: Vec3, speed: f32, delta: f32) -> (Vec3, bool) {
        let to = self.bounds.clamp(to);
        let step = speed.max(0.0) * delta;
        let offset = to - from;

        if offset.length_squared() <= step * step {
            self.position = to;
            return (to, true);
        }

        let next = self.bounds.clamp(from + offset.normalize() * step);
        self.position = next;
        (next, false)
    }

    fn path_to(&mut self, target: Vec3) -> bool {
        if !target.is_finite() || !self.bounds.contains(target) {
            trace!(?target, "path target not walkable");
            return false;
        }
        self.waypoints.clear();
        self.waypoints.push_back(target);
        true
    }

    fn path_away_from(&mut self, from: Vec3, distance: f32) -> bool {
        let away = (self.position - from).try_normalize().unwrap_or(Vec3::X);
        let goal = self.bounds.clamp(self.position + away * distance);

        if goal.distance_squared(from) < distance * distance {
            trace!(?from, distance, "no room to retreat");
            return false;
        }
        self.waypoints.clear();
        self.waypoints.push_back(goal);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(150);

    #[test]
    fn advance_without_path_is_none() {
        let mut agent = WaypointAgent::new(Vec3::ZERO);
        assert!(agent.advance(TICK, 1.0).is_none());
    }

    #[test]
    fn advance_moves_agent_to_segment_end() {
        let mut agent = WaypointAgent::new(Vec3::ZERO);
        agent.path_to(Vec3::new(10.0, 0.0, 0.0));

        let segment = agent.advance(Duration::from_secs(1), 2.0).unwrap();
        assert_eq!(segment.start, Vec3::ZERO);
        assert!((segment.end - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(agent.agent_position(), segment.end);
    }

    #[test]
    fn advance_stops_at_corners() {
        let mut agent = WaypointAgent::new(Vec3::ZERO);
        assert!(agent.set_path([Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 5.0, 0.0)]));

        let first = agent.advance(Duration::from_secs(1), 3.0).unwrap();
        assert_eq!(first.end, Vec3::new(1.0, 0.0, 0.0));

        let second = agent.advance(Duration::from_secs(1), 3.0).unwrap();
        assert_eq!(second.start, Vec3::new(1.0, 0.0, 0.0));
        assert!((second.end - Vec3::new(1.0, 3.0, 0.0)).length() < 1e-5);
        assert_eq!(agent.remaining_waypoints().len(), 1);
    }

    #[test]
    fn zero_speed_yields_degenerate_segment() {
        let mut agent = WaypointAgent::new(Vec3::ZERO);
        agent.path_to(Vec3::new(10.0, 0.0, 0.0));
        let segment = agent.advance(TICK, 0.0).unwrap();
        assert!(segment.is_degenerate());
    }

    #[test]
    fn path_to_rejects_targets_outside_bounds() {
        let mut agent = WaypointAgent::new(Vec3::ZERO).with_bounds(Bounds::new(10.0, 10.0, 10.0));
        assert!(!agent.path_to(Vec3::new(6.0, 0.0, 0.0)));
        assert!(!agent.path_to(Vec3::new(f32::NAN, 0.0, 0.0)));
        assert!(agent.path_to(Vec3::new(4.0, 0.0, 0.0)));
    }

    #[test]
    fn set_path_rejects_outside_waypoints_and_keeps_old_path() {
        let mut agent = WaypointAgent::new(Vec3::ZERO).with_bounds(Bounds::new(10.0, 10.0, 10.0));
        agent.path_to(Vec3::new(1.0, 0.0, 0.0));
        assert!(!agent.set_path([Vec3::new(2.0, 0.0, 0.0), Vec3::new(9.0, 0.0, 0.0)]));
        assert_eq!(agent.remaining_waypoints().len(), 1);
    }

    #[test]
    fn path_away_from_heads_away() {
        let mut agent = WaypointAgent::new(Vec3::new(1.0, 0.0, 0.0));
        assert!(agent.path_away_from(Vec3::ZERO, 5.0));
        let goal = agent.remaining_waypoints()[0];
        assert!(goal.x > 5.0);
        assert!(goal.distance(Vec3::ZERO) >= 5.0);
    }

    #[test]
    fn path_away_from_fails_when_cornered() {
        let mut agent = WaypointAgent::new(Vec3::new(4.0, 0.0, 0.0))
            .with_bounds(Bounds::new(10.0, 10.0, 10.0));
        assert!(!agent.path_away_from(Vec3::new(3.0, 0.0, 0.0), 8.0));
    }

    #[test]
    fn update_position_clamps() {
        let mut agent = WaypointAgent::new(Vec3::ZERO).with_bounds(Bounds::new(10.0, 10.0, 10.0));
        agent.update_position(Vec3::new(100.0, 0.0, 0.0));
        assert_eq!(agent.agent_position(), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn fly_advance_reaches_target() {
        let mut agent = WaypointAgent::new(Vec3::ZERO);
        let target = Vec3::new(0.0, 3.0, 4.0);

        let (pos, reached) = agent.fly_advance(Vec3::ZERO, target, 10.0, 0.1);
        assert!(!reached);
        assert!((pos.length() - 1.0).abs() < 1e-5);

        let (pos, reached) = agent.fly_advance(pos, target, 100.0, 0.1);
        assert!(reached);
        assert_eq!(pos, target);
        assert_eq!(agent.agent_position(), target);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn segments_never_exceed_lookahead_travel(
                x in -50.0f32..50.0,
                y in -50.0f32..50.0,
                speed in 0.1f32..20.0,
            ) {
                let mut agent = WaypointAgent::new(Vec3::ZERO);
                agent.path_to(Vec3::new(x, y, 0.0));
                let travel = speed * TICK.as_secs_f32();
                while let Some(segment) = agent.advance(TICK, speed) {
                    prop_assert!(segment.length() <= travel + 1e-3);
                    if segment.is_degenerate() {
                        break;
                    }
                }
            }
        }
    }
}
