//! # Waypath
//!
//! Navigation contract for tick-driven actor movement, plus a reference
//! agent that streams a known polyline.
//!
//! Movement code never sees a whole path. It asks its navigation provider
//! for one short straight [`Segment`] at a time, sized by a lookahead window
//! and the actor's current speed, and consumes it over the following ticks.
//! This keeps the per-tick query cheap and lets the provider re-plan between
//! segments without the mover noticing.
//!
//! ## Quick Start
//!
//! ```
//! use std::time::Duration;
//! use glam::Vec3;
//! use waypath::{NavigationProvider, WaypointAgent};
//!
//! let mut agent = WaypointAgent::new(Vec3::ZERO);
//! assert!(agent.path_to(Vec3::new(10.0, 0.0, 0.0)));
//!
//! // 0.5 s of travel at 2 units/s
//! let segment = agent.advance(Duration::from_millis(500), 2.0).unwrap();
//! assert_eq!(segment.start, Vec3::ZERO);
//! assert!((segment.end.x - 1.0).abs() < 1e-5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod agent;

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use agent::WaypointAgent;

/// A straight path fragment handed out by [`NavigationProvider::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Where the fragment begins (the agent position at query time)
    pub start: Vec3,
    /// Where the fragment ends
    pub end: Vec3,
}

impl Segment {
    /// Create a segment from its endpoints.
    #[must_use]
    pub const fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// Squared length of the segment.
    #[must_use]
    pub fn length_squared(&self) -> f32 {
        (self.end - self.start).length_squared()
    }

    /// Length of the segment.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns `true` if both endpoints coincide.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.length_squared() == 0.0
    }
}

/// Per-actor navigation agent queried by the movement core.
///
/// Implementations own the agent's notion of where the actor is and where
/// it is heading. Every call is synchronous and must not block; the mover
/// calls these from inside its tick.
///
/// # Contract
///
/// - [`advance`](Self::advance) returns `None` once no further path is
///   available. A zero-length segment means the same thing to the mover.
/// - [`update_position`](Self::update_position) may clamp or correct the
///   submitted position; [`agent_position`](Self::agent_position) reports
///   the corrected result.
/// - [`fly_advance`](Self::fly_advance) reports the new position after one
///   tick of flight and whether the destination was reached.
pub trait NavigationProvider: Send {
    /// Submit a candidate position for correction.
    fn update_position(&mut self, position: Vec3);

    /// Current (corrected) agent position.
    fn agent_position(&self) -> Vec3;

    /// Request the next straight segment covering roughly
    /// `lookahead × speed` of travel.
    fn advance(&mut self, lookahead: Duration, speed: f32) -> Option<Segment>;

    /// Advance one tick of flight from `from` toward `to`.
    fn fly_advance(&mut self, from: Vec3, to: Vec3, speed: f32, delta: f32) -> (Vec3, bool);

    /// Plan a path toward `target`. Returns `false` if it cannot be reached.
    fn path_to(&mut self, target: Vec3) -> bool;

    /// Plan a path that ends at least `distance` away from `from`.
    /// Returns `false` if no such path exists.
    fn path_away_from(&mut self, from: Vec3, distance: f32) -> bool;
}

impl<T: NavigationProvider + ?Sized> NavigationProvider for Box<T> {
    fn update_position(&mut self, position: Vec3) {
        (**self).update_position(position);
    }

    fn agent_position(&self) -> Vec3 {
        (**self).agent_position()
    }

    fn advance(&mut self, lookahead: Duration, speed: f32) -> Option<Segment> {
        (**self).advance(lookahead, speed)
    }

    fn fly_advance(&mut self, from: Vec3, to: Vec3, speed: f32, delta: f32) -> (Vec3, bool) {
        (**self).fly_advance(from, to, speed, delta)
    }

    fn path_to(&mut self, target: Vec3) -> bool {
        (**self).path_to(target)
    }

    fn path_away_from(&mut self, from: Vec3, distance: f32) -> bool {
        (**self).path_away_from(from, distance)
    }
}

/// Axis-aligned walkable volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Bounds {
    /// Create bounds from dimensions (centered at origin).
    #[must_use]
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            min: Vec3::new(-width / 2.0, -height / 2.0, -depth / 2.0),
            max: Vec3::new(width / 2.0, height / 2.0, depth / 2.0),
        }
    }

    /// Create bounds from min/max corners.
    #[must_use]
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Unbounded volume; nothing is ever clamped.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            min: Vec3::splat(f32::NEG_INFINITY),
            max: Vec3::splat(f32::INFINITY),
        }
    }

    /// Check if a point is inside the bounds.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Clamp a point into the bounds.
    #[must_use]
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unbounded()
    }
}
