//! Per-actor state the movement core reads and writes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Kinematic state of an actor.
///
/// Owned by the actor; only the movement core mutates it while a walk is
/// active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// World position
    pub position: Vec3,
    /// Velocity in units per second
    pub velocity: Vec3,
    /// Unit facing vector
    pub facing: Vec3,
}

impl Body {
    /// Body at rest at `position`, facing +X.
    #[must_use]
    pub fn at_position(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            facing: Vec3::X,
        }
    }

    /// Turn to face `direction`.
    ///
    /// Zero and non-finite directions are ignored so the facing stays a unit
    /// vector.
    pub fn look_to(&mut self, direction: Vec3) {
        if let Some(facing) = direction.try_normalize() {
            self.facing = facing;
        }
    }

    /// Current speed (velocity magnitude).
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::at_position(Vec3::ZERO)
    }
}

/// Static movement properties of an actor's model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorMetadata {
    /// Gait multiplier for walking-paced sequences
    pub walk_speed: f32,
    /// Gait multiplier for running-paced sequences
    pub run_speed: f32,
    /// Playback rate per unit of speed
    pub animation_speed: f32,
}

impl Default for ActorMetadata {
    fn default() -> Self {
        Self {
            walk_speed: 1.0,
            run_speed: 1.0,
            animation_speed: 1.0,
        }
    }
}
