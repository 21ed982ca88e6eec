//! Walk sessions and the commands that start them.

use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use waypath::Segment;

use crate::animation::AnimationSequence;
use crate::error::MovementError;
use crate::task::TaskSlot;

bitflags! {
    /// Options carried by a walk command into its session.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct WalkFlags: u8 {
        /// Turn to face the target when the walk ends
        const LOOK_ON_ARRIVAL = 1 << 0;
        /// Fly straight to the target instead of following the ground path
        const FLYING          = 1 << 1;
    }
}

/// What the current walk is trying to achieve.
///
/// Exactly one mode is active per actor. `None` produces no motion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum MovementMode {
    /// No walk
    #[default]
    None,
    /// Move along a unit direction until superseded
    Direction(Vec3),
    /// Walk until standing on `target`
    MoveTo {
        /// Destination
        target: Vec3,
    },
    /// Approach until closer than `distance` to `target`
    ToTarget {
        /// Position being approached
        target: Vec3,
        /// Standoff range
        distance: f32,
    },
    /// Retreat until at least `distance` from `target`
    FromTarget {
        /// Position being fled
        target: Vec3,
        /// Safe range
        distance: f32,
    },
}

impl MovementMode {
    /// Target position of a targeted mode.
    #[must_use]
    pub fn target(&self) -> Option<Vec3> {
        match *self {
            Self::MoveTo { target }
            | Self::ToTarget { target, .. }
            | Self::FromTarget { target, .. } => Some(target),
            Self::None | Self::Direction(_) => None,
        }
    }

    /// Returns `true` for `MoveTo`, `ToTarget` and `FromTarget`.
    #[must_use]
    pub fn is_targeted(&self) -> bool {
        self.target().is_some()
    }

    fn set_target(&mut self, position: Vec3) {
        match self {
            Self::MoveTo { target }
            | Self::ToTarget { target, .. }
            | Self::FromTarget { target, .. } => *target = position,
            Self::None | Self::Direction(_) => {}
        }
    }
}

/// Per-tick algorithm a session runs, chosen once when the session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locomotion {
    /// Free-direction movement with navigation clamping only
    #[default]
    Steer,
    /// Consume navigation segments toward the target
    PathFollow,
    /// Straight flight via the navigation flight query
    Flight,
}

impl Locomotion {
    /// Pick the algorithm for a mode. Flight needs a playing sequence; without
    /// one the session falls back to the ground path.
    #[must_use]
    pub fn select(mode: &MovementMode, flags: WalkFlags, has_sequence: bool) -> Self {
        match mode {
            MovementMode::None | MovementMode::Direction(_) => Self::Steer,
            MovementMode::MoveTo { .. }
            | MovementMode::ToTarget { .. }
            | MovementMode::FromTarget { .. } => {
                if flags.contains(WalkFlags::FLYING) && has_sequence {
                    Self::Flight
                } else {
                    Self::PathFollow
                }
            }
        }
    }
}

/// A movement request, validated and turned into a session by
/// [`Actor::walk`](crate::actor::Actor::walk).
///
/// # Example
///
/// ```
/// use glam::Vec3;
/// use stride::movement::{MovementMode, WalkCommand, WalkFlags};
///
/// let command = WalkCommand::toward(Vec3::new(5.0, 0.0, 0.0), 2.0)
///     .with_sequence("Walk_A")
///     .look_on_arrival(true);
///
/// assert_eq!(command.sequence(), "Walk_A");
/// assert!(command.flags().contains(WalkFlags::LOOK_ON_ARRIVAL));
/// assert!(matches!(command.mode(), MovementMode::ToTarget { .. }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WalkCommand {
    mode: MovementMode,
    sequence: String,
    speed: f32,
    flags: WalkFlags,
}

impl WalkCommand {
    fn new(mode: MovementMode, flags: WalkFlags) -> Self {
        Self {
            mode,
            sequence: String::new(),
            speed: 0.0,
            flags,
        }
    }

    /// Move along `direction` until superseded.
    #[must_use]
    pub fn direction(direction: Vec3) -> Self {
        Self::new(MovementMode::Direction(direction), WalkFlags::empty())
    }

    /// Walk to `target`.
    #[must_use]
    pub fn to(target: Vec3) -> Self {
        Self::new(MovementMode::MoveTo { target }, WalkFlags::empty())
    }

    /// Approach `target` until closer than `distance`.
    #[must_use]
    pub fn toward(target: Vec3, distance: f32) -> Self {
        Self::new(MovementMode::ToTarget { target, distance }, WalkFlags::empty())
    }

    /// Retreat from `target` until at least `distance` away.
    #[must_use]
    pub fn away_from(target: Vec3, distance: f32) -> Self {
        Self::new(MovementMode::FromTarget { target, distance }, WalkFlags::empty())
    }

    /// Fly to `target`.
    #[must_use]
    pub fn fly_to(target: Vec3) -> Self {
        Self::new(MovementMode::MoveTo { target }, WalkFlags::FLYING)
    }

    /// Animation sequence to play; empty selects the configured default.
    #[must_use]
    pub fn with_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = sequence.into();
        self
    }

    /// Speed override; `0` uses the actor's movement-speed stat.
    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Whether to face the target when the walk ends.
    #[must_use]
    pub fn look_on_arrival(mut self, look: bool) -> Self {
        self.flags.set(WalkFlags::LOOK_ON_ARRIVAL, look);
        self
    }

    /// Requested mode.
    #[must_use]
    pub fn mode(&self) -> &MovementMode {
        &self.mode
    }

    /// Requested sequence name (possibly empty).
    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Speed override.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Command flags.
    #[must_use]
    pub fn flags(&self) -> WalkFlags {
        self.flags
    }

    /// Checks ranges and normalizes the direction of a `Direction` command.
    pub(crate) fn validated(mut self) -> Result<Self, MovementError> {
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(MovementError::InvalidCommand(
                "speed override must be finite and non-negative",
            ));
        }
        match &mut self.mode {
            MovementMode::None => {
                return Err(MovementError::InvalidCommand("walk command has no mode"));
            }
            MovementMode::Direction(direction) => {
                *direction = direction
                    .try_normalize()
                    .ok_or(MovementError::InvalidCommand(
                        "direction must be finite and non-zero",
                    ))?;
            }
            MovementMode::MoveTo { target } => {
                if !target.is_finite() {
                    return Err(MovementError::InvalidCommand("target must be finite"));
                }
            }
            MovementMode::ToTarget { target, distance }
            | MovementMode::FromTarget { target, distance } => {
                if !target.is_finite() {
                    return Err(MovementError::InvalidCommand("target must be finite"));
                }
                if !(distance.is_finite() && *distance >= 0.0) {
                    return Err(MovementError::InvalidCommand(
                        "distance must be finite and non-negative",
                    ));
                }
            }
        }
        Ok(self)
    }

    pub(crate) fn into_parts(self) -> (MovementMode, String, f32, WalkFlags) {
        (self.mode, self.sequence, self.speed, self.flags)
    }
}

/// The state of one in-progress walk.
///
/// Replaced wholesale whenever a walk starts or the actor goes idle; the
/// tick only mutates the segment, heading and speed.
#[derive(Debug, Default)]
pub struct WalkSession {
    pub(crate) mode: MovementMode,
    pub(crate) locomotion: Locomotion,
    pub(crate) flags: WalkFlags,
    pub(crate) heading: Vec3,
    pub(crate) segment: Option<Segment>,
    pub(crate) sequence: Option<AnimationSequence>,
    pub(crate) speed_override: f32,
    pub(crate) gait: f32,
    pub(crate) speed: f32,
    pub(crate) task: TaskSlot,
}

impl WalkSession {
    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> &MovementMode {
        &self.mode
    }

    /// Algorithm selected for this session.
    #[must_use]
    pub fn locomotion(&self) -> Locomotion {
        self.locomotion
    }

    /// Session flags.
    #[must_use]
    pub fn flags(&self) -> WalkFlags {
        self.flags
    }

    /// Unit direction of travel (the commanded direction in `Direction`
    /// mode, otherwise the direction of the current segment).
    #[must_use]
    pub fn heading(&self) -> Vec3 {
        self.heading
    }

    /// Segment being consumed, if a navigation query has succeeded.
    #[must_use]
    pub fn segment(&self) -> Option<&Segment> {
        self.segment.as_ref()
    }

    /// Sequence requested for this session.
    #[must_use]
    pub fn sequence(&self) -> Option<&AnimationSequence> {
        self.sequence.as_ref()
    }

    /// Speed recomputed on the last tick.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Returns `true` while the session's task has not been signaled.
    #[must_use]
    pub fn has_task(&self) -> bool {
        self.task.is_armed()
    }

    pub(crate) fn look_on_arrival(&self) -> bool {
        self.flags.contains(WalkFlags::LOOK_ON_ARRIVAL)
    }

    pub(crate) fn retarget(&mut self, target: Vec3) {
        self.mode.set_target(target);
    }
}
