//! The per-actor movement state machine.
//!
//! A walk starts from a [`WalkCommand`] and becomes a [`WalkSession`]. Each
//! tick the session's [`Locomotion`] strategy moves the actor's body and
//! reports whether the walk is still running, has arrived, or has run out of
//! path. Terminal outcomes signal the session's task exactly once and return
//! the actor to idle.
//!
//! ```
//! use std::time::Duration;
//! use glam::Vec3;
//! use stride::actor::{Actor, ActorId, ActorState};
//! use stride::animation::SequenceLibrary;
//! use stride::movement::WalkCommand;
//! use stride::stats::BasicStats;
//! use stride::task::{TaskHandle, TaskStatus};
//! use waypath::WaypointAgent;
//!
//! let mut actor = Actor::new(
//!     ActorId::new(1),
//!     Vec3::ZERO,
//!     Some(WaypointAgent::new(Vec3::ZERO)),
//!     SequenceLibrary::locomotion(),
//!     BasicStats::new(200),
//! );
//!
//! let task = TaskHandle::new();
//! actor.walk(WalkCommand::to(Vec3::new(1.0, 0.0, 0.0)), task.clone()).unwrap();
//! assert_eq!(actor.state(), ActorState::Walk);
//!
//! while task.is_pending() {
//!     actor.tick(Duration::from_millis(100));
//! }
//! assert_eq!(task.status(), TaskStatus::Completed);
//! assert_eq!(actor.state(), ActorState::Idle);
//! ```

mod flight;
mod path;
pub mod session;
mod steer;

use std::time::Duration;

use glam::Vec3;
use tracing::{debug, trace, warn};
use waypath::NavigationProvider;

use crate::actor::{Actor, ActorState};
use crate::animation::{AnimationCategory, AnimationController, AnimationSequence, END_KEYFRAME};
use crate::error::MovementError;
use crate::stats::StatsProvider;
use crate::task::{TaskHandle, TaskSlot};

pub use session::{Locomotion, MovementMode, WalkCommand, WalkFlags, WalkSession};

/// Outcome of one locomotion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Progress {
    /// Still under way
    Moving,
    /// Arrival condition met
    Arrived,
    /// Navigation has no further segment
    Exhausted,
}

/// Movement bookkeeping owned by each actor.
#[derive(Debug, Default)]
pub struct MovementState {
    pub(crate) state: ActorState,
    pub(crate) session: WalkSession,
    pub(crate) state_sequence: Option<AnimationSequence>,
    pub(crate) emote_task: TaskSlot,
    pub(crate) parked_walk_task: TaskSlot,
}

impl MovementState {
    /// Coarse actor state.
    #[must_use]
    pub fn state(&self) -> ActorState {
        self.state
    }

    /// The active (or empty) walk session.
    #[must_use]
    pub fn session(&self) -> &WalkSession {
        &self.session
    }

    /// Mode of the active session.
    #[must_use]
    pub fn mode(&self) -> &MovementMode {
        &self.session.mode
    }

    /// Speed of the active session, as of the last tick.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.session.speed
    }

    /// Sequence that loops while the current state lasts.
    #[must_use]
    pub fn state_sequence(&self) -> Option<&AnimationSequence> {
        self.state_sequence.as_ref()
    }

    /// Returns `true` while walking in a targeted mode.
    #[must_use]
    pub fn is_moving_to_target(&self) -> bool {
        self.state == ActorState::Walk && self.session.mode.is_targeted()
    }

    /// Returns `true` if a walk task interrupted by an emote still awaits
    /// cancellation.
    #[must_use]
    pub fn has_parked_task(&self) -> bool {
        self.parked_walk_task.is_armed()
    }
}

/// Movement speed from the stat attribute or an explicit override.
#[allow(clippy::cast_precision_loss)]
fn movement_speed(stat: i64, speed_override: f32, gait: f32, divisor: f32) -> f32 {
    let base = if speed_override > 0.0 {
        speed_override
    } else {
        stat as f32 / divisor
    };
    (base * gait).max(0.0)
}

impl<N, A, S> Actor<N, A, S>
where
    N: NavigationProvider,
    A: AnimationController,
    S: StatsProvider,
{
    /// Start a walk.
    ///
    /// Any previous session is replaced and its task canceled, as are a
    /// pending emote task and a parked walk task.
    ///
    /// # Errors
    ///
    /// Returns an error if the command is malformed, the actor has no
    /// navigation agent, no path can be planned, or the sequence cannot
    /// play. `task` has been canceled in every error case.
    pub fn walk(&mut self, command: WalkCommand, task: TaskHandle) -> Result<(), MovementError> {
        let mut task = TaskSlot::from(task);

        let command = match command.validated() {
            Ok(command) => command,
            Err(err) => {
                warn!(actor = %self.id, %err, "walk command refused");
                task.cancel();
                return Err(err);
            }
        };

        let Some(navigation) = self.navigation.as_mut() else {
            warn!(actor = %self.id, "walk without navigation agent");
            task.cancel();
            return Err(MovementError::NavigationUnavailable(self.id));
        };

        if !command.flags().contains(WalkFlags::FLYING) {
            let planned = match *command.mode() {
                MovementMode::MoveTo { target } | MovementMode::ToTarget { target, .. } => {
                    Some((target, navigation.path_to(target)))
                }
                MovementMode::FromTarget { target, distance } => {
                    Some((target, navigation.path_away_from(target, distance)))
                }
                MovementMode::None | MovementMode::Direction(_) => None,
            };
            if let Some((target, false)) = planned {
                warn!(actor = %self.id, ?target, "no path for walk");
                task.cancel();
                return Err(MovementError::NoPath {
                    actor: self.id,
                    target,
                });
            }
        }

        let (mode, sequence, speed_override, flags) = command.into_parts();
        self.start_walking(mode, sequence, speed_override, flags, task)
    }

    fn start_walking(
        &mut self,
        mode: MovementMode,
        sequence: String,
        speed_override: f32,
        flags: WalkFlags,
        mut task: TaskSlot,
    ) -> Result<(), MovementError> {
        let sequence = if sequence.is_empty() {
            self.config.default_sequence.clone()
        } else {
            sequence
        };
        let gait = if self.config.is_walking_sequence(&sequence) {
            self.metadata.walk_speed
        } else {
            self.metadata.run_speed
        };

        self.movement.emote_task.cancel();
        self.movement.parked_walk_task.cancel();
        std::mem::take(&mut self.movement.session).task.cancel();

        let speed = movement_speed(
            self.stats.movement_speed(),
            speed_override,
            gait,
            self.config.speed_divisor,
        );

        let already_playing = self
            .animation
            .playing_sequence()
            .is_some_and(|playing| playing.name == sequence);
        if !already_playing
            && !self.animation.try_play_sequence(
                &sequence,
                self.metadata.animation_speed * speed,
                AnimationCategory::Misc,
            )
        {
            warn!(actor = %self.id, %sequence, "walk sequence unavailable");
            task.cancel();
            self.idle();
            return Err(MovementError::SequenceUnavailable { sequence });
        }

        let playing = self.animation.playing_sequence().cloned();
        let locomotion = Locomotion::select(&mode, flags, playing.is_some());
        let heading = match mode {
            MovementMode::Direction(direction) => direction,
            _ => Vec3::ZERO,
        };

        self.movement.session = WalkSession {
            mode,
            locomotion,
            flags,
            heading,
            segment: None,
            sequence: playing.clone(),
            speed_override,
            gait,
            speed,
            task,
        };
        self.movement.state_sequence = playing;
        self.movement.state = ActorState::Walk;

        debug!(actor = %self.id, ?mode, ?locomotion, speed, %sequence, "walk started");
        Ok(())
    }

    /// Stop moving.
    ///
    /// Replaces the session with the empty one, cancels every outstanding
    /// task and plays the idle sequence if it is not already playing.
    pub fn idle(&mut self) {
        std::mem::take(&mut self.movement.session).task.cancel();
        self.movement.parked_walk_task.cancel();
        self.movement.emote_task.cancel();
        self.movement.state = ActorState::Idle;
        self.movement.state_sequence = None;
        self.body.velocity = Vec3::ZERO;

        let idle_sequence = &self.config.idle_sequence;
        let already_playing = self
            .animation
            .playing_sequence()
            .is_some_and(|playing| &playing.name == idle_sequence);
        if !already_playing
            && !self.animation.try_play_sequence(
                idle_sequence,
                self.metadata.animation_speed,
                AnimationCategory::Misc,
            )
        {
            trace!(actor = %self.id, sequence = %idle_sequence, "idle sequence unavailable");
        }
    }

    /// Advance the active walk by `delta`.
    ///
    /// Does nothing unless the actor is walking, has a navigation agent and
    /// `delta` is non-zero.
    pub fn tick(&mut self, delta: Duration) {
        if self.movement.state != ActorState::Walk {
            return;
        }
        let delta = delta.as_secs_f32();
        if delta <= 0.0 || self.movement.session.mode == MovementMode::None {
            return;
        }
        let Some(navigation) = self.navigation.as_mut() else {
            trace!(actor = %self.id, "tick skipped without navigation agent");
            return;
        };

        let session = &mut self.movement.session;
        session.speed = movement_speed(
            self.stats.movement_speed(),
            session.speed_override,
            session.gait,
            self.config.speed_divisor,
        );

        let progress = match session.locomotion {
            Locomotion::Steer => steer::advance(&mut self.body, navigation, session, delta),
            Locomotion::PathFollow => {
                path::advance(&mut self.body, navigation, session, delta, &self.config)
            }
            Locomotion::Flight => flight::advance(&mut self.body, navigation, session, delta),
        };

        trace!(
            actor = %self.id,
            position = ?self.body.position,
            velocity = ?self.body.velocity,
            "movement tick"
        );

        match progress {
            Progress::Moving => {}
            Progress::Arrived => {
                debug!(actor = %self.id, position = ?self.body.position, "walk arrived");
                self.movement.session.task.complete();
                self.idle();
            }
            Progress::Exhausted => {
                debug!(actor = %self.id, position = ?self.body.position, "path exhausted");
                self.movement.session.task.cancel();
                self.idle();
            }
        }
    }

    /// React to a keyframe event raised by the animation controller.
    ///
    /// Only `"end"` is handled: a walk loops its sequence, an emote finishes
    /// and returns the actor to idle, and in every state a parked walk task
    /// is canceled.
    pub fn handle_event(&mut self, name: &str) {
        if name != END_KEYFRAME {
            return;
        }

        match self.movement.state {
            ActorState::Walk => {
                let Some(sequence) = self.movement.state_sequence.as_ref() else {
                    return;
                };
                let rate = self.metadata.animation_speed * self.movement.session.speed;
                if !self
                    .animation
                    .try_play_sequence(&sequence.name, rate, AnimationCategory::Misc)
                {
                    warn!(
                        actor = %self.id,
                        sequence = %sequence.name,
                        "walk sequence did not loop"
                    );
                }
            }
            ActorState::Emote => {
                self.movement.parked_walk_task.cancel();
                self.movement.emote_task.complete();
                debug!(actor = %self.id, "emote finished");
                self.idle();
            }
            ActorState::Idle => {
                self.movement.parked_walk_task.cancel();
            }
        }
    }

    /// Play a one-shot action.
    ///
    /// A running walk is stopped and its task parked until the next `"end"`
    /// keyframe, [`idle`](Self::idle) or walk. `task` completes when the
    /// action's sequence ends.
    ///
    /// # Errors
    ///
    /// Returns [`MovementError::SequenceUnavailable`] and cancels `task` if
    /// the sequence cannot play; the current walk is left untouched.
    pub fn emote(&mut self, sequence: &str, task: TaskHandle) -> Result<(), MovementError> {
        let mut task = TaskSlot::from(task);

        if !self.animation.try_play_sequence(
            sequence,
            self.metadata.animation_speed,
            AnimationCategory::Emotion,
        ) {
            warn!(actor = %self.id, %sequence, "emote sequence unavailable");
            task.cancel();
            return Err(MovementError::SequenceUnavailable {
                sequence: sequence.to_string(),
            });
        }

        let interrupted = std::mem::take(&mut self.movement.session);
        self.movement.parked_walk_task.cancel();
        self.movement.parked_walk_task = interrupted.task;
        self.movement.emote_task.cancel();
        self.movement.emote_task = task;
        self.movement.state = ActorState::Emote;
        self.movement.state_sequence = self.animation.playing_sequence().cloned();
        self.body.velocity = Vec3::ZERO;

        debug!(actor = %self.id, %sequence, "emote started");
        Ok(())
    }

    /// Move the target of the active walk and re-plan its path.
    ///
    /// # Errors
    ///
    /// - [`MovementError::InvalidCommand`] for a non-finite target
    /// - [`MovementError::NotWalking`] without a targeted walk
    /// - [`MovementError::NavigationUnavailable`] without a navigation agent
    /// - [`MovementError::NoPath`] if re-planning fails; the walk is then
    ///   canceled and the actor goes idle
    ///
    /// Only the last case touches the session.
    pub fn retarget(&mut self, target: Vec3) -> Result<(), MovementError> {
        if !target.is_finite() {
            return Err(MovementError::InvalidCommand("target must be finite"));
        }
        if !self.movement.is_moving_to_target() {
            return Err(MovementError::NotWalking(self.id));
        }
        let Some(navigation) = self.navigation.as_mut() else {
            return Err(MovementError::NavigationUnavailable(self.id));
        };

        let session = &mut self.movement.session;
        session.retarget(target);
        let planned = match (session.locomotion, session.mode) {
            (Locomotion::Flight, _) => true,
            (_, MovementMode::FromTarget { target, distance }) => {
                navigation.path_away_from(target, distance)
            }
            _ => navigation.path_to(target),
        };

        if !planned {
            warn!(actor = %self.id, ?target, "no path after retarget");
            self.idle();
            return Err(MovementError::NoPath {
                actor: self.id,
                target,
            });
        }
        trace!(actor = %self.id, ?target, "walk retargeted");
        Ok(())
    }

    /// Returns `true` while walking toward, to or away from a target.
    #[must_use]
    pub fn is_moving_to_target(&self) -> bool {
        self.movement.is_moving_to_target()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_from_stat() {
        assert!((movement_speed(200, 0.0, 1.0, 100.0) - 2.0).abs() < 1e-6);
        assert!((movement_speed(150, 0.0, 0.5, 100.0) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn override_replaces_stat() {
        assert!((movement_speed(200, 3.0, 2.0, 100.0) - 6.0).abs() < 1e-6);
    }

    #[test]
    fn speed_never_negative() {
        assert!(movement_speed(-500, 0.0, 1.0, 100.0).abs() < f32::EPSILON);
        assert!(movement_speed(100, 0.0, -1.0, 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn default_state_is_idle() {
        let state = MovementState::default();
        assert_eq!(state.state(), ActorState::Idle);
        assert_eq!(*state.mode(), MovementMode::None);
        assert!(!state.is_moving_to_target());
        assert!(!state.has_parked_task());
    }
}
