//! # Stride
//!
//! Per-actor movement state machine for an authoritative game server.
//!
//! Behavior code issues high-level movement commands (walk to a point,
//! approach or retreat from a target, strafe along a direction, fly). Once
//! per simulation tick the movement core turns the active command into
//! position, velocity and facing updates, consumes path segments from the
//! actor's navigation agent, keeps the right animation sequence playing and
//! signals the command's [`TaskHandle`](task::TaskHandle) exactly once when
//! the command completes or is canceled.
//!
//! ## Modules
//!
//! - [`actor`]: actor identity, body and collaborators
//! - [`movement`]: walk commands, sessions and the per-tick update
//! - [`task`]: exactly-once completion tokens
//! - [`animation`], [`stats`]: contracts for the animation and stat systems
//! - [`field`]: fixed-step scheduler running many actors in parallel
//! - [`config`], [`error`]: tunables and error types
//!
//! Navigation lives in the [`waypath`] crate.
//!
//! ## Usage
//!
//! ```
//! use std::time::Duration;
//! use glam::Vec3;
//! use stride::{Actor, ActorId, BasicStats, SequenceLibrary, TaskHandle, WalkCommand};
//! use waypath::WaypointAgent;
//!
//! let mut actor = Actor::new(
//!     ActorId::new(7),
//!     Vec3::ZERO,
//!     Some(WaypointAgent::new(Vec3::ZERO)),
//!     SequenceLibrary::locomotion(),
//!     BasicStats::default(),
//! );
//!
//! let task = TaskHandle::new();
//! actor
//!     .walk(WalkCommand::toward(Vec3::new(5.0, 0.0, 0.0), 1.0), task.clone())
//!     .unwrap();
//! assert!(actor.is_moving_to_target());
//!
//! for _ in 0..100 {
//!     actor.tick(Duration::from_millis(100));
//! }
//! assert!(!task.is_pending());
//! assert!(actor.body().position.x > 4.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub use waypath;

pub mod actor;
pub mod animation;
pub mod config;
pub mod error;
pub mod field;
pub mod movement;
pub mod stats;
pub mod task;

#[cfg(test)]
mod tests;

pub use actor::{Actor, ActorId, ActorMetadata, ActorState, Body, DynActor};
pub use animation::{AnimationCategory, AnimationController, AnimationSequence, SequenceLibrary};
pub use config::MovementConfig;
pub use error::{ConfigError, MovementError};
pub use field::Field;
pub use movement::{Locomotion, MovementMode, MovementState, WalkCommand, WalkFlags, WalkSession};
pub use stats::{BasicStats, StatsProvider};
pub use task::{TaskHandle, TaskSlot, TaskStatus};
