//! Actors driven by the movement core.
//!
//! - [`ActorId`]: unique identifier within a [`Field`](crate::field::Field)
//! - [`ActorState`]: coarse state the movement core reports to other systems
//! - [`Actor`]: body, metadata, external collaborators and movement state
//!
//! The movement commands themselves (`walk`, `idle`, `tick`, ...) are
//! implemented in [`crate::movement`].
//!
//! # Collaborators
//!
//! An actor is generic over its navigation agent, animation controller and
//! stat source so tests and embedders can plug concrete types in directly.
//! [`DynActor`] erases all three for heterogeneous fields.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use stride::actor::{Actor, ActorId, ActorState};
//! use stride::animation::SequenceLibrary;
//! use stride::stats::BasicStats;
//! use waypath::WaypointAgent;
//!
//! let actor = Actor::new(
//!     ActorId::new(1),
//!     Vec3::ZERO,
//!     Some(WaypointAgent::new(Vec3::ZERO)),
//!     SequenceLibrary::locomotion(),
//!     BasicStats::default(),
//! );
//!
//! assert_eq!(actor.id().as_u64(), 1);
//! assert_eq!(actor.state(), ActorState::Idle);
//! ```

pub mod components;

use std::fmt;
use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use waypath::NavigationProvider;

use crate::animation::AnimationController;
use crate::config::MovementConfig;
use crate::error::ConfigError;
use crate::movement::MovementState;
use crate::stats::StatsProvider;

pub use components::{ActorMetadata, Body};

/// Unique identifier for an actor.
///
/// Ordered by numeric value; fields iterate actors in this order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(u64);

impl ActorId {
    /// Creates a new `ActorId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({})", self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ActorId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Coarse actor state as seen by combat, AI and other systems.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActorState {
    /// Standing still, no command running
    #[default]
    Idle,
    /// A walk session is running
    Walk,
    /// A one-shot action is playing
    Emote,
}

impl fmt::Display for ActorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Walk => write!(f, "Walk"),
            Self::Emote => write!(f, "Emote"),
        }
    }
}

/// Actor with fully type-erased collaborators.
pub type DynActor = Actor<
    Box<dyn NavigationProvider>,
    Box<dyn AnimationController>,
    Box<dyn StatsProvider>,
>;

/// A controllable entity in a field.
///
/// `N` is the navigation agent (absent while the actor is not on a
/// navigable surface), `A` the animation controller and `S` the stat
/// source.
#[derive(Debug)]
pub struct Actor<N, A, S> {
    pub(crate) id: ActorId,
    pub(crate) body: Body,
    pub(crate) metadata: ActorMetadata,
    pub(crate) navigation: Option<N>,
    pub(crate) animation: A,
    pub(crate) stats: S,
    pub(crate) movement: MovementState,
    pub(crate) config: Arc<MovementConfig>,
}

impl<N, A, S> Actor<N, A, S> {
    /// Creates an idle actor at `position` with default metadata and config.
    #[must_use]
    pub fn new(id: ActorId, position: Vec3, navigation: Option<N>, animation: A, stats: S) -> Self {
        Self {
            id,
            body: Body::at_position(position),
            metadata: ActorMetadata::default(),
            navigation,
            animation,
            stats,
            movement: MovementState::default(),
            config: Arc::new(MovementConfig::default()),
        }
    }

    /// Replaces the movement metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: ActorMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Replaces the shared movement config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the config fails
    /// [`MovementConfig::validate`].
    pub fn with_config(mut self, config: Arc<MovementConfig>) -> Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Returns the actor's identifier.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Returns the actor's kinematic state.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Mutable kinematic state, for placement outside of a walk.
    #[must_use]
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Returns the movement metadata.
    #[must_use]
    pub const fn metadata(&self) -> &ActorMetadata {
        &self.metadata
    }

    /// Returns the shared movement config.
    #[must_use]
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Returns the navigation agent, if attached.
    #[must_use]
    pub fn navigation(&self) -> Option<&N> {
        self.navigation.as_ref()
    }

    /// Mutable navigation agent, if attached.
    #[must_use]
    pub fn navigation_mut(&mut self) -> Option<&mut N> {
        self.navigation.as_mut()
    }

    /// Attaches or detaches the navigation agent, returning the old one.
    pub fn set_navigation(&mut self, navigation: Option<N>) -> Option<N> {
        std::mem::replace(&mut self.navigation, navigation)
    }

    /// Returns the animation controller.
    #[must_use]
    pub const fn animation(&self) -> &A {
        &self.animation
    }

    /// Mutable animation controller.
    #[must_use]
    pub fn animation_mut(&mut self) -> &mut A {
        &mut self.animation
    }

    /// Returns the stat source.
    #[must_use]
    pub const fn stats(&self) -> &S {
        &self.stats
    }

    /// Mutable stat source.
    #[must_use]
    pub fn stats_mut(&mut self) -> &mut S {
        &mut self.stats
    }

    /// Returns the movement state.
    #[must_use]
    pub const fn movement(&self) -> &MovementState {
        &self.movement
    }

    /// Returns the coarse actor state.
    #[must_use]
    pub fn state(&self) -> ActorState {
        self.movement.state()
    }
}

impl<N, A, S> Actor<N, A, S>
where
    N: NavigationProvider + 'static,
    A: AnimationController + 'static,
    S: StatsProvider + 'static,
{
    /// Erases the collaborator types.
    #[must_use]
    pub fn into_dyn(self) -> DynActor {
        Actor {
            id: self.id,
            body: self.body,
            metadata: self.metadata,
            navigation: self
                .navigation
                .map(|nav| Box::new(nav) as Box<dyn NavigationProvider>),
            animation: Box::new(self.animation),
            stats: Box::new(self.stats),
            movement: self.movement,
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::SequenceLibrary;
    use crate::stats::BasicStats;
    use waypath::WaypointAgent;

    fn make_actor() -> Actor<WaypointAgent, SequenceLibrary, BasicStats> {
        Actor::new(
            ActorId::new(5),
            Vec3::new(1.0, 2.0, 3.0),
            Some(WaypointAgent::new(Vec3::new(1.0, 2.0, 3.0))),
            SequenceLibrary::locomotion(),
            BasicStats::default(),
        )
    }

    mod actor_id_tests {
        use super::*;

        #[test]
        fn new_creates_id_with_value() {
            assert_eq!(ActorId::new(42).as_u64(), 42);
        }

        #[test]
        fn ordering() {
            let mut ids = vec![ActorId::new(3), ActorId::new(1), ActorId::new(2)];
            ids.sort();
            assert_eq!(ids, vec![ActorId::new(1), ActorId::new(2), ActorId::new(3)]);
        }

        #[test]
        fn formats() {
            let id = ActorId::new(42);
            assert_eq!(format!("{id:?}"), "ActorId(42)");
            assert_eq!(format!("{id}"), "42");
        }

        #[test]
        fn from_u64() {
            let id: ActorId = 9u64.into();
            assert_eq!(id.as_u64(), 9);
        }

        #[test]
        fn serialization_roundtrip() {
            let id = ActorId::new(12345);
            let json = serde_json::to_string(&id).unwrap();
            let back: ActorId = serde_json::from_str(&json).unwrap();
            assert_eq!(id, back);
        }
    }

    mod actor_state_tests {
        use super::*;

        #[test]
        fn default_is_idle() {
            assert_eq!(ActorState::default(), ActorState::Idle);
        }

        #[test]
        fn display_format() {
            assert_eq!(format!("{}", ActorState::Idle), "Idle");
            assert_eq!(format!("{}", ActorState::Walk), "Walk");
            assert_eq!(format!("{}", ActorState::Emote), "Emote");
        }
    }

    mod actor_tests {
        use super::*;

        #[test]
        fn new_actor_is_idle_at_position() {
            let actor = make_actor();
            assert_eq!(actor.id(), ActorId::new(5));
            assert_eq!(actor.body().position, Vec3::new(1.0, 2.0, 3.0));
            assert_eq!(actor.body().velocity, Vec3::ZERO);
            assert_eq!(actor.state(), ActorState::Idle);
            assert!(actor.navigation().is_some());
        }

        #[test]
        fn builders_replace_metadata_and_config() {
            let metadata = ActorMetadata {
                walk_speed: 0.5,
                run_speed: 2.0,
                animation_speed: 1.5,
            };
            let config = Arc::new(MovementConfig {
                max_segment_hops: 1,
                ..MovementConfig::default()
            });
            let actor = make_actor()
                .with_metadata(metadata)
                .with_config(Arc::clone(&config))
                .unwrap();

            assert_eq!(*actor.metadata(), metadata);
            assert_eq!(actor.config().max_segment_hops, 1);
        }

        #[test]
        fn with_config_rejects_invalid_config() {
            let zero_hops = Arc::new(MovementConfig {
                max_segment_hops: 0,
                ..MovementConfig::default()
            });
            let negative_lookahead = Arc::new(MovementConfig {
                path_lookahead_secs: -1.0,
                ..MovementConfig::default()
            });

            for config in [zero_hops, negative_lookahead] {
                let err = make_actor().with_config(config).unwrap_err();
                assert!(matches!(err, ConfigError::Invalid(_)));
            }
        }

        #[test]
        fn set_navigation_swaps_agent() {
            let mut actor = make_actor();
            let old = actor.set_navigation(None);
            assert!(old.is_some());
            assert!(actor.navigation().is_none());
        }

        #[test]
        fn into_dyn_keeps_state() {
            let actor = make_actor().into_dyn();
            assert_eq!(actor.id(), ActorId::new(5));
            assert_eq!(actor.body().position, Vec3::new(1.0, 2.0, 3.0));
            assert!(actor.navigation().is_some());
        }

        #[test]
        fn dyn_actor_is_send() {
            fn assert_send<T: Send>() {}
            assert_send::<DynActor>();
        }
    }
}
