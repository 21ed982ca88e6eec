//! Fixed-step scheduler for a set of actors.
//!
//! A [`Field`] owns its actors and advances all of them once per
//! [`step`](Field::step). Each step:
//!
//! 1. ticks every actor's movement
//! 2. advances every actor's animation by the same delta
//! 3. feeds the keyframe events raised back into the actor
//!
//! Actors share nothing, so the step runs them in parallel with rayon.
//! Storage is a `BTreeMap` keyed by [`ActorId`], so lookups and iteration
//! are in id order.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use stride::animation::SequenceLibrary;
//! use stride::config::MovementConfig;
//! use stride::field::Field;
//! use stride::movement::WalkCommand;
//! use stride::stats::BasicStats;
//! use stride::task::TaskHandle;
//! use waypath::WaypointAgent;
//!
//! let mut field: Field = Field::new(MovementConfig::default())?;
//! let id = field.spawn(
//!     Vec3::ZERO,
//!     Some(Box::new(WaypointAgent::new(Vec3::ZERO))),
//!     Box::new(SequenceLibrary::locomotion()),
//!     Box::new(BasicStats::default()),
//! );
//!
//! let task = TaskHandle::new();
//! field
//!     .get_mut(id)
//!     .unwrap()
//!     .walk(WalkCommand::to(Vec3::new(0.5, 0.0, 0.0)), task.clone())
//!     .unwrap();
//!
//! for _ in 0..10 {
//!     field.step();
//! }
//! assert!(!task.is_pending());
//! assert_eq!(field.tick(), 10);
//! # Ok::<(), stride::error::ConfigError>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;
use rayon::prelude::*;
use tracing::trace_span;
use waypath::NavigationProvider;

use crate::actor::{Actor, ActorId};
use crate::animation::AnimationController;
use crate::config::MovementConfig;
use crate::error::ConfigError;
use crate::stats::StatsProvider;

/// Default step length (10 Hz).
pub const DEFAULT_STEP: Duration = Duration::from_millis(100);

/// A set of actors advanced together.
///
/// Defaults to type-erased collaborators so one field can mix navigation,
/// animation and stat implementations.
pub struct Field<
    N = Box<dyn NavigationProvider>,
    A = Box<dyn AnimationController>,
    S = Box<dyn StatsProvider>,
> {
    actors: BTreeMap<ActorId, Actor<N, A, S>>,
    config: Arc<MovementConfig>,
    delta: Duration,
    tick: u64,
    next_id: u64,
}

impl<N, A, S> fmt::Debug for Field<N, A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("actors", &format!("[{} actors]", self.actors.len()))
            .field("config", &self.config)
            .field("delta", &self.delta)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

impl<N, A, S> Field<N, A, S> {
    /// Creates an empty field stepping at [`DEFAULT_STEP`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the config fails
    /// [`MovementConfig::validate`].
    pub fn new(config: MovementConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            actors: BTreeMap::new(),
            config: Arc::new(config),
            delta: DEFAULT_STEP,
            tick: 0,
            next_id: 0,
        })
    }

    /// Sets the step length.
    #[must_use]
    pub fn with_delta(mut self, delta: Duration) -> Self {
        self.delta = delta;
        self
    }

    /// Spawns an idle actor with the next free id.
    pub fn spawn(
        &mut self,
        position: Vec3,
        navigation: Option<N>,
        animation: A,
        stats: S,
    ) -> ActorId {
        let id = ActorId::new(self.next_id);
        self.insert(Actor::new(id, position, navigation, animation, stats));
        id
    }

    /// Adds an actor built elsewhere, switching it to this field's config.
    ///
    /// Returns the actor previously stored under the same id, if any.
    pub fn insert(&mut self, mut actor: Actor<N, A, S>) -> Option<Actor<N, A, S>> {
        let id = actor.id();
        self.next_id = self.next_id.max(id.as_u64().saturating_add(1));
        actor.config = Arc::clone(&self.config);
        self.actors.insert(id, actor)
    }

    /// Removes an actor.
    pub fn remove(&mut self, id: ActorId) -> Option<Actor<N, A, S>> {
        self.actors.remove(&id)
    }

    /// Looks up an actor.
    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&Actor<N, A, S>> {
        self.actors.get(&id)
    }

    /// Looks up an actor for issuing commands.
    #[must_use]
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor<N, A, S>> {
        self.actors.get_mut(&id)
    }

    /// Iterates actors in id order.
    pub fn actors(&self) -> impl Iterator<Item = &Actor<N, A, S>> {
        self.actors.values()
    }

    /// Number of actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Returns `true` if the field has no actors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Steps taken so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Step length.
    #[must_use]
    pub const fn delta(&self) -> Duration {
        self.delta
    }

    /// Config shared by every actor.
    #[must_use]
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }
}

impl<N, A, S> Field<N, A, S>
where
    N: NavigationProvider,
    A: AnimationController,
    S: StatsProvider,
{
    /// Advances every actor by one step.
    pub fn step(&mut self) {
        let delta = self.delta;
        let _span =
            trace_span!("field_step", tick = self.tick, actors = self.actors.len()).entered();

        self.actors
            .par_iter_mut()
            .for_each(|(_, actor)| advance_actor(actor, delta));

        self.tick += 1;
    }
}

fn advance_actor<N, A, S>(actor: &mut Actor<N, A, S>, delta: Duration)
where
    N: NavigationProvider,
    A: AnimationController,
    S: StatsProvider,
{
    actor.tick(delta);

    let mut events = Vec::new();
    actor.animation.update(delta, &mut events);
    for event in &events {
        actor.handle_event(event);
    }
}
