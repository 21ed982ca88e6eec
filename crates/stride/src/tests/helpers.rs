//! Test doubles and factories shared by the scenario and property tests.

use std::collections::VecDeque;
use std::time::Duration;

use glam::Vec3;
use waypath::{NavigationProvider, Segment, WaypointAgent};

use crate::actor::{Actor, ActorId};
use crate::animation::SequenceLibrary;
use crate::stats::BasicStats;
use crate::task::TaskHandle;

/// Actor with the reference navigation agent.
pub type TestActor = Actor<WaypointAgent, SequenceLibrary, BasicStats>;

/// Actor whose navigation replays a fixed list of segments.
pub type ScriptedActor = Actor<ScriptedNavigation, SequenceLibrary, BasicStats>;

/// Navigation double that hands out queued segments, then `None`.
#[derive(Debug, Clone)]
pub struct ScriptedNavigation {
    segments: VecDeque<Segment>,
    position: Vec3,
    accept_paths: bool,
    advance_calls: usize,
}

impl ScriptedNavigation {
    /// Double that accepts every path request.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments: segments.into(),
            position: Vec3::ZERO,
            accept_paths: true,
            advance_calls: 0,
        }
    }

    /// Double that refuses every path request.
    pub fn refusing() -> Self {
        Self {
            accept_paths: false,
            ..Self::new(Vec::new())
        }
    }

    /// Straight run of `count` segments of length `step` along +X.
    pub fn straight_run(step: f32, count: usize) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let segments = (0..count)
            .map(|i| {
                let start = Vec3::X * (step * i as f32);
                Segment::new(start, start + Vec3::X * step)
            })
            .collect();
        Self::new(segments)
    }

    /// Number of segment requests seen.
    pub fn advance_calls(&self) -> usize {
        self.advance_calls
    }
}

impl NavigationProvider for ScriptedNavigation {
    fn update_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn agent_position(&self) -> Vec3 {
        self.position
    }

    fn advance(&mut self, _lookahead: Duration, _speed: f32) -> Option<Segment> {
        self.advance_calls += 1;
        let segment = self.segments.pop_front()?;
        self.position = segment.end;
        Some(segment)
    }

    fn fly_advance(&mut self, _from: Vec3, to: Vec3, _speed: f32, _delta: f32) -> (Vec3, bool) {
        self.position = to;
        (to, true)
    }

    fn path_to(&mut self, _target: Vec3) -> bool {
        self.accept_paths
    }

    fn path_away_from(&mut self, _from: Vec3, _distance: f32) -> bool {
        self.accept_paths
    }
}

/// Idle actor at `position` with the locomotion sequence set and the given
/// movement-speed stat.
pub fn walker(position: Vec3, movement_speed: i64) -> TestActor {
    Actor::new(
        ActorId::new(1),
        position,
        Some(WaypointAgent::new(position)),
        SequenceLibrary::locomotion(),
        BasicStats::new(movement_speed),
    )
}

/// Idle actor at the origin driven by a scripted navigation double.
pub fn scripted_walker(navigation: ScriptedNavigation, movement_speed: i64) -> ScriptedActor {
    Actor::new(
        ActorId::new(2),
        Vec3::ZERO,
        Some(navigation),
        SequenceLibrary::locomotion(),
        BasicStats::new(movement_speed),
    )
}

/// Ticks `actor` until `task` is signaled, returning the number of ticks
/// taken, or `None` if it is still pending after `max_ticks`.
pub fn ticks_until_settled(
    actor: &mut TestActor,
    task: &TaskHandle,
    delta: Duration,
    max_ticks: usize,
) -> Option<usize> {
    for tick in 1..=max_ticks {
        actor.tick(delta);
        if !task.is_pending() {
            return Some(tick);
        }
    }
    None
}
