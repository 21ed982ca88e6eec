//! Ground path-follow locomotion.
//!
//! Each tick spends a travel budget of `delta × speed` along the navigation
//! segments. Distances are compared squared; the only square roots happen
//! when a segment is used up and a new one is fetched.

use glam::Vec3;
use waypath::NavigationProvider;

use super::session::{MovementMode, WalkSession};
use super::Progress;
use crate::actor::Body;
use crate::config::MovementConfig;

/// Run one tick of path following.
pub(super) fn advance<N: NavigationProvider + ?Sized>(
    body: &mut Body,
    navigation: &mut N,
    session: &mut WalkSession,
    delta: f32,
    config: &MovementConfig,
) -> Progress {
    let speed = session.speed;
    let travel = delta * speed;
    let mut budget = travel;
    let mut hops = 0;

    loop {
        let remaining_squared = session
            .segment
            .map_or(0.0, |segment| (segment.end - body.position).length_squared());

        if session.segment.is_some() && remaining_squared >= budget * budget {
            break;
        }

        if let Some(segment) = session.segment {
            body.position = segment.end;
            budget -= remaining_squared.sqrt();
            if arrive(body, session, travel) {
                return Progress::Arrived;
            }
        }

        if hops == config.max_segment_hops {
            budget = 0.0;
            break;
        }
        hops += 1;

        session.segment = navigation.advance(config.path_lookahead(), speed);

        let offset = session
            .segment
            .map_or(Vec3::ZERO, |segment| segment.end - body.position);
        let length_squared = offset.length_squared();

        if length_squared == 0.0 {
            return exhausted(body, session);
        }

        session.heading = offset / length_squared.sqrt();
        body.look_to(session.heading);
    }

    body.velocity = speed * session.heading;
    body.position += budget * session.heading;

    if arrive(body, session, travel) {
        return Progress::Arrived;
    }
    Progress::Moving
}

/// Stops the body if the mode's arrival condition holds where it stands.
fn arrive(body: &mut Body, session: &WalkSession, travel: f32) -> bool {
    let Some(offset) = arrival_offset(&session.mode, body.position, travel) else {
        return false;
    };
    body.velocity = Vec3::ZERO;
    if session.look_on_arrival() {
        body.look_to(offset);
    }
    true
}

/// No further segment. The walk ends unfinished even if the body happens to
/// stand inside its arrival condition.
fn exhausted(body: &mut Body, session: &WalkSession) -> Progress {
    if session.look_on_arrival() {
        if let Some(target) = session.mode.target() {
            body.look_to(target - body.position);
        }
    }
    body.velocity = Vec3::ZERO;
    Progress::Exhausted
}

/// Offset to the target if the mode's arrival condition holds at `position`.
///
/// `travel` is one tick of movement; `MoveTo` arrives once the target is
/// closer than that.
fn arrival_offset(mode: &MovementMode, position: Vec3, travel: f32) -> Option<Vec3> {
    let (target, threshold_squared, beyond) = match *mode {
        MovementMode::MoveTo { target } => (target, travel * travel, false),
        MovementMode::ToTarget { target, distance } => (target, distance * distance, false),
        MovementMode::FromTarget { target, distance } => (target, distance * distance, true),
        MovementMode::None | MovementMode::Direction(_) => return None,
    };

    let offset = target - position;
    let distance_squared = offset.length_squared();
    let reached = if beyond {
        distance_squared >= threshold_squared
    } else {
        distance_squared < threshold_squared
    };
    reached.then_some(offset)
}
