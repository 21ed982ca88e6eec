//! Straight-line flight locomotion.

use glam::Vec3;
use waypath::NavigationProvider;

use super::session::WalkSession;
use super::Progress;
use crate::actor::Body;

/// Fly one tick toward the session target.
///
/// Velocity is derived from the displacement the navigation agent reports,
/// so it may exceed the nominal speed if the agent snaps ahead.
pub(super) fn advance<N: NavigationProvider + ?Sized>(
    body: &mut Body,
    navigation: &mut N,
    session: &WalkSession,
    delta: f32,
) -> Progress {
    let Some(target) = session.mode.target() else {
        return Progress::Moving;
    };

    let from = body.position;
    let (next, reached) = navigation.fly_advance(from, target, session.speed, delta);
    body.position = next;
    body.velocity = (next - from) / delta;

    if session.look_on_arrival() {
        body.look_to(target - next);
    }

    if reached {
        body.velocity = Vec3::ZERO;
        return Progress::Arrived;
    }
    Progress::Moving
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::{Locomotion, MovementMode, WalkFlags};
    use waypath::WaypointAgent;

    fn session(target: Vec3, speed: f32, flags: WalkFlags) -> WalkSession {
        WalkSession {
            mode: MovementMode::MoveTo { target },
            locomotion: Locomotion::Flight,
            flags: flags | WalkFlags::FLYING,
            speed,
            ..WalkSession::default()
        }
    }

    #[test]
    fn flies_toward_target() {
        let mut body = Body::default();
        let mut nav = WaypointAgent::new(Vec3::ZERO);
        let walk = session(Vec3::new(0.0, 10.0, 0.0), 4.0, WalkFlags::empty());

        let progress = advance(&mut body, &mut nav, &walk, 0.5);

        assert_eq!(progress, Progress::Moving);
        assert!((body.position - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
        assert!((body.velocity - Vec3::new(0.0, 4.0, 0.0)).length() < 1e-4);
        assert_eq!(body.facing, Vec3::X);
    }

    #[test]
    fn arrival_zeroes_velocity() {
        let mut body = Body::at_position(Vec3::new(9.0, 0.0, 0.0));
        let mut nav = WaypointAgent::new(body.position);
        let walk = session(Vec3::new(10.0, 0.0, 0.0), 4.0, WalkFlags::LOOK_ON_ARRIVAL);

        let progress = advance(&mut body, &mut nav, &walk, 0.5);

        assert_eq!(progress, Progress::Arrived);
        assert_eq!(body.position, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn looks_along_remaining_flight() {
        let mut body = Body::default();
        let mut nav = WaypointAgent::new(Vec3::ZERO);
        let walk = session(Vec3::new(0.0, 0.0, 10.0), 1.0, WalkFlags::LOOK_ON_ARRIVAL);

        advance(&mut body, &mut nav, &walk, 0.1);
        assert_eq!(body.facing, Vec3::Z);
    }
}
