//! Free-direction locomotion.

use waypath::NavigationProvider;

use super::session::WalkSession;
use super::Progress;
use crate::actor::Body;

/// Move one tick along the session heading.
///
/// The navigation agent corrects the candidate position (walls, edges);
/// the body takes whatever it reports. Facing is left alone so an actor can
/// strafe. Never arrives.
pub(super) fn advance<N: NavigationProvider + ?Sized>(
    body: &mut Body,
    navigation: &mut N,
    session: &WalkSession,
    delta: f32,
) -> Progress {
    let step = session.heading * (session.speed * delta);
    navigation.update_position(body.position + step);
    body.position = navigation.agent_position();
    body.velocity = session.speed * session.heading;
    Progress::Moving
}
