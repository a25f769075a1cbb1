//! Platformer physics against static rectangles
//!
//! Gravity, then a straight move by velocity, then overlap resolution by the
//! minimum translation axis. Colliders are resolved biggest-overlap first so a
//! body sliding along a row of floor tiles does not catch on the seams.

use glam::Vec2;

use super::rect::Rect;
use super::state::Player;
use crate::consts::GROUND_PROBE;

/// Slack when deciding which side of a collider the body came from
const SIDE_EPSILON: f32 = 1e-3;

/// Which axis a contact was resolved on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactAxis {
    X,
    Y,
}

/// One resolved contact
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub axis: ContactAxis,
    /// Unit push direction applied to the body
    pub normal: Vec2,
}

impl Contact {
    /// Pushed up out of a collider, i.e. came down on top of it
    #[inline]
    pub fn is_landing(&self) -> bool {
        self.axis == ContactAxis::Y && self.normal.y > 0.0
    }
}

/// Advance `player` by one step of `dt` reference frames. Downward speed is
/// capped at `fall_speed` after gravity is applied.
pub fn integrate(
    player: &mut Player,
    colliders: &[Rect],
    gravity: f32,
    fall_speed: f32,
    dt: f32,
) -> Vec<Contact> {
    player.vel.y = (player.vel.y - gravity * dt).max(-fall_speed);
    let previous = player.body.center;
    player.body.center += player.vel * dt;
    resolve_overlaps(&mut player.body, &mut player.vel, previous, colliders)
}

/// Push `body` out of every collider it overlaps.
///
/// Per collider, the axis with the smaller penetration wins; a Y resolution
/// zeroes vertical velocity. `previous` is the body center before the move and
/// decides the push direction when the body came in from one side.
pub fn resolve_overlaps(
    body: &mut Rect,
    vel: &mut Vec2,
    previous: Vec2,
    colliders: &[Rect],
) -> Vec<Contact> {
    let mut hits: Vec<(usize, f32)> = colliders
        .iter()
        .enumerate()
        .filter(|(_, c)| body.overlaps(c))
        .map(|(i, c)| (i, body.overlap_area(c)))
        .collect();
    hits.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let half = body.half_extents;
    let mut contacts = Vec::with_capacity(hits.len());

    for (index, _) in hits {
        let collider = &colliders[index];
        // An earlier push may already have cleared this one
        if !body.overlaps(collider) {
            continue;
        }

        let pen = body.penetration(collider);
        if pen.x < pen.y {
            let from_left = if previous.x + half.x <= collider.min().x + SIDE_EPSILON {
                true
            } else if previous.x - half.x >= collider.max().x - SIDE_EPSILON {
                false
            } else {
                body.center.x < collider.center.x
            };
            let sign = if from_left { -1.0 } else { 1.0 };
            body.center.x = if from_left {
                collider.min().x - half.x
            } else {
                collider.max().x + half.x
            };
            contacts.push(Contact {
                axis: ContactAxis::X,
                normal: Vec2::new(sign, 0.0),
            });
        } else {
            let from_above = if previous.y - half.y >= collider.top() - SIDE_EPSILON {
                true
            } else if previous.y + half.y <= collider.bottom() + SIDE_EPSILON {
                false
            } else {
                body.center.y >= collider.center.y
            };
            body.center.y = if from_above {
                collider.top() + half.y
            } else {
                collider.bottom() - half.y
            };
            vel.y = 0.0;
            contacts.push(Contact {
                axis: ContactAxis::Y,
                normal: Vec2::new(0.0, if from_above { 1.0 } else { -1.0 }),
            });
        }
    }

    contacts
}

/// True when the player is standing on a collider
pub fn can_jump(player: &Player, colliders: &[Rect]) -> bool {
    let feet = player.body.bottom();
    let probe = player
        .body
        .at(player.body.center - Vec2::new(0.0, GROUND_PROBE));
    colliders
        .iter()
        .any(|c| probe.overlaps(c) && c.top() <= feet + SIDE_EPSILON)
}
