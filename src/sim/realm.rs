//! Realm state machine
//!
//! The player is in one of two realms depending on which side of the camera's
//! horizontal midpoint they stand. Realm selects jump/fall tuning and the
//! sprite set.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::effects::{EffectKind, EffectScheduler};
use super::state::Player;

/// The two mutually exclusive player modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Realm {
    /// Left of the midpoint (initial realm)
    #[default]
    Good,
    /// Right of the midpoint
    Bad,
}

impl Realm {
    pub const COUNT: usize = 2;

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Realm::Good => 0,
            Realm::Bad => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Realm::Good => "good",
            Realm::Bad => "bad",
        }
    }
}

/// Animation pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pose {
    #[default]
    Idle,
    Walk,
    Jump,
    Fall,
}

impl Pose {
    pub const COUNT: usize = 4;

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Pose::Idle => 0,
            Pose::Walk => 1,
            Pose::Jump => 2,
            Pose::Fall => 3,
        }
    }

    pub fn from_motion(vel: Vec2, grounded: bool) -> Self {
        if !grounded {
            if vel.y > 0.0 { Pose::Jump } else { Pose::Fall }
        } else if vel.x != 0.0 {
            Pose::Walk
        } else {
            Pose::Idle
        }
    }
}

/// Player textures by `[realm][pose]`
pub const PLAYER_SPRITES: [[&str; Pose::COUNT]; Realm::COUNT] = [
    [
        "images/tile_0019.png",
        "images/tile_0020.png",
        "images/tile_0021.png",
        "images/tile_0022.png",
    ],
    [
        "images/tile_0109.png",
        "images/tile_0110.png",
        "images/tile_0111.png",
        "images/tile_0112.png",
    ],
];

#[inline]
pub fn sprite_key(realm: Realm, pose: Pose) -> &'static str {
    PLAYER_SPRITES[realm.index()][pose.index()]
}

/// Signed horizontal distance from the camera's midpoint to the player
#[inline]
pub fn midpoint_delta(player_x: f32, camera: &Camera) -> f32 {
    (player_x - camera.viewport.x / 2.0) - camera.position.x
}

/// Realm a player at `player_x` belongs to for this camera
pub fn realm_for(player_x: f32, camera: &Camera) -> Realm {
    if midpoint_delta(player_x, camera) > 0.0 {
        Realm::Bad
    } else {
        Realm::Good
    }
}

/// Recompute the player's realm. On a transition the pose resets to idle and
/// one realm-change burst is queued at the player. Returns `(from, to)`.
pub fn update_realm(
    player: &mut Player,
    camera: &Camera,
    effects: &mut EffectScheduler,
) -> Option<(Realm, Realm)> {
    let next = realm_for(player.position().x, camera);
    if next == player.realm {
        return None;
    }

    let from = player.realm;
    player.realm = next;
    player.pose = Pose::Idle;
    effects.spawn(EffectKind::RealmChangeBurst, player.position());
    Some((from, next))
}
