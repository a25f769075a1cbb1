//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One `tick` per frame, phases in a fixed order
//! - Seeded RNG only (and only for cosmetic particles)
//! - No rendering, audio or platform dependencies

pub mod camera;
pub mod collision;
pub mod effects;
pub mod input;
pub mod interaction;
pub mod progress;
pub mod realm;
pub mod rect;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use collision::{Contact, ContactAxis, can_jump, integrate};
pub use effects::{Effect, EffectKind, EffectScheduler, Particle};
pub use input::{InputEvent, InputState, Key};
pub use progress::{LevelCompletion, LevelProgress, compute_score, is_level_complete};
pub use realm::{PLAYER_SPRITES, Pose, Realm, sprite_key, update_realm};
pub use rect::Rect;
pub use state::{
    Checkpoint, Facing, GameEvent, GameState, Hazard, Level, Pickup, Player, RespawnCause,
};
pub use tick::{TickInput, tick};
