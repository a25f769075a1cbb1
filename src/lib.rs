//! Realm Runner - a two-realm side-scrolling platformer core
//!
//! Core modules:
//! - `sim`: Deterministic per-frame simulation (physics, camera, realms, progress)
//! - `level`: Level descriptions and the loaders that supply them
//! - `settings`: Data-driven tuning and quality presets
//! - `highscores`: Level-completion score sinks

pub mod highscores;
pub mod level;
pub mod settings;
pub mod sim;

pub use highscores::{HighScores, LogSink, ScoreSink};
pub use level::{LevelCatalog, LevelDesc, LevelDirectory, LevelSource, LoadError};
pub use settings::{QualityPreset, Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference frame rate the per-frame tuning values are expressed in
    pub const FRAME_RATE: f32 = 60.0;
    /// Fixed simulation timestep (one reference frame)
    pub const SIM_DT: f32 = 1.0 / FRAME_RATE;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Viewport dimensions
    pub const SCREEN_WIDTH: f32 = 1000.0;
    pub const SCREEN_HEIGHT: f32 = 650.0;

    /// Downward acceleration, units per frame²
    pub const GRAVITY: f32 = 1.0;
    /// Horizontal run speed, units per frame
    pub const PLAYER_MOVEMENT_SPEED: f32 = 5.0;
    /// Jump impulse per realm
    pub const PLAYER_JUMP_SPEED_GOOD: f32 = 10.0;
    pub const PLAYER_JUMP_SPEED_BAD: f32 = 20.0;
    /// Terminal fall speed per realm
    pub const PLAYER_FALL_SPEED_GOOD: f32 = 20.0;
    pub const PLAYER_FALL_SPEED_BAD: f32 = 30.0;
    /// Player body half-extents (18px tile at 2x scale)
    pub const PLAYER_HALF_WIDTH: f32 = 18.0;
    pub const PLAYER_HALF_HEIGHT: f32 = 18.0;

    /// Camera dead zone (horizontal distance before the camera follows)
    pub const CAMERA_OFFSET: f32 = 100.0;
    /// Per-frame camera interpolation factor
    pub const CAMERA_SCROLL_SPEED: f32 = 0.01;
    /// Interpolation factor used right after a teleport
    pub const CAMERA_SNAP_SPEED: f32 = 1.0;

    /// Falling below this height sends the player back to the respawn point
    pub const WORLD_FLOOR_Y: f32 = -SCREEN_HEIGHT;
    /// How far below the feet the ground check looks
    pub const GROUND_PROBE: f32 = 1.0;
}

/// Move `current` toward `target` by `factor` (0 = frozen, 1 = snap)
#[inline]
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor.clamp(0.0, 1.0)
}

/// Componentwise `approach` for 2D points
#[inline]
pub fn approach_vec(current: Vec2, target: Vec2, factor: f32) -> Vec2 {
    Vec2::new(
        approach(current.x, target.x, factor),
        approach(current.y, target.y, factor),
    )
}

/// Unit vector at `theta` radians
#[inline]
pub fn direction(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
