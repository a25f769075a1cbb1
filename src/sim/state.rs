//! Game state and core simulation types
//!
//! Everything one `tick` reads or writes is owned by `GameState`. Per-level
//! collections live in `Level` and are swapped out wholesale on reload.

use glam::Vec2;

use super::camera::Camera;
use super::effects::EffectScheduler;
use super::input::InputState;
use super::progress::{LevelCompletion, LevelProgress, is_level_complete};
use super::realm::{Pose, Realm, sprite_key};
use super::rect::Rect;
use crate::level::{LevelDesc, LevelSource, LoadError};
use crate::settings::{RealmTuning, Settings};

/// Horizontal facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// The player-controlled body
#[derive(Debug, Clone)]
pub struct Player {
    /// Collision box; its center is the player position
    pub body: Rect,
    pub vel: Vec2,
    pub facing: Facing,
    /// Set by a successful jump, cleared on landing
    pub jumping: bool,
    pub realm: Realm,
    /// Visual pose, paired with `realm` for the sprite lookup
    pub pose: Pose,
}

impl Player {
    pub fn new(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            body: Rect::new(position, half_extents),
            vel: Vec2::ZERO,
            facing: Facing::Right,
            jumping: false,
            realm: Realm::Good,
            pose: Pose::Idle,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.body.center
    }

    /// Teleport without any collision handling; vertical momentum is dropped
    pub fn teleport(&mut self, to: Vec2) {
        self.body.center = to;
        self.vel.y = 0.0;
        self.jumping = false;
    }

    /// Turn toward the sign of `dx` (no change when standing still)
    pub fn face_toward(&mut self, dx: f32) {
        if dx > 0.0 {
            self.facing = Facing::Right;
        } else if dx < 0.0 {
            self.facing = Facing::Left;
        }
    }

    /// Derive the pose from motion after physics and realm have run
    pub fn update_pose(&mut self, grounded: bool) {
        self.pose = Pose::from_motion(self.vel, grounded);
    }
}

/// A collectible coin
#[derive(Debug, Clone)]
pub struct Pickup {
    pub rect: Rect,
    pub collected: bool,
}

/// Touching one sends the player back to the respawn point
#[derive(Debug, Clone)]
pub struct Hazard {
    pub rect: Rect,
}

/// A claimable respawn point
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub id: u32,
    pub rect: Rect,
    pub claimed: bool,
}

impl Checkpoint {
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.rect.center
    }
}

/// Typed per-level collections built from a validated `LevelDesc`
#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    pub player_start: Vec2,
    /// Static colliders; never mutated after load
    pub walls: Vec<Rect>,
    /// Uncollected pickups only
    pub pickups: Vec<Pickup>,
    pub hazards: Vec<Hazard>,
    pub checkpoints: Vec<Checkpoint>,
    pub start_checkpoint: Option<u32>,
    /// Pickup count at load time
    pub total_pickups: u32,
}

impl Level {
    pub fn from_desc(desc: &LevelDesc) -> Self {
        Self {
            name: desc.name.clone(),
            player_start: desc.player_start,
            walls: desc.walls.clone(),
            pickups: desc
                .coins
                .iter()
                .map(|&rect| Pickup {
                    rect,
                    collected: false,
                })
                .collect(),
            hazards: desc.hazards.iter().map(|&rect| Hazard { rect }).collect(),
            checkpoints: desc
                .checkpoints
                .iter()
                .map(|c| Checkpoint {
                    id: c.id,
                    rect: c.rect,
                    claimed: false,
                })
                .collect(),
            start_checkpoint: desc.start_checkpoint,
            total_pickups: desc.coins.len() as u32,
        }
    }

    /// Designated start checkpoint position, or the player start when the
    /// level has none
    pub fn initial_respawn(&self) -> Vec2 {
        self.start_checkpoint
            .and_then(|id| self.checkpoints.iter().find(|c| c.id == id))
            .map(Checkpoint::position)
            .unwrap_or(self.player_start)
    }

    pub fn claimed_count(&self) -> usize {
        self.checkpoints.iter().filter(|c| c.claimed).count()
    }
}

fn log_level_loaded(index: u32, level: &Level) {
    log::info!(
        "Level {} '{}' loaded: {} walls, {} coins, {} hazards, {} checkpoints",
        index,
        level.name,
        level.walls.len(),
        level.pickups.len(),
        level.hazards.len(),
        level.checkpoints.len()
    );
    if level.checkpoints.is_empty() {
        log::warn!("Level {} has no checkpoints and cannot be completed", index);
    }
}

/// Why the player was sent back to the respawn point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnCause {
    FellOutOfWorld,
    Hazard,
}

/// Observable things that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PickupCollected { position: Vec2 },
    Respawned { cause: RespawnCause, at: Vec2 },
    CheckpointClaimed { id: u32 },
    RealmChanged { from: Realm, to: Realm },
    LevelCompleted(LevelCompletion),
    LevelLoaded { index: u32 },
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Index of the level currently loaded
    pub level_index: u32,
    pub level: Level,
    pub player: Player,
    pub camera: Camera,
    pub progress: LevelProgress,
    pub input: InputState,
    pub effects: EffectScheduler,
    /// Events emitted since the last `drain_events`
    pub events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Load `start_index` and place the player at its start
    pub fn new(
        settings: Settings,
        levels: &dyn LevelSource,
        start_index: u32,
    ) -> Result<Self, LoadError> {
        let desc = levels.load(start_index)?;
        let level = Level::from_desc(&desc);
        let player = Player::new(level.player_start, settings.player_half_extents);
        let mut camera = Camera::new(settings.viewport);
        camera.snap_to(player.position());
        let progress = LevelProgress::new(&level);
        let effects = EffectScheduler::new(settings.effect_seed, settings.quality);

        log_level_loaded(start_index, &level);

        Ok(Self {
            settings,
            level_index: start_index,
            level,
            player,
            camera,
            progress,
            input: InputState::default(),
            effects,
            events: vec![GameEvent::LevelLoaded { index: start_index }],
            time_ticks: 0,
        })
    }

    /// Replace every per-level collection with level `index`.
    ///
    /// The new level is fully built before anything is swapped, so a load
    /// failure leaves the current level untouched.
    pub fn load_level(&mut self, levels: &dyn LevelSource, index: u32) -> Result<(), LoadError> {
        let desc = levels.load(index)?;
        let level = Level::from_desc(&desc);

        let mut player = Player::new(level.player_start, self.settings.player_half_extents);
        player.facing = self.player.facing;
        let progress = LevelProgress::new(&level);

        log_level_loaded(index, &level);

        self.level = level;
        self.player = player;
        self.progress = progress;
        self.level_index = index;
        self.camera.snap_to(self.player.position());
        self.events.push(GameEvent::LevelLoaded { index });
        Ok(())
    }

    /// Level is complete once every checkpoint has been claimed
    pub fn is_level_complete(&self) -> bool {
        is_level_complete(&self.level.checkpoints)
    }

    /// Summary of the current level's run so far
    pub fn completion(&self) -> LevelCompletion {
        self.progress.completion(self.level_index)
    }

    /// Send the player to the active respawn point
    pub fn respawn(&mut self, cause: RespawnCause) {
        let at = self.progress.respawn_point;
        self.player.teleport(at);
        log::debug!("Respawn ({:?}) at ({:.1}, {:.1})", cause, at.x, at.y);
        self.events.push(GameEvent::Respawned { cause, at });
    }

    /// Jump/fall tuning for the player's current realm
    pub fn realm_tuning(&self) -> RealmTuning {
        self.settings.realm_tuning(self.player.realm)
    }

    /// Texture key for the renderer
    pub fn sprite_key(&self) -> &'static str {
        sprite_key(self.player.realm, self.player.pose)
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
