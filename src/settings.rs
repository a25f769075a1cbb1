//! Game settings and tuning
//!
//! Persisted as JSON next to the binary; every field falls back to the
//! reference tuning when absent.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Realm;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("settings file {} is malformed: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }

    /// Scale a Medium-quality particle count to this preset
    pub fn particles_for(&self, base: usize) -> usize {
        match self {
            QualityPreset::Low => base / 2,
            QualityPreset::Medium => base,
            QualityPreset::High => base * 2,
        }
    }
}

/// Per-realm movement tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealmTuning {
    /// Vertical speed set by a jump
    pub jump_speed: f32,
    /// Cap on downward speed
    pub fall_speed: f32,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    /// Viewport size in world units
    pub viewport: Vec2,
    /// Downward acceleration per frame²
    pub gravity: f32,
    /// Below this height the player respawns
    pub world_floor_y: f32,

    // === Player ===
    pub movement_speed: f32,
    pub player_half_extents: Vec2,
    /// Indexed by `Realm::index()`
    pub realms: [RealmTuning; Realm::COUNT],

    // === Camera ===
    /// Horizontal dead zone
    pub camera_offset: f32,
    /// Per-frame follow factor
    pub camera_scroll_speed: f32,
    /// Follow factor right after falling out of the world
    pub camera_snap_speed: f32,

    // === Effects ===
    pub quality: QualityPreset,
    /// Seed for burst particle directions
    pub effect_seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            gravity: GRAVITY,
            world_floor_y: WORLD_FLOOR_Y,

            movement_speed: PLAYER_MOVEMENT_SPEED,
            player_half_extents: Vec2::new(PLAYER_HALF_WIDTH, PLAYER_HALF_HEIGHT),
            realms: [
                RealmTuning {
                    jump_speed: PLAYER_JUMP_SPEED_GOOD,
                    fall_speed: PLAYER_FALL_SPEED_GOOD,
                },
                RealmTuning {
                    jump_speed: PLAYER_JUMP_SPEED_BAD,
                    fall_speed: PLAYER_FALL_SPEED_BAD,
                },
            ],

            camera_offset: CAMERA_OFFSET,
            camera_scroll_speed: CAMERA_SCROLL_SPEED,
            camera_snap_speed: CAMERA_SNAP_SPEED,

            quality: QualityPreset::Medium,
            effect_seed: 0x5EED,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (everything else default)
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    #[inline]
    pub fn realm_tuning(&self, realm: Realm) -> RealmTuning {
        self.realms[realm.index()]
    }

    /// Load settings from a JSON file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let settings = serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
