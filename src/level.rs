//! Level descriptions and loaders
//!
//! A level is a JSON document listing the player start and the rectangles of
//! each layer. Descriptions are validated when loaded; the simulation never
//! sees a degenerate rectangle.

use std::collections::HashSet;
use std::path::PathBuf;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Rect;

/// Built-in levels, in play order
const BUILTIN_LEVELS: &[&str] = &[
    include_str!("../levels/level_00.json"),
    include_str!("../levels/level_01.json"),
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("level {index} not found")]
    NotFound { index: u32 },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("level {index} is not a valid description: {source}")]
    Parse {
        index: u32,
        source: serde_json::Error,
    },
    #[error("level {index} has invalid geometry: {what}")]
    InvalidGeometry { index: u32, what: String },
    #[error("level {index} lists checkpoint {id} more than once")]
    DuplicateCheckpoint { index: u32, id: u32 },
    #[error("level {index} starts at unknown checkpoint {id}")]
    UnknownStartCheckpoint { index: u32, id: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointDesc {
    pub id: u32,
    pub rect: Rect,
}

/// One level as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDesc {
    #[serde(default)]
    pub name: String,
    pub player_start: Vec2,
    #[serde(default)]
    pub walls: Vec<Rect>,
    #[serde(default)]
    pub coins: Vec<Rect>,
    #[serde(default)]
    pub hazards: Vec<Rect>,
    #[serde(default)]
    pub checkpoints: Vec<CheckpointDesc>,
    #[serde(default)]
    pub start_checkpoint: Option<u32>,
}

impl LevelDesc {
    /// Parse and validate a JSON description
    pub fn from_json(index: u32, json: &str) -> Result<Self, LoadError> {
        let desc: LevelDesc =
            serde_json::from_str(json).map_err(|source| LoadError::Parse { index, source })?;
        desc.validate(index)?;
        Ok(desc)
    }

    pub fn validate(&self, index: u32) -> Result<(), LoadError> {
        if !self.player_start.is_finite() {
            return Err(LoadError::InvalidGeometry {
                index,
                what: "player start is not finite".to_string(),
            });
        }

        let layers: [(&str, &[Rect]); 3] = [
            ("wall", &self.walls),
            ("coin", &self.coins),
            ("hazard", &self.hazards),
        ];
        for (layer, rects) in layers {
            if let Some(i) = rects.iter().position(|r| !r.is_well_formed()) {
                return Err(LoadError::InvalidGeometry {
                    index,
                    what: format!("{layer} #{i} is degenerate"),
                });
            }
        }

        let mut seen = HashSet::new();
        for checkpoint in &self.checkpoints {
            if !checkpoint.rect.is_well_formed() {
                return Err(LoadError::InvalidGeometry {
                    index,
                    what: format!("checkpoint {} is degenerate", checkpoint.id),
                });
            }
            if !seen.insert(checkpoint.id) {
                return Err(LoadError::DuplicateCheckpoint {
                    index,
                    id: checkpoint.id,
                });
            }
        }

        if let Some(id) = self.start_checkpoint {
            if !seen.contains(&id) {
                return Err(LoadError::UnknownStartCheckpoint { index, id });
            }
        }
        Ok(())
    }
}

/// Supplies level descriptions by index. Must be deterministic.
pub trait LevelSource {
    fn load(&self, index: u32) -> Result<LevelDesc, LoadError>;

    /// Number of levels, when known up front
    fn level_count(&self) -> Option<u32> {
        None
    }
}

/// Levels held in memory
#[derive(Debug, Clone, Default)]
pub struct LevelCatalog {
    levels: Vec<LevelDesc>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<LevelDesc>) -> Self {
        Self { levels }
    }

    /// The levels shipped with the crate
    pub fn builtin() -> Result<Self, LoadError> {
        Self::from_json(BUILTIN_LEVELS)
    }

    /// Parse a list of JSON documents; position in the list is the index
    pub fn from_json(documents: &[&str]) -> Result<Self, LoadError> {
        let levels = documents
            .iter()
            .enumerate()
            .map(|(i, json)| LevelDesc::from_json(i as u32, json))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl LevelSource for LevelCatalog {
    fn load(&self, index: u32) -> Result<LevelDesc, LoadError> {
        self.levels
            .get(index as usize)
            .cloned()
            .ok_or(LoadError::NotFound { index })
    }

    fn level_count(&self) -> Option<u32> {
        Some(self.levels.len() as u32)
    }
}

/// Reads `level_NN.json` files from a directory on every load
#[derive(Debug, Clone)]
pub struct LevelDirectory {
    root: PathBuf,
}

impl LevelDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, index: u32) -> PathBuf {
        self.root.join(format!("level_{index:02}.json"))
    }
}

impl LevelSource for LevelDirectory {
    fn load(&self, index: u32) -> Result<LevelDesc, LoadError> {
        let path = self.path_for(index);
        let json = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound { index }
            } else {
                LoadError::Io { path, source }
            }
        })?;
        LevelDesc::from_json(index, &json)
    }
}
