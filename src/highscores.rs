//! Level-completion score sinks
//!
//! The simulation reports every finished level as a `LevelCompletion`; a sink
//! decides what to do with it. `HighScores` keeps the best 10 and can be
//! persisted as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::LevelCompletion;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Receives level index and score on each completion
pub trait ScoreSink {
    fn record(&mut self, completion: &LevelCompletion);
}

/// Writes completions to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ScoreSink for LogSink {
    fn record(&mut self, completion: &LevelCompletion) {
        log::info!("{}", describe(completion));
    }
}

/// One-line report; level indices are 0-based everywhere
fn describe(completion: &LevelCompletion) -> String {
    format!(
        "Level {} finished with score {} ({}/{} coins, {:.2}s)",
        completion.level_index,
        completion.score,
        completion.collected,
        completion.total_pickups,
        completion.elapsed_secs
    )
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    /// Level index the score was set on
    pub level: u32,
    pub collected: u32,
    pub elapsed_secs: f32,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a completion to the leaderboard (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add(&mut self, completion: &LevelCompletion) -> Option<usize> {
        let score = completion.score;
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            level: completion.level_index,
            collected: completion.collected,
            elapsed_secs: completion.elapsed_secs,
        };

        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from a JSON file; a missing or unreadable file starts fresh
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt high scores at {}: {}", path.display(), e);
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

impl ScoreSink for HighScores {
    fn record(&mut self, completion: &LevelCompletion) {
        if let Some(rank) = self.add(completion) {
            log::info!("New high score #{}: {}", rank, completion.score);
        }
    }
}
