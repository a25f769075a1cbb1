//! Respawn point, counters and level completion

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Checkpoint, Level};
use crate::consts::SIM_DT;

/// Per-level counters; reset on every (re)load
#[derive(Debug, Clone, PartialEq)]
pub struct LevelProgress {
    /// Seconds spent in this level
    pub elapsed_secs: f32,
    pub collected: u32,
    pub total_pickups: u32,
    /// Where hazards and falls send the player
    pub respawn_point: Vec2,
    /// Set once this level's completion has been reported
    pub finished: bool,
}

impl LevelProgress {
    pub fn new(level: &Level) -> Self {
        Self {
            elapsed_secs: 0.0,
            collected: 0,
            total_pickups: level.total_pickups,
            respawn_point: level.initial_respawn(),
            finished: false,
        }
    }

    pub fn advance_time(&mut self, dt: f32) {
        self.elapsed_secs += dt.max(0.0);
    }

    pub fn record_pickup(&mut self) {
        self.collected += 1;
    }

    pub fn score(&self) -> u32 {
        compute_score(self.collected, self.elapsed_secs)
    }

    pub fn completion(&self, level_index: u32) -> LevelCompletion {
        LevelCompletion {
            level_index,
            score: self.score(),
            collected: self.collected,
            total_pickups: self.total_pickups,
            elapsed_secs: self.elapsed_secs,
        }
    }
}

/// Reported once per finished level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelCompletion {
    pub level_index: u32,
    /// `round(collected / elapsed_secs * 100)`
    pub score: u32,
    pub collected: u32,
    pub total_pickups: u32,
    pub elapsed_secs: f32,
}

/// Coins per second × 100, rounded. Elapsed time is floored at one frame so
/// a same-frame completion cannot divide by zero.
pub fn compute_score(collected: u32, elapsed_secs: f32) -> u32 {
    let elapsed = elapsed_secs.max(SIM_DT);
    (collected as f32 / elapsed * 100.0).round() as u32
}

/// Every checkpoint claimed. A level without checkpoints never completes.
pub fn is_level_complete(checkpoints: &[Checkpoint]) -> bool {
    !checkpoints.is_empty() && checkpoints.iter().all(|c| c.claimed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;

    fn checkpoints(claimed: &[bool]) -> Vec<Checkpoint> {
        claimed
            .iter()
            .enumerate()
            .map(|(i, &claimed)| Checkpoint {
                id: i as u32,
                rect: Rect::new(Vec2::new(i as f32 * 100.0, 81.0), Vec2::splat(18.0)),
                claimed,
            })
            .collect()
    }

    #[test]
    fn test_completion_needs_every_checkpoint() {
        assert!(!is_level_complete(&checkpoints(&[true, true, false])));
        assert!(is_level_complete(&checkpoints(&[true, true, true])));
        assert!(!is_level_complete(&[]));
    }

    #[test]
    fn test_score() {
        assert_eq!(compute_score(2, 4.0), 50);
        assert_eq!(compute_score(1, 3.0), 33);
        assert_eq!(compute_score(0, 10.0), 0);
        // Zero elapsed is floored at one frame
        assert_eq!(compute_score(1, 0.0), 6000);
    }
}
