//! Per-frame overlap queries against pickups, hazards and checkpoints
//!
//! Runs after physics and camera. Every mutation is applied immediately so
//! the completion check later in the same tick sees it.

use super::camera::factor_for_frames;
use super::effects::{EffectKind, EffectScheduler};
use super::progress::LevelProgress;
use super::rect::Rect;
use super::state::{Checkpoint, GameEvent, GameState, Hazard, Pickup, RespawnCause};

/// Run every interaction query in order: pickups, world floor, hazards,
/// checkpoints.
pub fn resolve(state: &mut GameState, frames: f32) {
    let body = state.player.body;
    collect_pickups(
        &body,
        &mut state.level.pickups,
        &mut state.progress,
        &mut state.effects,
        &mut state.events,
    );

    if state.player.position().y < state.settings.world_floor_y {
        state.respawn(RespawnCause::FellOutOfWorld);
        let speed = factor_for_frames(state.settings.camera_snap_speed, frames);
        state.camera.snap(state.player.position(), speed);
    }

    if touches_hazard(&state.player.body, &state.level.hazards) {
        state.respawn(RespawnCause::Hazard);
    }

    let body = state.player.body;
    claim_checkpoints(
        &body,
        &mut state.level.checkpoints,
        &mut state.progress,
        &mut state.effects,
        &mut state.events,
    );
}

/// Collect every pickup overlapping `body`. Returns how many were taken.
pub fn collect_pickups(
    body: &Rect,
    pickups: &mut Vec<Pickup>,
    progress: &mut LevelProgress,
    effects: &mut EffectScheduler,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let mut taken = 0;
    for pickup in pickups.iter_mut().filter(|p| !p.collected) {
        if !body.overlaps(&pickup.rect) {
            continue;
        }
        pickup.collected = true;
        progress.record_pickup();
        effects.spawn(EffectKind::PickupBurst, pickup.rect.center);
        events.push(GameEvent::PickupCollected {
            position: pickup.rect.center,
        });
        taken += 1;
    }

    if taken > 0 {
        pickups.retain(|p| !p.collected);
        log::debug!(
            "Collected {} coin(s), {}/{}",
            taken,
            progress.collected,
            progress.total_pickups
        );
    }
    taken
}

pub fn touches_hazard(body: &Rect, hazards: &[Hazard]) -> bool {
    hazards.iter().any(|h| body.overlaps(&h.rect))
}

/// Move the respawn point to every touched checkpoint and claim the new ones.
/// Returns how many were claimed this call.
pub fn claim_checkpoints(
    body: &Rect,
    checkpoints: &mut [Checkpoint],
    progress: &mut LevelProgress,
    effects: &mut EffectScheduler,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let mut claimed = 0;
    for checkpoint in checkpoints.iter_mut() {
        if !body.overlaps(&checkpoint.rect) {
            continue;
        }
        progress.respawn_point = checkpoint.position();
        if checkpoint.claimed {
            continue;
        }
        checkpoint.claimed = true;
        effects.spawn(EffectKind::CheckpointBurst, checkpoint.position());
        events.push(GameEvent::CheckpointClaimed { id: checkpoint.id });
        log::debug!("Checkpoint {} claimed", checkpoint.id);
        claimed += 1;
    }
    claimed
}
