//! Per-frame update
//!
//! One `tick` runs the phases in a fixed order: input, physics, camera,
//! interactions, realm, completion, effects.

use super::camera::factor_for_frames;
use super::collision::{Contact, can_jump, integrate};
use super::input::{InputEvent, Key};
use super::interaction;
use super::realm::update_realm;
use super::state::{GameEvent, GameState};
use crate::consts::SIM_DT;
use crate::level::{LevelSource, LoadError};

/// Input events delivered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn press(key: Key) -> Self {
        Self {
            events: vec![InputEvent::Pressed(key)],
        }
    }

    pub fn release(key: Key) -> Self {
        Self {
            events: vec![InputEvent::Released(key)],
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Advance the game by `dt` seconds.
///
/// Only a failed level reload after completion returns an error. The
/// finished level is left intact and every other phase still runs.
pub fn tick(
    state: &mut GameState,
    levels: &dyn LevelSource,
    input: &TickInput,
    dt: f32,
) -> Result<(), LoadError> {
    let frames = dt / SIM_DT;
    state.time_ticks += 1;
    state.progress.advance_time(dt);

    // Input
    state.input.apply(
        &input.events,
        &mut state.player,
        &state.level.walls,
        &state.settings,
    );

    // Physics
    let fall_speed = state.realm_tuning().fall_speed;
    let contacts = integrate(
        &mut state.player,
        &state.level.walls,
        state.settings.gravity,
        fall_speed,
        frames,
    );
    if contacts.iter().any(Contact::is_landing) {
        state.player.jumping = false;
    }

    // Camera
    let speed = factor_for_frames(state.settings.camera_scroll_speed, frames);
    state.camera.retarget(
        state.player.position(),
        state.settings.camera_offset,
        speed,
    );

    // Pickups, falls, hazards, checkpoints
    interaction::resolve(state, frames);

    // Realm, then pose
    if let Some((from, to)) = update_realm(&mut state.player, &state.camera, &mut state.effects) {
        log::debug!("Realm {} -> {}", from.as_str(), to.as_str());
        state.events.push(GameEvent::RealmChanged { from, to });
    }
    let grounded = can_jump(&state.player, &state.level.walls);
    state.player.update_pose(grounded);

    // Completion is reported once; the reload is retried until it succeeds
    if !state.progress.finished && state.is_level_complete() {
        let completion = state.completion();
        log::info!(
            "Level {} complete: score {} ({}/{} coins in {:.1}s)",
            completion.level_index,
            completion.score,
            completion.collected,
            completion.total_pickups,
            completion.elapsed_secs
        );
        state.events.push(GameEvent::LevelCompleted(completion));
        state.progress.finished = true;
    }
    let reload = if state.progress.finished {
        let next = state.level_index + 1;
        state.load_level(levels, next)
    } else {
        Ok(())
    };

    // Effects
    state.effects.advance(dt);
    reload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{CheckpointDesc, LevelCatalog, LevelDesc};
    use crate::settings::Settings;
    use crate::sim::effects::EffectKind;
    use crate::sim::realm::{Pose, Realm};
    use crate::sim::rect::Rect;
    use glam::Vec2;

    fn floor() -> Rect {
        Rect::from_corner(Vec2::ZERO, Vec2::new(1000.0, 63.0))
    }

    fn flat_level(checkpoint_xs: &[f32]) -> LevelDesc {
        LevelDesc {
            name: "flat".to_string(),
            player_start: Vec2::new(500.0, 375.0),
            walls: vec![floor()],
            coins: Vec::new(),
            hazards: Vec::new(),
            checkpoints: checkpoint_xs
                .iter()
                .enumerate()
                .map(|(i, &x)| CheckpointDesc {
                    id: i as u32,
                    rect: Rect::new(Vec2::new(x, 81.0), Vec2::splat(18.0)),
                })
                .collect(),
            start_checkpoint: None,
        }
    }

    fn run_until_landed(state: &mut GameState, levels: &LevelCatalog) {
        let idle = TickInput::default();
        for _ in 0..120 {
            tick(state, levels, &idle, SIM_DT).expect("tick");
            // Touching the floor exactly still leaves downward speed; the
            // next frame's resolution zeroes it
            if state.player.vel.y == 0.0 && can_jump(&state.player, &state.level.walls) {
                return;
            }
        }
        panic!("player never landed");
    }

    #[test]
    fn test_player_lands_on_floor() {
        let levels = LevelCatalog::new(vec![flat_level(&[])]);
        let mut state = GameState::new(Settings::default(), &levels, 0).expect("level");

        run_until_landed(&mut state, &levels);
        assert_eq!(state.player.vel.y, 0.0);
        assert!((state.player.body.bottom() - 63.0).abs() < 1e-3);

        // One more frame: still resting, still able to jump
        tick(&mut state, &levels, &TickInput::default(), SIM_DT).expect("tick");
        assert_eq!(state.player.vel.y, 0.0);
        assert!(can_jump(&state.player, &state.level.walls));
        assert_eq!(state.player.pose, Pose::Idle);
    }

    #[test]
    fn test_jump_from_ground() {
        let levels = LevelCatalog::new(vec![flat_level(&[])]);
        let mut state = GameState::new(Settings::default(), &levels, 0).expect("level");
        run_until_landed(&mut state, &levels);
        let rest_y = state.player.position().y;

        tick(&mut state, &levels, &TickInput::press(Key::Jump), SIM_DT).expect("tick");
        assert!(state.player.jumping);
        assert_eq!(state.player.vel.y, 9.0);
        assert!((state.player.position().y - (rest_y + 9.0)).abs() < 1e-3);
        assert_eq!(state.player.pose, Pose::Jump);

        // Pressing again mid-air does nothing
        tick(&mut state, &levels, &TickInput::press(Key::Jump), SIM_DT).expect("tick");
        assert_eq!(state.player.vel.y, 8.0);
    }

    #[test]
    fn test_walking_right_enters_bad_realm() {
        let levels = LevelCatalog::new(vec![flat_level(&[])]);
        let mut state = GameState::new(Settings::default(), &levels, 0).expect("level");
        run_until_landed(&mut state, &levels);
        state.drain_events();
        let realm_changes = |events: &[GameEvent]| {
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::RealmChanged { .. }))
                .count()
        };
        let mut changes = 0;

        tick(&mut state, &levels, &TickInput::press(Key::Right), SIM_DT).expect("tick");
        assert_eq!(state.player.realm, Realm::Bad);
        assert_eq!(state.sprite_key(), "images/tile_0110.png");
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::RealmChanged {
                from: Realm::Good,
                to: Realm::Bad
            }]
        );
        changes += realm_changes(&events);

        // Keep walking: no further transitions
        for _ in 0..10 {
            tick(&mut state, &levels, &TickInput::default(), SIM_DT).expect("tick");
        }
        changes += realm_changes(&state.drain_events());
        assert_eq!(changes, 1);

        // Turn around at x=555 and walk back past the midpoint at x=500
        let mut turn = TickInput::release(Key::Right);
        turn.push(InputEvent::Pressed(Key::Left));
        tick(&mut state, &levels, &turn, SIM_DT).expect("tick");
        for _ in 0..30 {
            tick(&mut state, &levels, &TickInput::default(), SIM_DT).expect("tick");
        }
        changes += realm_changes(&state.drain_events());
        assert_eq!(state.player.realm, Realm::Good);
        assert_eq!(changes, 2);

        // The first burst has expired; the second one (21 frames old) is live
        let bursts = state
            .effects
            .iter()
            .filter(|e| e.kind == EffectKind::RealmChangeBurst)
            .count();
        assert_eq!(bursts, 1);
    }

    #[test]
    fn test_last_checkpoint_completes_level_once() {
        let levels = LevelCatalog::new(vec![
            flat_level(&[100.0, 300.0, 900.0]),
            flat_level(&[100.0, 300.0, 900.0]),
        ]);
        let mut state = GameState::new(Settings::default(), &levels, 0).expect("level");
        state.level.checkpoints[0].claimed = true;
        state.level.checkpoints[1].claimed = true;
        state.progress.collected = 3;
        assert!(!state.is_level_complete());

        // Stand on the last checkpoint
        state.player.body.center = Vec2::new(900.0, 81.0);
        state.drain_events();
        tick(&mut state, &levels, &TickInput::default(), SIM_DT).expect("tick");

        let events = state.drain_events();
        let completions: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::LevelCompleted(c) => Some(c.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].level_index, 0);
        assert_eq!(completions[0].score, 18000);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::LevelLoaded { .. }))
                .count(),
            1
        );

        // Fresh level 1
        assert_eq!(state.level_index, 1);
        assert!(state.level.checkpoints.iter().all(|c| !c.claimed));
        assert_eq!(state.progress.collected, 0);
        assert_eq!(state.progress.elapsed_secs, 0.0);
        assert_eq!(state.player.position(), Vec2::new(500.0, 375.0));
        assert_eq!(state.player.realm, Realm::Good);
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert!(!state.is_level_complete());
    }

    #[test]
    fn test_missing_next_level_is_fatal_and_keeps_level() {
        let levels = LevelCatalog::new(vec![flat_level(&[900.0])]);
        let mut state = GameState::new(Settings::default(), &levels, 0).expect("level");
        state.player.body.center = Vec2::new(900.0, 81.0);

        let result = tick(&mut state, &levels, &TickInput::default(), SIM_DT);
        assert!(matches!(result, Err(LoadError::NotFound { index: 1 })));
        assert_eq!(state.level_index, 0);
        assert_eq!(state.level.name, "flat");
    }

    #[test]
    fn test_completion_reported_once_when_reload_fails() {
        let levels = LevelCatalog::new(vec![flat_level(&[900.0])]);
        let mut state = GameState::new(Settings::default(), &levels, 0).expect("level");
        state.player.body.center = Vec2::new(900.0, 81.0);
        state.drain_events();

        let mut completions = 0;
        for _ in 0..3 {
            let result = tick(&mut state, &levels, &TickInput::default(), SIM_DT);
            assert!(matches!(result, Err(LoadError::NotFound { index: 1 })));
            completions += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::LevelCompleted(_)))
                .count();
        }
        assert_eq!(completions, 1);
        assert!(state.progress.finished);

        // Effects keep ageing: the checkpoint burst is three frames old
        let ages: Vec<f32> = state
            .effects
            .iter()
            .filter(|e| e.kind == EffectKind::CheckpointBurst)
            .map(|e| e.age)
            .collect();
        assert_eq!(ages.len(), 1);
        assert!((ages[0] - 3.0 * SIM_DT).abs() < 1e-5);
    }

    #[test]
    fn test_determinism() {
        let levels = LevelCatalog::builtin().expect("builtin levels");
        let mut state1 = GameState::new(Settings::default(), &levels, 0).expect("level");
        let mut state2 = GameState::new(Settings::default(), &levels, 0).expect("level");

        let inputs = [
            TickInput::press(Key::Right),
            TickInput::default(),
            TickInput::press(Key::Jump),
            TickInput::default(),
            TickInput::release(Key::Right),
            TickInput::press(Key::Left),
        ];

        for _ in 0..20 {
            for input in &inputs {
                tick(&mut state1, &levels, input, SIM_DT).expect("tick");
                tick(&mut state2, &levels, input, SIM_DT).expect("tick");
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.player.position(), state2.player.position());
        assert_eq!(state1.camera.position, state2.camera.position);
        assert_eq!(state1.effects.len(), state2.effects.len());
        let p1: Vec<Vec2> = state1.effects.iter().flat_map(|e| e.particles.iter().map(|p| p.pos)).collect();
        let p2: Vec<Vec2> = state2.effects.iter().flat_map(|e| e.particles.iter().map(|p| p.pos)).collect();
        assert_eq!(p1, p2);
    }

    #[test]
    fn test_elapsed_time_accumulates() {
        let levels = LevelCatalog::new(vec![flat_level(&[])]);
        let mut state = GameState::new(Settings::default(), &levels, 0).expect("level");
        for _ in 0..60 {
            tick(&mut state, &levels, &TickInput::default(), SIM_DT).expect("tick");
        }
        assert!((state.progress.elapsed_secs - 1.0).abs() < 1e-3);
        assert_eq!(state.time_ticks, 60);
    }
}
