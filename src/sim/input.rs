//! Discrete input events and held-key state
//!
//! Events queued by the platform layer are consumed once per tick, before
//! physics. This pre-step is the only writer of input-derived velocity.

use super::collision::can_jump;
use super::rect::Rect;
use super::state::Player;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Jump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Key),
    Released(Key),
}

/// Held state for the horizontal keys
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub left_held: bool,
    pub right_held: bool,
}

impl InputState {
    /// -1, 0 or 1. Holding both directions cancels out.
    pub fn horizontal_axis(&self) -> f32 {
        match (self.left_held, self.right_held) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// Consume this tick's events and set the player's velocity from them.
    ///
    /// A jump press only takes effect if the player can jump at the moment
    /// of the press. Returns whether a jump started.
    pub fn apply(
        &mut self,
        events: &[InputEvent],
        player: &mut Player,
        walls: &[Rect],
        settings: &Settings,
    ) -> bool {
        let tuning = settings.realm_tuning(player.realm);
        let mut jumped = false;

        for event in events {
            match *event {
                InputEvent::Pressed(Key::Left) => self.left_held = true,
                InputEvent::Released(Key::Left) => self.left_held = false,
                InputEvent::Pressed(Key::Right) => self.right_held = true,
                InputEvent::Released(Key::Right) => self.right_held = false,
                InputEvent::Pressed(Key::Jump) => {
                    if can_jump(player, walls) {
                        player.vel.y = tuning.jump_speed;
                        player.jumping = true;
                        jumped = true;
                    }
                }
                InputEvent::Released(Key::Jump) => {}
            }
        }

        player.vel.x = self.horizontal_axis() * settings.movement_speed;
        player.face_toward(player.vel.x);
        jumped
    }
}
