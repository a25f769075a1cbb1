//! Camera follow with a horizontal dead zone
//!
//! The camera position is the bottom-left corner of the viewport. Vertical
//! tracking is always on; horizontal tracking only kicks in once the player
//! strays more than `offset` units from the viewport center.

use glam::Vec2;

use crate::{approach, approach_vec};

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Bottom-left corner of the viewport in world units
    pub position: Vec2,
    /// Fixed viewport size
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport,
        }
    }

    /// World-space center of the viewport
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.position + self.viewport * 0.5
    }

    /// Camera position that would put `point` in the middle of the viewport
    #[inline]
    pub fn centered_on(&self, point: Vec2) -> Vec2 {
        point - self.viewport * 0.5
    }

    /// One interpolation step toward `target` on both axes
    pub fn move_to(&mut self, target: Vec2, factor: f32) {
        self.position = approach_vec(self.position, target, factor);
    }

    /// Per-frame follow. Horizontal movement is held while the player is
    /// inside the dead zone; vertical always follows.
    pub fn retarget(&mut self, player: Vec2, offset: f32, speed: f32) {
        let target = self.centered_on(player);
        if (player.x - self.center().x).abs() > offset {
            self.position.x = approach(self.position.x, target.x, speed);
        }
        self.position.y = approach(self.position.y, target.y, speed);
    }

    /// Fast follow used after a teleport; ignores the dead zone
    pub fn snap(&mut self, player: Vec2, speed: f32) {
        let target = self.centered_on(player);
        self.move_to(target, speed);
    }

    /// Center on `player` immediately
    pub fn snap_to(&mut self, player: Vec2) {
        self.position = self.centered_on(player);
    }
}

/// Convert a per-reference-frame interpolation factor to one covering
/// `frames` frames, so the follow rate does not depend on the step size
#[inline]
pub fn factor_for_frames(factor: f32, frames: f32) -> f32 {
    let factor = factor.clamp(0.0, 1.0);
    if factor >= 1.0 {
        return 1.0;
    }
    1.0 - (1.0 - factor).powf(frames.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn camera() -> Camera {
        let mut cam = Camera::new(Vec2::new(1000.0, 650.0));
        cam.snap_to(Vec2::new(500.0, 375.0));
        cam
    }

    #[test]
    fn test_snap_centers_player() {
        let cam = camera();
        assert_eq!(cam.position, Vec2::new(0.0, 50.0));
        assert_eq!(cam.center(), Vec2::new(500.0, 375.0));
    }

    #[test]
    fn test_dead_zone_holds_horizontal() {
        let mut cam = camera();
        cam.retarget(Vec2::new(580.0, 475.0), 100.0, 0.5);
        assert_eq!(cam.position.x, 0.0);
        // Vertical still follows
        assert!((cam.position.y - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_leaving_dead_zone_follows() {
        let mut cam = camera();
        cam.retarget(Vec2::new(700.0, 375.0), 100.0, 0.5);
        assert!((cam.position.x - 100.0).abs() < 1e-4);
        assert!((cam.position.y - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_speed_extremes() {
        let mut frozen = camera();
        frozen.retarget(Vec2::new(900.0, 900.0), 100.0, 0.0);
        assert_eq!(frozen.position, Vec2::new(0.0, 50.0));

        let mut instant = camera();
        instant.retarget(Vec2::new(900.0, 900.0), 100.0, 1.0);
        assert_eq!(instant.center(), Vec2::new(900.0, 900.0));
    }

    #[test]
    fn test_snap_ignores_dead_zone() {
        let mut cam = camera();
        cam.snap(Vec2::new(550.0, 375.0), 1.0);
        assert_eq!(cam.center(), Vec2::new(550.0, 375.0));
    }

    #[test]
    fn test_factor_for_frames() {
        assert!((factor_for_frames(0.1, 1.0) - 0.1).abs() < 1e-6);
        assert!((factor_for_frames(0.5, 2.0) - 0.75).abs() < 1e-6);
        assert_eq!(factor_for_frames(1.0, 0.5), 1.0);
        assert_eq!(factor_for_frames(0.3, 0.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_inside_dead_zone_never_moves_x(
            dx in -100.0f32..100.0,
            y in -500.0f32..500.0,
            speed in 0.0f32..1.0,
        ) {
            let mut cam = camera();
            let before = cam.position.x;
            cam.retarget(Vec2::new(500.0 + dx, y), 100.0, speed);
            prop_assert_eq!(cam.position.x, before);
        }

        #[test]
        fn prop_follow_never_overshoots(
            x in -2000.0f32..2000.0,
            y in -2000.0f32..2000.0,
            speed in 0.0f32..1.0,
        ) {
            let mut cam = camera();
            let start = cam.position;
            let target = cam.centered_on(Vec2::new(x, y));
            cam.retarget(Vec2::new(x, y), 100.0, speed);
            let lo = start.min(target) - Vec2::splat(1e-3);
            let hi = start.max(target) + Vec2::splat(1e-3);
            prop_assert!(cam.position.cmpge(lo).all() && cam.position.cmple(hi).all());
        }
    }
}
