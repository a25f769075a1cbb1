//! Axis-aligned rectangle geometry
//!
//! Every body in a level (walls, coins, hazards, checkpoints and the player
//! itself) is a rectangle stored as center + half-extents.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Center point in world units
    pub center: Vec2,
    /// Half width / half height
    pub half_extents: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Build from a bottom-left corner and a full size
    pub fn from_corner(min: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(min + half, half)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.half_extents.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.half_extents.y
    }

    /// Finite center and strictly positive, finite extents
    pub fn is_well_formed(&self) -> bool {
        self.center.is_finite()
            && self.half_extents.is_finite()
            && self.half_extents.x > 0.0
            && self.half_extents.y > 0.0
    }

    /// Same extents, different center
    #[inline]
    pub fn at(&self, center: Vec2) -> Self {
        Self::new(center, self.half_extents)
    }

    /// Strict overlap: rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents;
        d.x < reach.x && d.y < reach.y
    }

    /// Overlap depth on each axis (non-positive components mean separated)
    pub fn penetration(&self, other: &Rect) -> Vec2 {
        let d = (self.center - other.center).abs();
        self.half_extents + other.half_extents - d
    }

    /// Area of the intersection, zero when separated
    pub fn overlap_area(&self, other: &Rect) -> f32 {
        let p = self.penetration(other).max(Vec2::ZERO);
        p.x * p.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Rect::new(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Rect::new(Vec2::new(20.0, 0.0), Vec2::splat(10.0));
        let inside = Rect::new(Vec2::new(19.0, 5.0), Vec2::splat(10.0));

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_penetration_and_area() {
        let a = Rect::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Rect::new(Vec2::new(15.0, 18.0), Vec2::splat(10.0));

        let p = a.penetration(&b);
        assert!((p.x - 5.0).abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
        assert!((a.overlap_area(&b) - 10.0).abs() < 1e-5);

        let far = Rect::new(Vec2::new(100.0, 0.0), Vec2::splat(10.0));
        assert_eq!(a.overlap_area(&far), 0.0);
    }

    #[test]
    fn test_well_formed() {
        assert!(Rect::new(Vec2::ZERO, Vec2::ONE).is_well_formed());
        assert!(!Rect::new(Vec2::ZERO, Vec2::new(0.0, 1.0)).is_well_formed());
        assert!(!Rect::new(Vec2::ZERO, Vec2::new(1.0, -1.0)).is_well_formed());
        assert!(!Rect::new(Vec2::new(f32::NAN, 0.0), Vec2::ONE).is_well_formed());
    }

    #[test]
    fn test_from_corner() {
        let r = Rect::from_corner(Vec2::new(0.0, 0.0), Vec2::new(1000.0, 63.0));
        assert_eq!(r.top(), 63.0);
        assert_eq!(r.bottom(), 0.0);
        assert_eq!(r.center, Vec2::new(500.0, 31.5));
    }
}
