//! Transient particle bursts
//!
//! Purely cosmetic: nothing here feeds back into the simulation. Particle
//! directions come from a seeded PCG stream so replays look identical.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::direction;
use crate::settings::QualityPreset;

/// What triggered a burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    PickupBurst,
    RealmChangeBurst,
    CheckpointBurst,
}

impl EffectKind {
    /// Seconds until the burst retires
    pub fn lifetime(&self) -> f32 {
        match self {
            EffectKind::PickupBurst => 0.5,
            EffectKind::RealmChangeBurst => 0.6,
            EffectKind::CheckpointBurst => 1.0,
        }
    }

    /// Particle count at Medium quality
    pub fn base_particles(&self) -> usize {
        match self {
            EffectKind::PickupBurst => 12,
            EffectKind::RealmChangeBurst => 24,
            EffectKind::CheckpointBurst => 32,
        }
    }

    /// Initial particle speed range (units/sec)
    fn speed_range(&self) -> (f32, f32) {
        match self {
            EffectKind::PickupBurst => (60.0, 140.0),
            EffectKind::RealmChangeBurst => (120.0, 260.0),
            EffectKind::CheckpointBurst => (40.0, 180.0),
        }
    }

    /// Downward pull on particles (units/sec²); negative floats upward
    fn gravity(&self) -> f32 {
        match self {
            EffectKind::PickupBurst => 300.0,
            EffectKind::RealmChangeBurst => 0.0,
            EffectKind::CheckpointBurst => -60.0,
        }
    }
}

/// A single burst particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, 0.0 when the owning effect retires
    pub life: f32,
    pub size: f32,
}

/// One burst: an origin plus its particles
#[derive(Debug, Clone)]
pub struct Effect {
    pub kind: EffectKind,
    pub origin: Vec2,
    /// Seconds since spawn
    pub age: f32,
    pub lifetime: f32,
    pub particles: Vec<Particle>,
}

impl Effect {
    pub fn advance(&mut self, dt: f32) {
        self.age += dt;
        let life = (1.0 - self.age / self.lifetime).max(0.0);
        let gravity = self.kind.gravity();
        for p in &mut self.particles {
            p.vel.y -= gravity * dt;
            p.vel *= 0.98;
            p.pos += p.vel * dt;
            p.life = life;
            p.size *= 0.995;
        }
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.age >= self.lifetime
    }
}

/// Owns every live effect
#[derive(Debug, Clone)]
pub struct EffectScheduler {
    effects: Vec<Effect>,
    rng: Pcg32,
    quality: QualityPreset,
}

impl EffectScheduler {
    pub fn new(seed: u64, quality: QualityPreset) -> Self {
        Self {
            effects: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            quality,
        }
    }

    /// Live particles across all effects
    pub fn particle_count(&self) -> usize {
        self.effects.iter().map(|e| e.particles.len()).sum()
    }

    /// Queue a burst at `origin`. The effect is always created; only its
    /// particle count is trimmed when the quality cap is reached.
    pub fn spawn(&mut self, kind: EffectKind, origin: Vec2) {
        let wanted = self.quality.particles_for(kind.base_particles());
        let room = self
            .quality
            .max_particles()
            .saturating_sub(self.particle_count());
        let count = wanted.min(room);

        let (min_speed, max_speed) = kind.speed_range();
        let particles = (0..count)
            .map(|_| {
                let theta = self.rng.random_range(0.0..std::f32::consts::TAU);
                let speed = self.rng.random_range(min_speed..max_speed);
                Particle {
                    pos: origin,
                    vel: direction(theta) * speed,
                    life: 1.0,
                    size: self.rng.random_range(2.0..5.0),
                }
            })
            .collect();

        self.effects.push(Effect {
            kind,
            origin,
            age: 0.0,
            lifetime: kind.lifetime(),
            particles,
        });
    }

    /// Age every effect by `dt` and drop the exhausted ones
    pub fn advance(&mut self, dt: f32) {
        for effect in &mut self.effects {
            effect.advance(dt);
        }
        self.effects.retain(|e| !e.is_exhausted());
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
