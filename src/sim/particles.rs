//! Cosmetic particle bursts
//!
//! Particles never feed back into gameplay. They draw from the run's seeded
//! RNG so a replay of the same inputs produces the same bursts.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    /// 1.0 at spawn, removed at 0.0
    pub life: f32,
    /// Life lost per second
    pub decay: f32,
    pub size: f32,
}

/// Preset burst shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Burst {
    /// Gold sparkle when a coin is picked up
    Collect,
    /// Enemy stomped or projectile exploded
    Explosion,
    /// Puff under the feet on landing
    Dust,
    /// Celebration when a level is cleared
    LevelComplete,
}

struct BurstParams {
    count: usize,
    colors: &'static [u32],
    speed: f32,
    speed_jitter: f32,
    /// `None` for a full circle
    angle: Option<f32>,
    spread: f32,
    lifetime: f32,
    size: f32,
}

impl Burst {
    fn params(self) -> BurstParams {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            Burst::Collect => BurstParams {
                count: 15,
                colors: &[0xFFD700],
                speed: 120.0,
                speed_jitter: 60.0,
                angle: None,
                spread: PI,
                lifetime: 0.5,
                size: 5.0,
            },
            Burst::Explosion => BurstParams {
                count: 20,
                colors: &[0xFF0000, 0xFF7F00, 0xFFFF00, 0xFFFF33],
                speed: 180.0,
                speed_jitter: 120.0,
                angle: None,
                spread: PI,
                lifetime: 0.66,
                size: 10.0,
            },
            Burst::Dust => BurstParams {
                count: 5,
                colors: &[0xCCCCCC],
                speed: 60.0,
                speed_jitter: 30.0,
                // Upward (screen y grows down)
                angle: Some(-FRAC_PI_2),
                spread: PI / 8.0,
                lifetime: 0.33,
                size: 3.0,
            },
            Burst::LevelComplete => BurstParams {
                count: 50,
                colors: &[0xFF0000, 0x00FF00, 0x0000FF, 0xFFFF00, 0xFF00FF, 0x00FFFF],
                speed: 180.0,
                speed_jitter: 120.0,
                angle: None,
                spread: PI,
                lifetime: 1.5,
                size: 8.0,
            },
        }
    }
}

/// Spawn a burst at `at`, never growing the pool past `max`
pub fn emit(particles: &mut Vec<Particle>, rng: &mut Pcg32, burst: Burst, at: Vec2, max: usize) {
    let params = burst.params();
    let room = max.saturating_sub(particles.len());

    for _ in 0..params.count.min(room) {
        let base = params.angle.unwrap_or(0.0);
        let angle = base + rng.random_range(-1.0f32..=1.0) * params.spread;
        let speed = params.speed + rng.random_range(-1.0f32..=1.0) * params.speed_jitter;
        let lifetime = params.lifetime * rng.random_range(0.7f32..=1.3);
        let color = params.colors[rng.random_range(0..params.colors.len())];

        particles.push(Particle {
            pos: at,
            vel: Vec2::from_angle(angle) * speed,
            color,
            life: 1.0,
            decay: 1.0 / lifetime,
            size: params.size,
        });
    }
}

/// Move and age particles, dropping dead ones
pub fn update(particles: &mut Vec<Particle>, dt: f32) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.life -= particle.decay * dt;
        particle.size *= 0.98;
    }
    particles.retain(|p| p.life > 0.0);
}
