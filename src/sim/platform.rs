//! Platforms: standard, moving, disappearing and bouncing
//!
//! All variants share `update` and `check_collision`; the kind only changes
//! what happens around a landing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::lands_on;
use super::player::Player;
use super::rect::Rect;
use crate::consts::MOVING_PLATFORM_RATE;

/// Lifecycle of a disappearing platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FadePhase {
    /// Solid, waiting to be stood on
    Active,
    /// Stood on; starts fading after the touch delay
    Touched,
    /// Still solid, alpha ramps down
    Fading,
    /// Not collidable until the reappear delay passes
    Invisible,
}

/// Disappearing platform timings, in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadeTiming {
    pub touch_ticks: u64,
    pub fade_ticks: u64,
    pub reappear_ticks: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlatformKind {
    Standard,
    /// Sinusoidal oscillation around `origin` on the enabled axes
    Moving {
        origin: Vec2,
        distance: f32,
        speed: f32,
        horizontal: bool,
        vertical: bool,
        elapsed: f32,
    },
    Disappearing {
        phase: FadePhase,
        /// Tick at which the current phase started
        since: u64,
        timing: FadeTiming,
    },
    /// Launches the player upward on landing
    Bouncing { force: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub rect: Rect,
    pub kind: PlatformKind,
    /// Displacement during the last update (used to carry riders)
    #[serde(skip)]
    pub delta: Vec2,
}

impl Platform {
    pub fn new(id: u32, rect: Rect, kind: PlatformKind) -> Self {
        Self {
            id,
            rect,
            kind,
            delta: Vec2::ZERO,
        }
    }

    /// Advance movement and fade timers
    pub fn update(&mut self, dt: f32, now: u64) {
        self.delta = Vec2::ZERO;
        match &mut self.kind {
            PlatformKind::Standard | PlatformKind::Bouncing { .. } => {}
            PlatformKind::Moving {
                origin,
                distance,
                speed,
                horizontal,
                vertical,
                elapsed,
            } => {
                *elapsed += dt;
                let factor = (*elapsed * MOVING_PLATFORM_RATE * *speed).sin();
                let before = Vec2::new(self.rect.x, self.rect.y);
                if *horizontal {
                    self.rect.x = origin.x + factor * *distance;
                }
                if *vertical {
                    self.rect.y = origin.y + factor * *distance;
                }
                self.delta = Vec2::new(self.rect.x, self.rect.y) - before;
            }
            PlatformKind::Disappearing {
                phase,
                since,
                timing,
            } => {
                let elapsed = now.saturating_sub(*since);
                let next = match *phase {
                    FadePhase::Touched if elapsed >= timing.touch_ticks => Some(FadePhase::Fading),
                    FadePhase::Fading if elapsed >= timing.fade_ticks => Some(FadePhase::Invisible),
                    FadePhase::Invisible if elapsed >= timing.reappear_ticks => {
                        Some(FadePhase::Active)
                    }
                    _ => None,
                };
                if let Some(next) = next {
                    log::debug!("Platform {} {:?} -> {:?}", self.id, phase, next);
                    *phase = next;
                    *since = now;
                }
            }
        }
    }

    /// Whether the player can currently stand on this platform
    pub fn is_solid(&self) -> bool {
        !matches!(
            self.kind,
            PlatformKind::Disappearing {
                phase: FadePhase::Invisible,
                ..
            }
        )
    }

    /// Render opacity (only disappearing platforms fade)
    pub fn alpha(&self, now: u64) -> f32 {
        match &self.kind {
            PlatformKind::Disappearing {
                phase: FadePhase::Fading,
                since,
                timing,
            } => {
                let progress = now.saturating_sub(*since) as f32 / timing.fade_ticks.max(1) as f32;
                (1.0 - progress).clamp(0.0, 1.0)
            }
            PlatformKind::Disappearing {
                phase: FadePhase::Invisible,
                ..
            } => 0.0,
            _ => 1.0,
        }
    }

    /// Land the player on this platform if it is falling onto it.
    /// Returns true on landing.
    pub fn check_collision(&mut self, player: &mut Player, prev_bottom: f32, now: u64) -> bool {
        if !self.is_solid() || !lands_on(&player.bounds(), prev_bottom, player.vel.y, &self.rect) {
            return false;
        }

        player.land_on(self.rect.top());

        match &mut self.kind {
            PlatformKind::Standard => {}
            PlatformKind::Moving { horizontal, .. } => {
                if *horizontal {
                    player.pos.x += self.delta.x;
                }
            }
            PlatformKind::Disappearing { phase, since, .. } => {
                if *phase == FadePhase::Active {
                    *phase = FadePhase::Touched;
                    *since = now;
                }
            }
            PlatformKind::Bouncing { force } => {
                player.vel.y = -*force;
                player.on_ground = false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn player_above(rect: &Rect) -> Player {
        // Bottom edge 2px into the platform
        let mut p = Player::new(Vec2::new(
            rect.x + rect.w / 2.0,
            rect.y + 2.0 - PLAYER_HEIGHT / 2.0,
        ));
        p.vel.y = 60.0;
        p
    }

    fn fade_timing() -> FadeTiming {
        FadeTiming {
            touch_ticks: 30,
            fade_ticks: 60,
            reappear_ticks: 180,
        }
    }

    #[test]
    fn test_standard_landing() {
        let rect = Rect::new(100.0, 400.0, 100.0, 20.0);
        let mut platform = Platform::new(1, rect, PlatformKind::Standard);
        let mut player = player_above(&rect);
        let prev = player.bounds().bottom() - 1.0;

        assert!(platform.check_collision(&mut player, prev, 0));
        assert_eq!(player.vel.y, 0.0);
        assert!(player.on_ground);
        assert_eq!(player.bounds().bottom(), 400.0);
    }

    #[test]
    fn test_bouncing_launches_player() {
        let rect = Rect::new(100.0, 400.0, 100.0, 20.0);
        let mut platform = Platform::new(1, rect, PlatformKind::Bouncing { force: BOUNCE_FORCE });
        let mut player = player_above(&rect);
        let prev = player.bounds().bottom() - 1.0;

        assert!(platform.check_collision(&mut player, prev, 0));
        assert_eq!(player.vel.y, -BOUNCE_FORCE);
        assert!(!player.on_ground);
    }

    #[test]
    fn test_moving_platform_oscillates() {
        let origin = Vec2::new(200.0, 300.0);
        let mut platform = Platform::new(
            1,
            Rect::new(origin.x, origin.y, 100.0, 20.0),
            PlatformKind::Moving {
                origin,
                distance: 50.0,
                speed: 1.0,
                horizontal: true,
                vertical: false,
                elapsed: 0.0,
            },
        );

        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        for _ in 0..240 {
            platform.update(SIM_DT, 0);
            min_x = min_x.min(platform.rect.x);
            max_x = max_x.max(platform.rect.x);
            assert_eq!(platform.rect.y, origin.y);
        }
        assert!(min_x >= 150.0 - 1e-3 && max_x <= 250.0 + 1e-3);
        assert!(max_x - min_x > 90.0);
    }

    #[test]
    fn test_moving_platform_carries_rider() {
        let origin = Vec2::new(200.0, 300.0);
        let mut platform = Platform::new(
            1,
            Rect::new(origin.x, origin.y, 100.0, 20.0),
            PlatformKind::Moving {
                origin,
                distance: 50.0,
                speed: 1.0,
                horizontal: true,
                vertical: false,
                elapsed: 0.0,
            },
        );
        platform.update(SIM_DT, 1);
        assert!(platform.delta.x > 0.0);

        let mut player = player_above(&platform.rect);
        let x_before = player.pos.x;
        let prev = player.bounds().bottom() - 1.0;
        assert!(platform.check_collision(&mut player, prev, 1));
        assert!((player.pos.x - (x_before + platform.delta.x)).abs() < 1e-4);
    }

    #[test]
    fn test_disappearing_cycle() {
        let rect = Rect::new(100.0, 400.0, 100.0, 20.0);
        let mut platform = Platform::new(
            1,
            rect,
            PlatformKind::Disappearing {
                phase: FadePhase::Active,
                since: 0,
                timing: fade_timing(),
            },
        );
        let phase = |p: &Platform| match p.kind {
            PlatformKind::Disappearing { phase, .. } => phase,
            _ => unreachable!(),
        };

        // Untouched platforms never fade
        platform.update(SIM_DT, 500);
        assert_eq!(phase(&platform), FadePhase::Active);

        let mut player = player_above(&rect);
        let prev = player.bounds().bottom() - 1.0;
        assert!(platform.check_collision(&mut player, prev, 1000));
        assert_eq!(phase(&platform), FadePhase::Touched);

        platform.update(SIM_DT, 1029);
        assert_eq!(phase(&platform), FadePhase::Touched);
        platform.update(SIM_DT, 1030);
        assert_eq!(phase(&platform), FadePhase::Fading);
        assert!(platform.is_solid());
        assert!((platform.alpha(1060) - 0.5).abs() < 1e-4);

        platform.update(SIM_DT, 1090);
        assert_eq!(phase(&platform), FadePhase::Invisible);
        assert!(!platform.is_solid());
        assert_eq!(platform.alpha(1090), 0.0);

        // Non-collidable while invisible
        let mut player = player_above(&rect);
        let prev = player.bounds().bottom() - 1.0;
        assert!(!platform.check_collision(&mut player, prev, 1100));

        platform.update(SIM_DT, 1270);
        assert_eq!(phase(&platform), FadePhase::Active);
        assert!(platform.is_solid());
    }
}
