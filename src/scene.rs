//! Draw list and HUD snapshot
//!
//! The renderer never touches simulation types directly: each frame it asks
//! for a flat, ordered list of colored rectangles plus a HUD summary.

use glam::Vec2;
use serde::Serialize;

use crate::consts::SIM_DT;
use crate::secs_to_ticks;
use crate::sim::{
    EnemyKind, GameEvent, GamePhase, GameState, PlatformKind, PowerUpKind, Rect, Theme,
};

/// What a scene item represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SceneKind {
    Platform,
    MovingPlatform,
    DisappearingPlatform,
    BouncingPlatform,
    Collectible,
    PowerUp(PowerUpKind),
    WalkingEnemy,
    FlyingEnemy,
    ShootingEnemy,
    Projectile,
    Player,
    Particle,
}

impl SceneKind {
    /// Fill color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            SceneKind::Platform => 0x8B5A2B,
            SceneKind::MovingPlatform => 0x4682B4,
            SceneKind::DisappearingPlatform => 0xB0A0D0,
            SceneKind::BouncingPlatform => 0x32CD32,
            SceneKind::Collectible => 0xFFD700,
            SceneKind::PowerUp(kind) => kind.color(),
            SceneKind::WalkingEnemy => 0xFF0000,
            SceneKind::FlyingEnemy => 0x9932CC,
            SceneKind::ShootingEnemy => 0x006400,
            SceneKind::Projectile => 0xFF0000,
            SceneKind::Player => 0x3366FF,
            // Particles carry their own color
            SceneKind::Particle => 0xFFFFFF,
        }
    }
}

/// One rectangle to draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneItem {
    pub kind: SceneKind,
    pub rect: Rect,
    pub color: u32,
    /// 0.0 (invisible) to 1.0
    pub alpha: f32,
    /// 1.0 facing right, -1.0 facing left
    pub facing: f32,
}

impl SceneItem {
    fn new(kind: SceneKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            color: kind.color(),
            alpha: 1.0,
            facing: 1.0,
        }
    }
}

/// Build the draw list, back to front
pub fn build_scene(state: &GameState) -> Vec<SceneItem> {
    let mut items = Vec::with_capacity(
        state.platforms.len()
            + state.collectibles.len()
            + state.power_ups.len()
            + state.enemies.len() * 2
            + state.particles.len()
            + 1,
    );
    let now = state.time_ticks;

    for platform in &state.platforms {
        let kind = match platform.kind {
            PlatformKind::Standard => SceneKind::Platform,
            PlatformKind::Moving { .. } => SceneKind::MovingPlatform,
            PlatformKind::Disappearing { .. } => SceneKind::DisappearingPlatform,
            PlatformKind::Bouncing { .. } => SceneKind::BouncingPlatform,
        };
        let alpha = platform.alpha(now);
        if alpha > 0.0 {
            items.push(SceneItem {
                alpha,
                ..SceneItem::new(kind, platform.rect)
            });
        }
    }

    // Coins bob gently
    let bob = (now as f32 * SIM_DT * 4.0).sin() * 3.0;
    for coin in state.collectibles.iter().filter(|c| c.active) {
        let mut rect = coin.bounds();
        rect.y += bob;
        items.push(SceneItem::new(SceneKind::Collectible, rect));
    }

    for power_up in &state.power_ups {
        let mut rect = power_up.bounds();
        rect.y -= bob;
        items.push(SceneItem::new(SceneKind::PowerUp(power_up.kind), rect));
    }

    for enemy in state.enemies.iter().filter(|e| e.active) {
        let kind = match enemy.kind {
            EnemyKind::Walking => SceneKind::WalkingEnemy,
            EnemyKind::Flying { .. } => SceneKind::FlyingEnemy,
            EnemyKind::Shooting { .. } => SceneKind::ShootingEnemy,
        };
        items.push(SceneItem {
            facing: enemy.direction,
            ..SceneItem::new(kind, enemy.bounds())
        });
        for projectile in enemy.projectiles().iter().filter(|p| p.active) {
            items.push(SceneItem::new(SceneKind::Projectile, projectile.bounds()));
        }
    }

    if let Some(player) = &state.player {
        // Blink while hurt or invincible
        let blinking = player.is_hurt(now) || player.is_invincible();
        let alpha = if blinking && (now / 6) % 2 == 0 { 0.4 } else { 1.0 };
        let color = if player.is_invincible() {
            PowerUpKind::Invincibility.color()
        } else {
            SceneKind::Player.color()
        };
        items.push(SceneItem {
            color,
            alpha,
            facing: player.direction,
            ..SceneItem::new(SceneKind::Player, player.bounds())
        });
    }

    for particle in &state.particles {
        items.push(SceneItem {
            color: particle.color,
            alpha: particle.life.clamp(0.0, 1.0),
            ..SceneItem::new(
                SceneKind::Particle,
                Rect::from_center(particle.pos, Vec2::splat(particle.size)),
            )
        });
    }

    items
}

/// Camera offset for the current screen shake
pub fn shake_offset(state: &GameState) -> Vec2 {
    if state.screen_shake <= 0.0 {
        return Vec2::ZERO;
    }
    let t = state.time_ticks as f32;
    let magnitude = state.screen_shake * 8.0;
    Vec2::new((t * 1.7).sin(), (t * 2.3).cos()) * magnitude
}

/// Seconds left on a timed effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectTimer {
    pub kind: PowerUpKind,
    pub secs_left: f32,
}

/// Everything the HUD shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub phase: GamePhase,
    pub score: u64,
    pub health: u8,
    pub max_health: u8,
    /// 1-based level number
    pub level: usize,
    pub level_name: String,
    pub theme: Theme,
    pub coins_left: usize,
    pub coins_required: usize,
    pub effects: Vec<EffectTimer>,
}

pub fn hud(state: &GameState) -> Hud {
    let now = state.time_ticks;
    let secs_left = |until: Option<u64>| {
        until.map(|until| until.saturating_sub(now) as f32 * SIM_DT)
    };

    let mut effects = Vec::new();
    if let Some(player) = &state.player {
        let timers = [
            (PowerUpKind::DoubleJump, player.effects.double_jump_until),
            (PowerUpKind::Speed, player.effects.speed_until),
            (PowerUpKind::Invincibility, player.effects.invincible_until),
        ];
        for (kind, until) in timers {
            if let Some(secs_left) = secs_left(until) {
                effects.push(EffectTimer { kind, secs_left });
            }
        }
    }

    let level = state.current_level();
    Hud {
        phase: state.phase,
        score: state.score,
        health: state.player.as_ref().map_or(0, |p| p.health),
        max_health: state.player.as_ref().map_or(0, |p| p.max_health),
        level: state.level_index + 1,
        level_name: level.map(|l| l.name.clone()).unwrap_or_default(),
        theme: level.map(|l| l.theme).unwrap_or_default(),
        coins_left: state.live_collectibles(),
        coins_required: state.required_collectibles,
        effects,
    }
}

/// Short-lived text shown over the play area after a notable event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub text: String,
    /// Tick at which the banner disappears
    pub until_tick: u64,
}

impl Banner {
    /// How long a banner stays up
    pub const SECS: f32 = 2.0;

    /// Banner for an event, if it deserves one
    pub fn for_event(event: &GameEvent, now: u64) -> Option<Self> {
        let text = match event {
            GameEvent::PowerUpCollected { kind } => kind.message().to_string(),
            GameEvent::EnemyStomped { bonus } => format!("Stomp! +{bonus}"),
            GameEvent::LevelComplete { level } => format!("Level {} complete!", level + 1),
            _ => return None,
        };
        Some(Self {
            text,
            until_tick: now + secs_to_ticks(Self::SECS),
        })
    }

    pub fn is_visible(&self, now: u64) -> bool {
        now < self.until_tick
    }
}
