//! The player character

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pickup::PowerUpKind;
use super::rect::Rect;
use super::tick::TickInput;
use crate::consts::*;
use crate::secs_to_ticks;

/// Timed power-up effects, stored as the tick at which each one expires
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub double_jump_until: Option<u64>,
    pub speed_until: Option<u64>,
    pub invincible_until: Option<u64>,
}

impl ActiveEffects {
    /// Drop every effect whose expiry tick has been reached
    pub fn expire(&mut self, now: u64) {
        for slot in [
            &mut self.double_jump_until,
            &mut self.speed_until,
            &mut self.invincible_until,
        ] {
            if slot.is_some_and(|until| now >= until) {
                *slot = None;
            }
        }
    }
}

/// Result of applying damage to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invincible (power-up or post-hit grace period)
    Ignored,
    Hurt,
    Died,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center of the bounding box
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub health: u8,
    pub max_health: u8,
    pub on_ground: bool,
    pub has_double_jumped: bool,
    /// Facing: 1.0 right, -1.0 left
    pub direction: f32,
    /// Set when a jump press is consumed, cleared when the key is released
    pub jump_latched: bool,
    /// Post-hit invincibility expiry tick
    pub hurt_until: Option<u64>,
    /// Knockback window expiry tick
    pub knockback_until: Option<u64>,
    pub effects: ActiveEffects,
}

impl Player {
    pub fn new(start: Vec2) -> Self {
        Self {
            pos: start,
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            on_ground: false,
            has_double_jumped: false,
            direction: 1.0,
            jump_latched: false,
            hurt_until: None,
            knockback_until: None,
            effects: ActiveEffects::default(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    /// Move to a spawn point and clear motion state (health and effects survive)
    pub fn respawn(&mut self, start: Vec2) {
        self.pos = start;
        self.vel = Vec2::ZERO;
        self.on_ground = false;
        self.has_double_jumped = false;
        self.knockback_until = None;
    }

    pub fn can_double_jump(&self) -> bool {
        self.effects.double_jump_until.is_some()
    }

    /// Invincible from a power-up
    pub fn is_invincible(&self) -> bool {
        self.effects.invincible_until.is_some()
    }

    pub fn is_hurt(&self, now: u64) -> bool {
        self.hurt_until.is_some_and(|until| now < until)
    }

    /// Horizontal run speed, including the speed boost
    pub fn run_speed(&self) -> f32 {
        if self.effects.speed_until.is_some() {
            PLAYER_SPEED * SPEED_BOOST
        } else {
            PLAYER_SPEED
        }
    }

    /// Expire timed effects and grace windows
    pub fn expire_effects(&mut self, now: u64) {
        self.effects.expire(now);
        if self.hurt_until.is_some_and(|until| now >= until) {
            self.hurt_until = None;
        }
        if self.knockback_until.is_some_and(|until| now >= until) {
            self.knockback_until = None;
        }
    }

    /// Apply held keys: horizontal velocity is set directly, jumps need a fresh press
    pub fn apply_input(&mut self, input: &TickInput) {
        if self.knockback_until.is_none() {
            let speed = self.run_speed();
            self.vel.x = if input.left {
                self.direction = -1.0;
                -speed
            } else if input.right {
                self.direction = 1.0;
                speed
            } else {
                0.0
            };
        }

        if !input.jump {
            self.jump_latched = false;
            return;
        }
        if self.jump_latched {
            return;
        }
        self.jump_latched = true;

        if self.on_ground {
            self.vel.y = -JUMP_VELOCITY;
            self.on_ground = false;
        } else if self.can_double_jump() && !self.has_double_jumped {
            self.vel.y = -JUMP_VELOCITY * DOUBLE_JUMP_FACTOR;
            self.has_double_jumped = true;
        }
    }

    /// Gravity plus position integration
    pub fn integrate(&mut self, dt: f32) {
        self.vel.y = (self.vel.y + GRAVITY * dt).min(TERMINAL_VELOCITY);
        self.pos += self.vel * dt;
    }

    /// Keep the player inside the horizontal play area
    pub fn clamp_to_world(&mut self) {
        let half_w = self.size.x / 2.0;
        if self.pos.x < half_w {
            self.pos.x = half_w;
            self.vel.x = 0.0;
        } else if self.pos.x > WORLD_WIDTH - half_w {
            self.pos.x = WORLD_WIDTH - half_w;
            self.vel.x = 0.0;
        }
    }

    /// True once the player has dropped past the bottom of the level
    pub fn fell_out(&self) -> bool {
        self.bounds().top() > WORLD_HEIGHT + FALL_OUT_MARGIN
    }

    /// Snap onto a surface at `surface_y`
    pub fn land_on(&mut self, surface_y: f32) {
        self.pos.y = surface_y - self.size.y / 2.0;
        self.vel.y = 0.0;
        self.on_ground = true;
        self.has_double_jumped = false;
    }

    pub fn take_damage(&mut self, amount: u8, now: u64) -> DamageOutcome {
        if self.is_invincible() || self.is_hurt(now) {
            return DamageOutcome::Ignored;
        }

        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            return DamageOutcome::Died;
        }

        self.hurt_until = Some(now + secs_to_ticks(HURT_INVINCIBILITY_SECS));
        self.knockback_until = Some(now + secs_to_ticks(KNOCKBACK_SECS));
        self.vel.y = -KNOCKBACK_SPEED;
        self.vel.x = -KNOCKBACK_SPEED * self.direction;
        self.on_ground = false;
        DamageOutcome::Hurt
    }

    pub fn heal(&mut self, amount: u8) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    /// Apply a collected power-up. Timed effects restart their clock.
    pub fn apply_power_up(&mut self, kind: PowerUpKind, now: u64) {
        let until = kind.duration_secs().map(|secs| now + secs_to_ticks(secs));
        match kind {
            PowerUpKind::DoubleJump => self.effects.double_jump_until = until,
            PowerUpKind::Speed => self.effects.speed_until = until,
            PowerUpKind::Invincibility => self.effects.invincible_until = until,
            PowerUpKind::HealthBoost => self.heal(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded_player() -> Player {
        let mut p = Player::new(Vec2::new(100.0, 100.0));
        p.land_on(124.0);
        p
    }

    #[test]
    fn test_gravity_accumulates() {
        let mut p = Player::new(Vec2::new(100.0, 100.0));
        p.integrate(SIM_DT);
        assert!((p.vel.y - GRAVITY * SIM_DT).abs() < 1e-3);
        assert!(p.pos.y > 100.0);
    }

    #[test]
    fn test_terminal_velocity() {
        let mut p = Player::new(Vec2::new(100.0, 100.0));
        for _ in 0..600 {
            p.integrate(SIM_DT);
        }
        assert_eq!(p.vel.y, TERMINAL_VELOCITY);
    }

    #[test]
    fn test_input_sets_velocity_directly() {
        let mut p = grounded_player();
        p.apply_input(&TickInput {
            left: true,
            ..Default::default()
        });
        assert_eq!(p.vel.x, -PLAYER_SPEED);
        assert_eq!(p.direction, -1.0);

        p.apply_input(&TickInput::default());
        assert_eq!(p.vel.x, 0.0);
        assert_eq!(p.direction, -1.0);
    }

    #[test]
    fn test_jump_requires_fresh_press() {
        let mut p = grounded_player();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        p.apply_input(&jump);
        assert_eq!(p.vel.y, -JUMP_VELOCITY);

        // Land again while the key is still held: no auto-jump
        p.land_on(124.0);
        p.apply_input(&jump);
        assert_eq!(p.vel.y, 0.0);

        // Release then press
        p.apply_input(&TickInput::default());
        p.apply_input(&jump);
        assert_eq!(p.vel.y, -JUMP_VELOCITY);
    }

    #[test]
    fn test_double_jump_needs_power_up() {
        let mut p = Player::new(Vec2::new(100.0, 100.0));
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        p.apply_input(&jump);
        assert_eq!(p.vel.y, 0.0, "airborne without power-up");

        p.apply_input(&TickInput::default());
        p.apply_power_up(PowerUpKind::DoubleJump, 0);
        p.apply_input(&jump);
        assert_eq!(p.vel.y, -JUMP_VELOCITY * DOUBLE_JUMP_FACTOR);
        assert!(p.has_double_jumped);

        // Only once per airtime
        p.vel.y = 0.0;
        p.apply_input(&TickInput::default());
        p.apply_input(&jump);
        assert_eq!(p.vel.y, 0.0);

        // Landing restores it
        p.land_on(200.0);
        assert!(!p.has_double_jumped);
    }

    #[test]
    fn test_damage_grace_period() {
        let mut p = grounded_player();
        assert_eq!(p.take_damage(1, 10), DamageOutcome::Hurt);
        assert_eq!(p.health, 2);
        assert_eq!(p.take_damage(1, 11), DamageOutcome::Ignored);
        assert_eq!(p.health, 2);

        let after = 10 + secs_to_ticks(HURT_INVINCIBILITY_SECS);
        p.expire_effects(after);
        assert_eq!(p.take_damage(1, after), DamageOutcome::Hurt);
        assert_eq!(p.health, 1);
    }

    #[test]
    fn test_damage_knockback_overrides_input() {
        let mut p = grounded_player();
        p.direction = 1.0;
        p.take_damage(1, 0);
        assert_eq!(p.vel.x, -KNOCKBACK_SPEED);

        p.expire_effects(1);
        p.apply_input(&TickInput {
            right: true,
            ..Default::default()
        });
        assert_eq!(p.vel.x, -KNOCKBACK_SPEED);

        p.expire_effects(secs_to_ticks(KNOCKBACK_SECS));
        p.apply_input(&TickInput {
            right: true,
            ..Default::default()
        });
        assert_eq!(p.vel.x, PLAYER_SPEED);
    }

    #[test]
    fn test_death_at_zero() {
        let mut p = grounded_player();
        p.health = 1;
        assert_eq!(p.take_damage(1, 0), DamageOutcome::Died);
        assert_eq!(p.health, 0);
        assert_eq!(p.take_damage(5, 100), DamageOutcome::Died);
        assert_eq!(p.health, 0);
    }

    #[test]
    fn test_invincibility_blocks_damage() {
        let mut p = grounded_player();
        p.apply_power_up(PowerUpKind::Invincibility, 0);
        assert_eq!(p.take_damage(1, 1), DamageOutcome::Ignored);
        assert_eq!(p.health, PLAYER_MAX_HEALTH);
    }

    #[test]
    fn test_effects_expire() {
        let mut p = grounded_player();
        p.apply_power_up(PowerUpKind::Speed, 0);
        assert_eq!(p.run_speed(), PLAYER_SPEED * SPEED_BOOST);

        let expiry = secs_to_ticks(8.0);
        p.expire_effects(expiry - 1);
        assert!(p.effects.speed_until.is_some());
        p.expire_effects(expiry);
        assert_eq!(p.run_speed(), PLAYER_SPEED);
    }

    #[test]
    fn test_health_boost_clamps() {
        let mut p = grounded_player();
        p.apply_power_up(PowerUpKind::HealthBoost, 0);
        assert_eq!(p.health, PLAYER_MAX_HEALTH);

        p.health = 1;
        p.apply_power_up(PowerUpKind::HealthBoost, 0);
        assert_eq!(p.health, 2);
    }

    #[test]
    fn test_clamp_to_world() {
        let mut p = Player::new(Vec2::new(-50.0, 100.0));
        p.vel.x = -PLAYER_SPEED;
        p.clamp_to_world();
        assert_eq!(p.pos.x, PLAYER_WIDTH / 2.0);
        assert_eq!(p.vel.x, 0.0);

        p.pos.x = WORLD_WIDTH + 10.0;
        p.clamp_to_world();
        assert_eq!(p.pos.x, WORLD_WIDTH - PLAYER_WIDTH / 2.0);
    }
}
