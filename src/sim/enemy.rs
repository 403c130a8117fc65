//! Enemies and the projectiles fired by shooting enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{EnemyContact, classify_enemy_contact};
use super::player::Player;
use super::rect::Rect;
use crate::consts::*;
use crate::secs_to_ticks;

/// A straight-line shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Heading in radians (screen space, y down)
    pub angle: f32,
    pub speed: f32,
    pub active: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, angle: f32) -> Self {
        Self {
            pos,
            angle,
            speed: PROJECTILE_SPEED,
            active: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.pos += Vec2::from_angle(self.angle) * self.speed * dt;
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(PROJECTILE_SIZE))
    }

    /// Mark as spent (hit something)
    pub fn explode(&mut self) {
        self.active = false;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Patrols between its boundaries
    Walking,
    /// Patrols and bobs on a sine wave around `base_y`
    Flying {
        base_y: f32,
        amplitude: f32,
        /// Radians per second
        frequency: f32,
        phase: f32,
    },
    /// Stationary turret that fires at the player when in range
    Shooting {
        detection_range: f32,
        cooldown_ticks: u64,
        last_shot: Option<u64>,
        projectiles: Vec<Projectile>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Center of the bounding box
    pub pos: Vec2,
    pub size: Vec2,
    pub boundary_left: f32,
    pub boundary_right: f32,
    pub speed: f32,
    /// 1.0 right, -1.0 left (also the facing used for rendering)
    pub direction: f32,
    pub active: bool,
}

impl Enemy {
    pub fn walking(
        id: u32,
        pos: Vec2,
        boundary_left: f32,
        boundary_right: f32,
        speed: f32,
    ) -> Self {
        Self {
            id,
            kind: EnemyKind::Walking,
            pos,
            size: Vec2::splat(ENEMY_SIZE),
            boundary_left,
            boundary_right,
            speed,
            direction: 1.0,
            active: true,
        }
    }

    pub fn flying(id: u32, pos: Vec2, boundary_left: f32, boundary_right: f32, speed: f32) -> Self {
        Self {
            kind: EnemyKind::Flying {
                base_y: pos.y,
                amplitude: FLYER_AMPLITUDE,
                frequency: FLYER_FREQUENCY,
                phase: 0.0,
            },
            size: Vec2::new(ENEMY_SIZE * 1.4, ENEMY_SIZE * 0.9),
            ..Self::walking(id, pos, boundary_left, boundary_right, speed)
        }
    }

    pub fn shooting(id: u32, pos: Vec2) -> Self {
        Self {
            kind: EnemyKind::Shooting {
                detection_range: SHOOTER_RANGE,
                cooldown_ticks: secs_to_ticks(SHOOTER_COOLDOWN_SECS),
                last_shot: None,
                projectiles: Vec::new(),
            },
            ..Self::walking(id, pos, pos.x, pos.x, 0.0)
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    /// Points awarded for a stomp
    pub fn stomp_bonus(&self) -> u64 {
        match self.kind {
            EnemyKind::Walking => 5,
            EnemyKind::Flying { .. } => 8,
            EnemyKind::Shooting { .. } => 10,
        }
    }

    /// Advance movement, firing and projectiles.
    /// `target` is the player's center, `arena` the area projectiles may live in.
    pub fn update(&mut self, dt: f32, now: u64, target: Option<Vec2>, arena: &Rect) {
        if !self.active {
            return;
        }

        let patrols = match &mut self.kind {
            EnemyKind::Walking => true,
            EnemyKind::Flying {
                base_y,
                amplitude,
                frequency,
                phase,
            } => {
                *phase += *frequency * dt;
                self.pos.y = *base_y + phase.sin() * *amplitude;
                true
            }
            EnemyKind::Shooting {
                detection_range,
                cooldown_ticks,
                last_shot,
                projectiles,
            } => {
                if let Some(target) = target.filter(|t| t.distance(self.pos) < *detection_range) {
                    self.direction = if target.x < self.pos.x { -1.0 } else { 1.0 };

                    let ready = last_shot.is_none_or(|t| now >= t + *cooldown_ticks);
                    if ready {
                        let to_target = target - self.pos;
                        let angle = to_target.y.atan2(to_target.x);
                        let muzzle = self.pos + Vec2::from_angle(angle) * (self.size.x / 2.0);
                        projectiles.push(Projectile::new(muzzle, angle));
                        *last_shot = Some(now);
                    }
                }

                for projectile in projectiles.iter_mut() {
                    projectile.update(dt);
                }
                projectiles.retain(|p| p.active && arena.contains(p.pos));
                false
            }
        };

        if patrols {
            self.patrol(dt);
        }
    }

    /// Linear patrol, reversing at the boundaries
    fn patrol(&mut self, dt: f32) {
        self.pos.x += self.speed * self.direction * dt;
        if self.pos.x >= self.boundary_right {
            self.direction = -1.0;
        } else if self.pos.x <= self.boundary_left {
            self.direction = 1.0;
        }
    }

    /// Classify a player box moving at `vel_y` against this enemy
    pub fn contact_with(&self, player: &Rect, vel_y: f32) -> EnemyContact {
        if !self.active {
            return EnemyContact::None;
        }
        classify_enemy_contact(player, vel_y, &self.bounds())
    }

    /// Whether the player is landing on this enemy
    pub fn is_player_above(&self, player: &Player) -> bool {
        self.contact_with(&player.bounds(), player.vel.y) == EnemyContact::Stomp
    }

    /// Whether the player touches this enemy other than from above
    pub fn is_player_hit(&self, player: &Player) -> bool {
        self.contact_with(&player.bounds(), player.vel.y) == EnemyContact::Hit
    }

    /// Deactivate; any shots in flight are discarded with it
    pub fn destroy(&mut self) {
        self.active = false;
        if let EnemyKind::Shooting { projectiles, .. } = &mut self.kind {
            projectiles.clear();
        }
    }

    /// Projectiles in flight (empty for non-shooters)
    pub fn projectiles(&self) -> &[Projectile] {
        match &self.kind {
            EnemyKind::Shooting { projectiles, .. } => projectiles,
            _ => &[],
        }
    }

    pub fn projectiles_mut(&mut self) -> &mut [Projectile] {
        match &mut self.kind {
            EnemyKind::Shooting { projectiles, .. } => projectiles,
            _ => &mut [],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Rect {
        Rect::new(0.0, 0.0, WORLD_WIDTH, WORLD_HEIGHT)
    }

    #[test]
    fn test_walker_reverses_at_boundaries() {
        let mut enemy = Enemy::walking(1, Vec2::new(100.0, 500.0), 50.0, 150.0, WALKER_SPEED);
        let mut saw_left = false;
        for tick in 0..300 {
            enemy.update(SIM_DT, tick, None, &arena());
            assert!(enemy.pos.x <= 150.0 + WALKER_SPEED * SIM_DT);
            assert!(enemy.pos.x >= 50.0 - WALKER_SPEED * SIM_DT);
            saw_left |= enemy.direction < 0.0;
        }
        assert!(saw_left);
        assert_eq!(enemy.pos.y, 500.0);
    }

    #[test]
    fn test_flyer_bobs_around_baseline() {
        let mut enemy = Enemy::flying(1, Vec2::new(400.0, 200.0), 300.0, 500.0, FLYER_SPEED);
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for tick in 0..240 {
            enemy.update(SIM_DT, tick, None, &arena());
            min_y = min_y.min(enemy.pos.y);
            max_y = max_y.max(enemy.pos.y);
        }
        assert!(min_y >= 200.0 - FLYER_AMPLITUDE - 1e-3);
        assert!(max_y <= 200.0 + FLYER_AMPLITUDE + 1e-3);
        assert!(max_y - min_y > FLYER_AMPLITUDE);
    }

    #[test]
    fn test_shooter_fires_on_cooldown_when_in_range() {
        let mut enemy = Enemy::shooting(1, Vec2::new(400.0, 300.0));
        let cooldown = secs_to_ticks(SHOOTER_COOLDOWN_SECS);

        // Out of range: nothing
        enemy.update(SIM_DT, 1, Some(Vec2::new(50.0, 300.0)), &arena());
        assert!(enemy.projectiles().is_empty());

        // In range, to the left
        let target = Some(Vec2::new(250.0, 300.0));
        enemy.update(SIM_DT, 2, target, &arena());
        assert_eq!(enemy.projectiles().len(), 1);
        assert_eq!(enemy.direction, -1.0);

        enemy.update(SIM_DT, 2 + cooldown - 1, target, &arena());
        assert_eq!(enemy.projectiles().len(), 1);
        enemy.update(SIM_DT, 2 + cooldown, target, &arena());
        assert_eq!(enemy.projectiles().len(), 2);
    }

    #[test]
    fn test_projectiles_travel_and_leave_arena() {
        let mut enemy = Enemy::shooting(1, Vec2::new(700.0, 300.0));
        enemy.update(SIM_DT, 1, Some(Vec2::new(600.0, 300.0)), &arena());
        let start_x = enemy.projectiles()[0].pos.x;

        // Player leaves range; the shot keeps flying left
        enemy.update(SIM_DT, 2, None, &arena());
        assert!(enemy.projectiles()[0].pos.x < start_x);

        for tick in 3..300 {
            enemy.update(SIM_DT, tick, None, &arena());
        }
        assert!(enemy.projectiles().is_empty());
    }

    #[test]
    fn test_destroy_discards_projectiles() {
        let mut enemy = Enemy::shooting(1, Vec2::new(400.0, 300.0));
        enemy.update(SIM_DT, 1, Some(Vec2::new(300.0, 300.0)), &arena());
        assert!(!enemy.projectiles().is_empty());

        enemy.destroy();
        assert!(!enemy.active);
        assert!(enemy.projectiles().is_empty());
    }

    #[test]
    fn test_destroyed_enemy_ignores_player() {
        let mut enemy = Enemy::walking(1, Vec2::new(100.0, 100.0), 0.0, 200.0, 0.0);
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        player.vel.y = 0.0;
        assert!(enemy.is_player_hit(&player));

        enemy.destroy();
        assert!(!enemy.is_player_hit(&player));
        assert!(!enemy.is_player_above(&player));
    }

    #[test]
    fn test_stomp_bonus_by_kind() {
        let pos = Vec2::new(0.0, 0.0);
        assert_eq!(Enemy::walking(1, pos, 0.0, 0.0, 0.0).stomp_bonus(), 5);
        assert_eq!(Enemy::flying(2, pos, 0.0, 0.0, 0.0).stomp_bonus(), 8);
        assert_eq!(Enemy::shooting(3, pos).stomp_bonus(), 10);
    }
}
