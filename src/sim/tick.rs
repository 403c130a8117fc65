//! Fixed timestep simulation tick
//!
//! Drives the game state machine and, while playing, advances every entity
//! one step in a fixed order.

use glam::Vec2;

use super::collision::EnemyContact;
use super::level::{is_game_complete, is_level_complete, load_level, load_next_level};
use super::particles::{self, Burst};
use super::player::{DamageOutcome, Player};
use super::rect::Rect;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::secs_to_ticks;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held keys
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// One-shot commands (true only on the tick they were pressed)
    pub start: bool,
    pub pause: bool,
    pub restart: bool,
    pub menu: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.menu && state.phase != GamePhase::Menu {
        return_to_menu(state);
        return;
    }

    match state.phase {
        GamePhase::Menu => {
            if input.start {
                start_game(state, input);
            }
        }

        GamePhase::Paused => {
            // Key state is still tracked so a released jump unlatches
            release_jump_latch(state, input);
            if input.pause {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
        }

        GamePhase::Playing => {
            if input.pause {
                state.phase = GamePhase::Paused;
                log::info!("Paused");
                return;
            }

            state.time_ticks += 1;
            decay_screen_shake(state);

            if step_playing(state, input, dt) {
                enter_game_over(state);
            } else if is_level_complete(state) {
                complete_level(state);
            }

            particles::update(&mut state.particles, dt);
        }

        GamePhase::LevelCleared => {
            state.time_ticks += 1;
            decay_screen_shake(state);
            release_jump_latch(state, input);
            particles::update(&mut state.particles, dt);

            state.clear_ticks = state.clear_ticks.saturating_sub(1);
            if state.clear_ticks == 0 {
                if load_next_level(state) {
                    state.phase = GamePhase::Playing;
                } else {
                    enter_victory(state);
                }
            }
        }

        GamePhase::GameOver | GamePhase::Victory => {
            state.time_ticks += 1;
            decay_screen_shake(state);
            particles::update(&mut state.particles, dt);

            if input.restart {
                log::info!("Restarting");
                start_game(state, input);
            }
        }
    }
}

/// One gameplay step. Returns true if the player died.
fn step_playing(state: &mut GameState, input: &TickInput, dt: f32) -> bool {
    let now = state.time_ticks;
    let max_particles = state.max_particles;
    let start = state
        .current_level()
        .map(|level| level.player_start.to_vec2())
        .unwrap_or(Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0));

    let GameState {
        player,
        platforms,
        enemies,
        collectibles,
        power_ups,
        particles,
        rng,
        events,
        score,
        screen_shake,
        ..
    } = state;
    let Some(player) = player.as_mut() else {
        return false;
    };

    // Player physics
    player.expire_effects(now);
    player.apply_input(input);
    let was_grounded = player.on_ground;
    player.on_ground = false;
    let prev_bottom = player.bounds().bottom();
    player.integrate(dt);
    player.clamp_to_world();

    if player.fell_out() {
        if hurt_player(player, now, events, screen_shake) {
            return true;
        }
        player.respawn(start);
    }

    // Enemies and their projectiles
    let arena = Rect::new(0.0, 0.0, WORLD_WIDTH, WORLD_HEIGHT);
    for enemy in enemies.iter_mut() {
        enemy.update(dt, now, Some(player.pos), &arena);
    }

    // Platforms
    for platform in platforms.iter_mut() {
        platform.update(dt, now);
    }
    // Every platform sees the player, so touches and rides register on all
    let landed = platforms.iter_mut().fold(false, |landed, platform| {
        platform.check_collision(player, prev_bottom, now) || landed
    });
    if landed && !was_grounded {
        let feet = Vec2::new(player.pos.x, player.bounds().bottom());
        particles::emit(particles, rng, Burst::Dust, feet, max_particles);
    }

    // Collectibles
    let bounds = player.bounds();
    for coin in collectibles.iter_mut() {
        if coin.active && coin.bounds().overlaps(&bounds) {
            coin.active = false;
            *score += 1;
            log::debug!("Collectible {} picked, score {}", coin.id, score);
            events.push(GameEvent::CollectiblePicked { score: *score });
            particles::emit(particles, rng, Burst::Collect, coin.pos, max_particles);
        }
    }
    collectibles.retain(|c| c.active);

    // Power-ups
    power_ups.retain(|power_up| {
        if !power_up.bounds().overlaps(&bounds) {
            return true;
        }
        log::debug!("Power-up {:?} collected", power_up.kind);
        player.apply_power_up(power_up.kind, now);
        events.push(GameEvent::PowerUpCollected {
            kind: power_up.kind,
        });
        false
    });

    // Enemy contact: every enemy is judged against the pre-contact fall
    // speed, and a tick with a stomp never also lands a body hit
    let vel_y = player.vel.y;
    let bounds = player.bounds();
    let mut stomped = false;
    for enemy in enemies.iter_mut().filter(|e| e.active) {
        if enemy.contact_with(&bounds, vel_y) != EnemyContact::Stomp {
            continue;
        }
        let bonus = enemy.stomp_bonus();
        enemy.destroy();
        stomped = true;
        *score += bonus;
        *screen_shake = (*screen_shake + 0.2).min(1.0);
        log::debug!("Enemy {} stomped (+{})", enemy.id, bonus);
        events.push(GameEvent::EnemyStomped { bonus });
        particles::emit(particles, rng, Burst::Explosion, enemy.pos, max_particles);
    }
    if stomped {
        player.vel.y = -STOMP_BOUNCE;
        player.on_ground = false;
    }

    for enemy in enemies.iter_mut().filter(|e| e.active) {
        if !stomped
            && enemy.contact_with(&bounds, vel_y) == EnemyContact::Hit
            && hurt_player(player, now, events, screen_shake)
        {
            return true;
        }

        for projectile in enemy.projectiles_mut() {
            if projectile.active && projectile.bounds().overlaps(&player.bounds()) {
                projectile.explode();
                particles::emit(particles, rng, Burst::Explosion, projectile.pos, max_particles);
                if hurt_player(player, now, events, screen_shake) {
                    return true;
                }
            }
        }
    }
    enemies.retain(|e| e.active);

    false
}

/// Apply one unit of damage. Returns true if it was fatal.
fn hurt_player(
    player: &mut Player,
    now: u64,
    events: &mut Vec<GameEvent>,
    screen_shake: &mut f32,
) -> bool {
    match player.take_damage(1, now) {
        DamageOutcome::Ignored => false,
        DamageOutcome::Hurt => {
            log::debug!("Player hurt, health {}", player.health);
            *screen_shake = (*screen_shake + 0.3).min(1.0);
            events.push(GameEvent::PlayerHurt {
                health: player.health,
            });
            false
        }
        DamageOutcome::Died => true,
    }
}

fn release_jump_latch(state: &mut GameState, input: &TickInput) {
    if let Some(player) = state.player.as_mut()
        && !input.jump
    {
        player.jump_latched = false;
    }
}

fn decay_screen_shake(state: &mut GameState) {
    state.screen_shake *= 0.9;
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }
}

/// Fresh run from the first level: score 0, full health, no effects
fn start_game(state: &mut GameState, input: &TickInput) {
    let mut player = Player::new(Vec2::ZERO);
    // A jump key held through the start press must be released first
    player.jump_latched = input.jump;
    state.player = Some(player);
    state.score = 0;
    state.screen_shake = 0.0;

    if load_level(state, 0) {
        state.phase = GamePhase::Playing;
        log::info!("Game started (seed {})", state.seed);
    } else {
        log::warn!("No levels to play");
        state.player = None;
        state.phase = GamePhase::Menu;
    }
}

fn return_to_menu(state: &mut GameState) {
    state.clear_level();
    state.player = None;
    state.score = 0;
    state.level_index = 0;
    state.required_collectibles = 0;
    state.clear_ticks = 0;
    state.screen_shake = 0.0;
    state.events.clear();
    state.phase = GamePhase::Menu;
    log::info!("Returned to menu");
}

fn enter_game_over(state: &mut GameState) {
    if let Some(player) = state.player.as_ref() {
        let at = player.pos;
        let max = state.max_particles;
        particles::emit(&mut state.particles, &mut state.rng, Burst::Explosion, at, max);
    }
    state.screen_shake = 1.0;
    state.events.push(GameEvent::PlayerDied);
    state.events.push(GameEvent::GameOver {
        score: state.score,
        level: state.level_index,
    });
    state.phase = GamePhase::GameOver;
    log::info!(
        "Game over: score {} on level {}",
        state.score,
        state.level_index + 1
    );
}

fn complete_level(state: &mut GameState) {
    let level = state.level_index;
    state.events.push(GameEvent::LevelComplete { level });
    log::info!("Level {} complete", level + 1);

    if let Some(player) = state.player.as_ref() {
        let at = player.pos;
        let max = state.max_particles;
        particles::emit(&mut state.particles, &mut state.rng, Burst::LevelComplete, at, max);
    }

    if is_game_complete(state) {
        enter_victory(state);
    } else {
        state.clear_ticks = secs_to_ticks(LEVEL_CLEAR_SECS).max(1) as u32;
        state.phase = GamePhase::LevelCleared;
    }
}

fn enter_victory(state: &mut GameState) {
    state.events.push(GameEvent::GameComplete { score: state.score });
    state.phase = GamePhase::Victory;
    log::info!("All levels complete, final score {}", state.score);
}
