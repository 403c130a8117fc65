//! Sky Hopper - A 2D side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, level state machine)
//! - `scene`: Draw list snapshot handed to the renderer
//! - `input`: Held-key map and per-tick input commands
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `highscores`: Ranked score ledger

pub mod highscores;
pub mod input;
pub mod persistence;
pub mod scene;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
///
/// Distances are in world pixels, speeds in pixels/second.
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Ticks per simulated second
    pub const TICKS_PER_SEC: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Play area (levels are authored against this size)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// How far below the bottom edge the player may fall before taking damage
    pub const FALL_OUT_MARGIN: f32 = 100.0;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 1800.0;
    /// Fall speed cap
    pub const TERMINAL_VELOCITY: f32 = 900.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    pub const PLAYER_MAX_HEALTH: u8 = 3;
    pub const JUMP_VELOCITY: f32 = 720.0;
    /// Double jump is slightly weaker than a ground jump
    pub const DOUBLE_JUMP_FACTOR: f32 = 0.8;
    /// Upward velocity after stomping an enemy
    pub const STOMP_BOUNCE: f32 = 480.0;
    /// Knockback speed applied when hurt (both axes)
    pub const KNOCKBACK_SPEED: f32 = 300.0;
    /// Input is ignored horizontally for this long after a knockback
    pub const KNOCKBACK_SECS: f32 = 0.25;
    /// Grace period after taking damage
    pub const HURT_INVINCIBILITY_SECS: f32 = 1.5;

    /// Speed power-up multiplier
    pub const SPEED_BOOST: f32 = 1.5;

    /// Platform defaults
    pub const PLATFORM_WIDTH: f32 = 100.0;
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    pub const BOUNCE_FORCE: f32 = 900.0;
    /// Angular rate of a moving platform at speed 1.0 (radians/s)
    pub const MOVING_PLATFORM_RATE: f32 = 3.0;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const WALKER_SPEED: f32 = 120.0;
    pub const FLYER_SPEED: f32 = 90.0;
    pub const FLYER_AMPLITUDE: f32 = 50.0;
    pub const FLYER_FREQUENCY: f32 = 3.0;
    pub const SHOOTER_RANGE: f32 = 300.0;
    pub const SHOOTER_COOLDOWN_SECS: f32 = 2.0;
    pub const PROJECTILE_SPEED: f32 = 300.0;
    pub const PROJECTILE_SIZE: f32 = 14.0;

    /// Pickup sizes
    pub const COLLECTIBLE_SIZE: f32 = 24.0;
    pub const POWERUP_SIZE: f32 = 28.0;

    /// Rest period between a cleared level and the next one
    pub const LEVEL_CLEAR_SECS: f32 = 1.5;
}

/// Convert a duration in seconds to a whole number of simulation ticks
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    (secs * consts::TICKS_PER_SEC).round().max(0.0) as u64
}
