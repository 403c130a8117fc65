//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (cosmetic particles)
//! - Timers are tick timestamps, never callbacks
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod level;
pub mod particles;
pub mod pickup;
pub mod platform;
pub mod player;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{EnemyContact, classify_enemy_contact, is_stomp, lands_on};
pub use enemy::{Enemy, EnemyKind, Projectile};
pub use level::{
    LevelDef, Theme, builtin_levels, is_game_complete, is_level_complete, load_level,
    load_next_level,
};
pub use particles::{Burst, Particle};
pub use pickup::{Collectible, PowerUp, PowerUpKind};
pub use platform::{FadePhase, Platform, PlatformKind};
pub use player::{ActiveEffects, DamageOutcome, Player};
pub use rect::Rect;
pub use state::{GameEvent, GamePhase, GameState, MAX_PARTICLES};
pub use tick::{TickInput, tick};
