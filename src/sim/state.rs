//! Game state and core simulation types
//!
//! `GameState` is the whole simulation context. It is passed explicitly to
//! `tick` and owned by the host; nothing in the simulation is global.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::level::{LevelDef, builtin_levels};
use super::particles::Particle;
use super::pickup::{Collectible, PowerUp, PowerUpKind};
use super::platform::Platform;
use super::player::Player;

/// Default particle pool size (the host may lower it from settings)
pub const MAX_PARTICLES: usize = 256;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no player or level loaded
    Menu,
    /// Active gameplay
    Playing,
    /// Gameplay frozen, key state still tracked
    Paused,
    /// All coins collected; next level loads when the timer runs out
    LevelCleared,
    /// Player ran out of health
    GameOver,
    /// Last level completed
    Victory,
}

/// Gameplay notifications for the host (HUD messages, sounds, score entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CollectiblePicked { score: u64 },
    PowerUpCollected { kind: PowerUpKind },
    EnemyStomped { bonus: u64 },
    PlayerHurt { health: u8 },
    PlayerDied,
    /// `level` is the 0-based index that was just cleared
    LevelComplete { level: usize },
    GameComplete { score: u64 },
    GameOver { score: u64, level: usize },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed (cosmetic randomness only)
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter; timed effects are expressed against it
    pub time_ticks: u64,
    pub score: u64,
    /// Level definitions, in play order
    pub levels: Vec<LevelDef>,
    /// Current level index (0-based)
    pub level_index: usize,
    /// Coins that must be collected to clear the current level
    pub required_collectibles: usize,
    /// Ticks left in the LevelCleared rest period
    pub clear_ticks: u32,
    /// `None` while in the menu
    pub player: Option<Player>,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    pub power_ups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub max_particles: usize,
    /// Screen shake intensity (0-1), decays each tick
    pub screen_shake: f32,
    /// Events emitted since the host last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state in the menu, using the built-in levels
    pub fn new(seed: u64) -> Self {
        Self::with_levels(seed, builtin_levels())
    }

    /// Create a new game state with a custom level list
    pub fn with_levels(seed: u64, levels: Vec<LevelDef>) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            time_ticks: 0,
            score: 0,
            levels,
            level_index: 0,
            required_collectibles: 0,
            clear_ticks: 0,
            player: None,
            platforms: Vec::new(),
            enemies: Vec::new(),
            collectibles: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            max_particles: MAX_PARTICLES,
            screen_shake: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Definition of the level currently loaded
    pub fn current_level(&self) -> Option<&LevelDef> {
        self.levels.get(self.level_index)
    }

    /// Coins still in the world
    pub fn live_collectibles(&self) -> usize {
        self.collectibles.iter().filter(|c| c.active).count()
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop every live entity of the current level
    pub fn clear_level(&mut self) {
        self.platforms.clear();
        self.enemies.clear();
        self.collectibles.clear();
        self.power_ups.clear();
        self.particles.clear();
    }
}
