//! Level definitions and the level registry
//!
//! Levels are static in-memory data. The definition types are also
//! deserializable so a level can be described in JSON; every optional field
//! falls back to a default instead of failing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::pickup::{Collectible, PowerUp, PowerUpKind};
use super::platform::{FadePhase, FadeTiming, Platform, PlatformKind};
use super::player::Player;
use super::rect::Rect;
use super::state::GameState;
use crate::consts::*;
use crate::secs_to_ticks;

/// Visual theme of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    #[default]
    Meadow,
    Sky,
    Castle,
}

impl Theme {
    /// Background color (0xRRGGBB)
    pub fn background(&self) -> u32 {
        match self {
            Theme::Meadow => 0x87CEEB,
            Theme::Sky => 0xB0E0FF,
            Theme::Castle => 0x3A3A5A,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

impl SpawnPoint {
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

fn default_platform_width() -> f32 {
    PLATFORM_WIDTH
}

fn default_platform_height() -> f32 {
    PLATFORM_HEIGHT
}

fn default_move_distance() -> f32 {
    100.0
}

fn default_speed_factor() -> f32 {
    1.0
}

fn default_touch_secs() -> f32 {
    0.5
}

fn default_fade_secs() -> f32 {
    1.0
}

fn default_reappear_secs() -> f32 {
    3.0
}

fn default_bounce_force() -> f32 {
    BOUNCE_FORCE
}

fn default_path_width() -> f32 {
    100.0
}

fn default_power_up() -> PowerUpKind {
    PowerUpKind::DoubleJump
}

/// Platform behavior as authored
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlatformDefKind {
    #[default]
    Standard,
    #[serde(rename_all = "camelCase")]
    Moving {
        #[serde(default = "default_move_distance")]
        distance: f32,
        #[serde(default = "default_speed_factor")]
        speed: f32,
        #[serde(default)]
        horizontal: bool,
        #[serde(default)]
        vertical: bool,
    },
    #[serde(rename_all = "camelCase")]
    Disappearing {
        #[serde(default = "default_touch_secs")]
        touch_secs: f32,
        #[serde(default = "default_fade_secs")]
        fade_secs: f32,
        #[serde(default = "default_reappear_secs")]
        reappear_secs: f32,
    },
    Bouncing {
        #[serde(default = "default_bounce_force")]
        force: f32,
    },
}

/// Platform rectangle, top-left anchored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDef {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_platform_width")]
    pub width: f32,
    #[serde(default = "default_platform_height")]
    pub height: f32,
    #[serde(default)]
    pub kind: PlatformDefKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnemyDefKind {
    #[default]
    Walking,
    Flying,
    Shooting,
}

/// Enemy spawn, centered on `(x, y)`.
/// Patrol bounds come from explicit boundaries or `x ± path_width / 2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyDef {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub kind: EnemyDefKind,
    #[serde(default = "default_path_width")]
    pub path_width: f32,
    #[serde(default)]
    pub boundary_left: Option<f32>,
    #[serde(default)]
    pub boundary_right: Option<f32>,
    /// Patrol speed (pixels/s), defaults per kind
    #[serde(default)]
    pub speed: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpDef {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type", default = "default_power_up")]
    pub kind: PowerUpKind,
}

/// One immutable level layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LevelDef {
    pub name: String,
    pub theme: Theme,
    pub player_start: SpawnPoint,
    pub platforms: Vec<PlatformDef>,
    pub collectibles: Vec<SpawnPoint>,
    pub power_ups: Vec<PowerUpDef>,
    pub enemies: Vec<EnemyDef>,
}

impl Default for LevelDef {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            theme: Theme::default(),
            player_start: SpawnPoint { x: 50.0, y: 520.0 },
            platforms: Vec::new(),
            collectibles: Vec::new(),
            power_ups: Vec::new(),
            enemies: Vec::new(),
        }
    }
}

impl LevelDef {
    /// Coins needed to clear this level
    pub fn required_collectibles(&self) -> usize {
        self.collectibles.len()
    }
}

/// Load level `index`, replacing every live entity.
/// Out-of-range indices leave the state untouched and return false.
pub fn load_level(state: &mut GameState, index: usize) -> bool {
    let Some(def) = state.levels.get(index).cloned() else {
        log::warn!(
            "Level {} out of range ({} levels)",
            index,
            state.level_count()
        );
        return false;
    };

    state.clear_level();
    let now = state.time_ticks;

    for p in &def.platforms {
        let id = state.next_entity_id();
        state.platforms.push(spawn_platform(id, p, now));
    }

    for c in &def.collectibles {
        let id = state.next_entity_id();
        state.collectibles.push(Collectible::new(id, c.to_vec2()));
    }

    for p in &def.power_ups {
        let id = state.next_entity_id();
        state
            .power_ups
            .push(PowerUp::new(id, p.kind, Vec2::new(p.x, p.y)));
    }

    for e in &def.enemies {
        let id = state.next_entity_id();
        state.enemies.push(spawn_enemy(id, e));
    }

    let start = def.player_start.to_vec2();
    match state.player.as_mut() {
        Some(player) => player.respawn(start),
        None => state.player = Some(Player::new(start)),
    }

    state.level_index = index;
    state.required_collectibles = def.required_collectibles();
    state.clear_ticks = 0;

    log::info!(
        "Loaded level {} '{}': {} platforms, {} coins, {} power-ups, {} enemies",
        index + 1,
        def.name,
        state.platforms.len(),
        state.collectibles.len(),
        state.power_ups.len(),
        state.enemies.len()
    );
    true
}

/// Advance to the next level. Returns false past the last level; the caller
/// takes the game-complete path.
pub fn load_next_level(state: &mut GameState) -> bool {
    load_level(state, state.level_index + 1)
}

/// A level is complete once no coins remain
pub fn is_level_complete(state: &GameState) -> bool {
    state.live_collectibles() == 0
}

/// True when the last level is loaded and complete
pub fn is_game_complete(state: &GameState) -> bool {
    state.level_index + 1 >= state.level_count() && is_level_complete(state)
}

fn spawn_platform(id: u32, def: &PlatformDef, now: u64) -> Platform {
    let rect = Rect::new(def.x, def.y, def.width, def.height);
    let kind = match def.kind {
        PlatformDefKind::Standard => PlatformKind::Standard,
        PlatformDefKind::Moving {
            distance,
            speed,
            horizontal,
            vertical,
        } => PlatformKind::Moving {
            origin: Vec2::new(def.x, def.y),
            distance,
            speed,
            horizontal,
            vertical,
            elapsed: 0.0,
        },
        PlatformDefKind::Disappearing {
            touch_secs,
            fade_secs,
            reappear_secs,
        } => PlatformKind::Disappearing {
            phase: FadePhase::Active,
            since: now,
            timing: FadeTiming {
                touch_ticks: secs_to_ticks(touch_secs),
                fade_ticks: secs_to_ticks(fade_secs),
                reappear_ticks: secs_to_ticks(reappear_secs),
            },
        },
        PlatformDefKind::Bouncing { force } => PlatformKind::Bouncing { force },
    };
    Platform::new(id, rect, kind)
}

fn spawn_enemy(id: u32, def: &EnemyDef) -> Enemy {
    let pos = Vec2::new(def.x, def.y);
    let left = def.boundary_left.unwrap_or(def.x - def.path_width / 2.0);
    let right = def.boundary_right.unwrap_or(def.x + def.path_width / 2.0);
    match def.kind {
        EnemyDefKind::Walking => {
            Enemy::walking(id, pos, left, right, def.speed.unwrap_or(WALKER_SPEED))
        }
        EnemyDefKind::Flying => {
            Enemy::flying(id, pos, left, right, def.speed.unwrap_or(FLYER_SPEED))
        }
        EnemyDefKind::Shooting => Enemy::shooting(id, pos),
    }
}

// Level authoring helpers

fn ground() -> PlatformDef {
    PlatformDef {
        x: 0.0,
        y: WORLD_HEIGHT - 32.0,
        width: WORLD_WIDTH,
        height: 32.0,
        kind: PlatformDefKind::Standard,
    }
}

fn ledge(x: f32, y: f32, width: f32) -> PlatformDef {
    PlatformDef {
        x,
        y,
        width,
        height: PLATFORM_HEIGHT,
        kind: PlatformDefKind::Standard,
    }
}

fn special(x: f32, y: f32, width: f32, kind: PlatformDefKind) -> PlatformDef {
    PlatformDef {
        kind,
        ..ledge(x, y, width)
    }
}

fn at(x: f32, y: f32) -> SpawnPoint {
    SpawnPoint { x, y }
}

fn power_up(x: f32, y: f32, kind: PowerUpKind) -> PowerUpDef {
    PowerUpDef { x, y, kind }
}

fn enemy(kind: EnemyDefKind, x: f32, y: f32, path_width: f32, speed: Option<f32>) -> EnemyDef {
    EnemyDef {
        x,
        y,
        kind,
        path_width,
        boundary_left: None,
        boundary_right: None,
        speed,
    }
}

/// Center y for a ground-walking enemy
const ON_GROUND: f32 = WORLD_HEIGHT - 32.0 - ENEMY_SIZE / 2.0;

/// The built-in campaign
pub fn builtin_levels() -> Vec<LevelDef> {
    use EnemyDefKind::*;
    use PowerUpKind::*;

    vec![
        LevelDef {
            name: "Level 1 - Beginner".to_string(),
            theme: Theme::Meadow,
            player_start: at(50.0, 520.0),
            platforms: vec![
                ground(),
                ledge(100.0, 450.0, 200.0),
                ledge(400.0, 350.0, 150.0),
                ledge(200.0, 250.0, 100.0),
                ledge(500.0, 150.0, 180.0),
            ],
            collectibles: vec![
                at(150.0, 410.0),
                at(450.0, 310.0),
                at(250.0, 210.0),
                at(560.0, 110.0),
            ],
            power_ups: vec![power_up(260.0, 420.0, DoubleJump)],
            enemies: vec![enemy(Walking, 560.0, ON_GROUND, 160.0, None)],
        },
        LevelDef {
            name: "Level 2 - Intermediate".to_string(),
            theme: Theme::Sky,
            player_start: at(50.0, 520.0),
            platforms: vec![
                ground(),
                ledge(100.0, 500.0, 100.0),
                ledge(250.0, 450.0, 100.0),
                special(
                    400.0,
                    400.0,
                    100.0,
                    PlatformDefKind::Moving {
                        distance: 40.0,
                        speed: 1.0,
                        horizontal: true,
                        vertical: false,
                    },
                ),
                ledge(550.0, 350.0, 100.0),
                special(
                    400.0,
                    250.0,
                    100.0,
                    PlatformDefKind::Disappearing {
                        touch_secs: 0.5,
                        fade_secs: 1.0,
                        reappear_secs: 3.0,
                    },
                ),
                ledge(250.0, 200.0, 100.0),
                ledge(100.0, 150.0, 100.0),
            ],
            collectibles: vec![
                at(150.0, 470.0),
                at(300.0, 420.0),
                at(450.0, 370.0),
                at(600.0, 320.0),
                at(450.0, 220.0),
                at(300.0, 170.0),
                at(150.0, 120.0),
            ],
            power_ups: vec![
                power_up(640.0, 320.0, Speed),
                power_up(120.0, 120.0, Invincibility),
            ],
            enemies: vec![
                enemy(Walking, 300.0, ON_GROUND, 150.0, Some(90.0)),
                enemy(Flying, 500.0, 300.0, 200.0, None),
            ],
        },
        LevelDef {
            name: "Level 3 - Expert".to_string(),
            theme: Theme::Castle,
            player_start: at(50.0, 520.0),
            platforms: vec![
                ground(),
                ledge(150.0, 500.0, 80.0),
                ledge(300.0, 450.0, 80.0),
                ledge(450.0, 400.0, 80.0),
                special(
                    600.0,
                    350.0,
                    80.0,
                    PlatformDefKind::Bouncing {
                        force: BOUNCE_FORCE,
                    },
                ),
                ledge(450.0, 300.0, 80.0),
                special(
                    300.0,
                    250.0,
                    80.0,
                    PlatformDefKind::Disappearing {
                        touch_secs: 0.5,
                        fade_secs: 1.0,
                        reappear_secs: 3.0,
                    },
                ),
                special(
                    150.0,
                    200.0,
                    80.0,
                    PlatformDefKind::Moving {
                        distance: 30.0,
                        speed: 0.8,
                        horizontal: false,
                        vertical: true,
                    },
                ),
                ledge(300.0, 150.0, 80.0),
                ledge(450.0, 100.0, 80.0),
            ],
            collectibles: vec![
                at(190.0, 460.0),
                at(340.0, 410.0),
                at(490.0, 360.0),
                at(640.0, 310.0),
                at(490.0, 260.0),
                at(340.0, 210.0),
                at(190.0, 160.0),
                at(340.0, 110.0),
                at(490.0, 60.0),
            ],
            power_ups: vec![
                power_up(100.0, 540.0, DoubleJump),
                power_up(620.0, 540.0, Speed),
                power_up(520.0, 70.0, HealthBoost),
            ],
            enemies: vec![
                enemy(Walking, 400.0, ON_GROUND, 300.0, None),
                enemy(Flying, 650.0, 200.0, 200.0, None),
                enemy(Flying, 250.0, 330.0, 160.0, None),
                enemy(Shooting, 720.0, ON_GROUND, 0.0, None),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_are_sane() {
        let world = Rect::new(0.0, 0.0, WORLD_WIDTH, WORLD_HEIGHT);
        let levels = builtin_levels();
        assert_eq!(levels.len(), 3);
        for level in &levels {
            assert!(level.required_collectibles() > 0, "{}", level.name);
            assert!(world.contains(level.player_start.to_vec2()));
            for c in &level.collectibles {
                assert!(world.contains(c.to_vec2()), "{} coin {:?}", level.name, c);
            }
        }
    }

    #[test]
    fn test_load_level_instantiates_everything() {
        let mut state = GameState::new(1);
        assert!(load_level(&mut state, 0));

        let def = &state.levels[0];
        assert_eq!(state.platforms.len(), def.platforms.len());
        assert_eq!(state.collectibles.len(), def.collectibles.len());
        assert_eq!(state.power_ups.len(), def.power_ups.len());
        assert_eq!(state.enemies.len(), def.enemies.len());
        assert_eq!(state.required_collectibles, 4);
        assert_eq!(
            state.player.as_ref().map(|p| p.pos),
            Some(def.player_start.to_vec2())
        );
        assert!(!is_level_complete(&state));
    }

    #[test]
    fn test_load_level_replaces_previous_entities() {
        let mut state = GameState::new(1);
        assert!(load_level(&mut state, 2));
        assert!(load_level(&mut state, 0));
        assert_eq!(state.level_index, 0);
        assert_eq!(state.platforms.len(), state.levels[0].platforms.len());
        assert_eq!(state.enemies.len(), state.levels[0].enemies.len());
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let mut state = GameState::new(1);
        assert!(load_level(&mut state, 1));
        let platforms = state.platforms.len();

        assert!(!load_level(&mut state, 99));
        assert_eq!(state.level_index, 1);
        assert_eq!(state.platforms.len(), platforms);
    }

    #[test]
    fn test_next_level_stops_at_end() {
        let mut state = GameState::new(1);
        assert!(load_level(&mut state, 0));
        assert!(load_next_level(&mut state));
        assert_eq!(state.level_index, 1);
        assert!(load_next_level(&mut state));
        assert_eq!(state.level_index, 2);
        assert!(!load_next_level(&mut state));
        assert_eq!(state.level_index, 2);
    }

    #[test]
    fn test_game_complete_only_on_last_cleared_level() {
        let mut state = GameState::new(1);
        assert!(load_level(&mut state, 1));
        state.collectibles.clear();
        assert!(is_level_complete(&state));
        assert!(!is_game_complete(&state));

        assert!(load_level(&mut state, 2));
        assert!(!is_game_complete(&state));
        state.collectibles.clear();
        assert!(is_game_complete(&state));
    }

    #[test]
    fn test_load_keeps_health() {
        let mut state = GameState::new(1);
        assert!(load_level(&mut state, 0));
        if let Some(player) = state.player.as_mut() {
            player.health = 1;
        }
        assert!(load_next_level(&mut state));
        assert_eq!(state.player.as_ref().map(|p| p.health), Some(1));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let json = r#"{
            "name": "Custom",
            "platforms": [
                { "x": 10, "y": 500 },
                { "x": 200, "y": 400, "kind": { "type": "moving", "vertical": true } },
                { "x": 400, "y": 300, "kind": { "type": "disappearing" } }
            ],
            "collectibles": [ { "x": 50, "y": 450 } ],
            "powerUps": [ { "x": 60, "y": 450 } ],
            "enemies": [ { "x": 300, "y": 480 }, { "x": 500, "y": 200, "kind": "flying", "boundaryLeft": 450 } ]
        }"#;
        let def: LevelDef = serde_json::from_str(json).unwrap();

        assert_eq!(def.theme, Theme::Meadow);
        assert_eq!(def.player_start, SpawnPoint { x: 50.0, y: 520.0 });
        assert_eq!(def.platforms[0].width, PLATFORM_WIDTH);
        assert_eq!(def.platforms[0].height, PLATFORM_HEIGHT);
        assert_eq!(def.platforms[0].kind, PlatformDefKind::Standard);
        assert_eq!(
            def.platforms[1].kind,
            PlatformDefKind::Moving {
                distance: 100.0,
                speed: 1.0,
                horizontal: false,
                vertical: true,
            }
        );
        assert_eq!(def.power_ups[0].kind, PowerUpKind::DoubleJump);

        let mut state = GameState::with_levels(3, vec![def]);
        assert!(load_level(&mut state, 0));
        assert_eq!(state.enemies[0].boundary_left, 250.0);
        assert_eq!(state.enemies[0].boundary_right, 350.0);
        assert_eq!(state.enemies[0].speed, WALKER_SPEED);
        assert_eq!(state.enemies[1].boundary_left, 450.0);
        assert_eq!(state.enemies[1].boundary_right, 550.0);
        assert!(matches!(
            state.platforms[2].kind,
            PlatformKind::Disappearing {
                timing: FadeTiming {
                    touch_ticks: 30,
                    fade_ticks: 60,
                    reappear_ticks: 180
                },
                ..
            }
        ));
    }
}
