//! Collectibles and power-ups

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// A coin. The level is complete once none remain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub active: bool,
}

impl Collectible {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            active: true,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(COLLECTIBLE_SIZE))
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    DoubleJump,
    Speed,
    Invincibility,
    HealthBoost,
}

impl PowerUpKind {
    /// Effect duration, `None` for permanent effects
    pub fn duration_secs(&self) -> Option<f32> {
        match self {
            PowerUpKind::DoubleJump => Some(10.0),
            PowerUpKind::Speed => Some(8.0),
            PowerUpKind::Invincibility => Some(5.0),
            PowerUpKind::HealthBoost => None,
        }
    }

    /// Short HUD message shown on pickup
    pub fn message(&self) -> &'static str {
        match self {
            PowerUpKind::DoubleJump => "Double jump!",
            PowerUpKind::Speed => "Speed boost!",
            PowerUpKind::Invincibility => "Invincible!",
            PowerUpKind::HealthBoost => "+1 health!",
        }
    }

    /// Name shown next to an effect timer
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::DoubleJump => "Double Jump",
            PowerUpKind::Speed => "Speed",
            PowerUpKind::Invincibility => "Invincible",
            PowerUpKind::HealthBoost => "Health",
        }
    }

    /// Display color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            PowerUpKind::DoubleJump => 0x00FF00,
            PowerUpKind::Speed => 0x00FFFF,
            PowerUpKind::Invincibility => 0xFFFF00,
            PowerUpKind::HealthBoost => 0xFF00FF,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
}

impl PowerUp {
    pub fn new(id: u32, kind: PowerUpKind, pos: Vec2) -> Self {
        Self { id, kind, pos }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(POWERUP_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_boost_is_permanent() {
        assert_eq!(PowerUpKind::HealthBoost.duration_secs(), None);
        assert_eq!(PowerUpKind::DoubleJump.duration_secs(), Some(10.0));
    }

    #[test]
    fn test_kind_json_names() {
        let json = serde_json::to_string(&PowerUpKind::DoubleJump).unwrap();
        assert_eq!(json, "\"doubleJump\"");
        let kind: PowerUpKind = serde_json::from_str("\"healthBoost\"").unwrap();
        assert_eq!(kind, PowerUpKind::HealthBoost);
    }

    #[test]
    fn test_labels_are_readable() {
        assert_eq!(PowerUpKind::DoubleJump.label(), "Double Jump");
        assert_eq!(PowerUpKind::Invincibility.message(), "Invincible!");
    }
}
