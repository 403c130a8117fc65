//! Collision classification for the player against world entities
//!
//! Everything here is pure geometry on bounding boxes. Resolution (what
//! happens to score, health and entity lists) lives in the tick.

use super::rect::Rect;

/// How a player overlap with an enemy is classified this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyContact {
    None,
    /// Player landed on the enemy from above
    Stomp,
    /// Any other overlap
    Hit,
}

/// Check whether a player box lands on a platform box
///
/// A landing needs horizontal overlap, a non-rising player (`vel_y >= 0`), and
/// the player's bottom edge either inside the platform's top half band or
/// having crossed the platform top since `prev_bottom` (so a fast fall cannot
/// tunnel through a thin platform).
pub fn lands_on(player: &Rect, prev_bottom: f32, vel_y: f32, platform: &Rect) -> bool {
    if vel_y < 0.0 || !player.overlaps_horizontally(platform) {
        return false;
    }

    let bottom = player.bottom();
    let top = platform.top();
    let in_band = bottom >= top && bottom <= top + platform.h / 2.0;
    let crossed = prev_bottom <= top && bottom >= top;
    in_band || crossed
}

/// Stomp test: middle halves overlap horizontally, the player's bottom edge is
/// inside the enemy's top third, and the player is descending
pub fn is_stomp(player: &Rect, vel_y: f32, enemy: &Rect) -> bool {
    let bottom = player.bottom();
    vel_y > 0.0
        && player.middle_half().overlaps_horizontally(&enemy.middle_half())
        && bottom >= enemy.top()
        && bottom <= enemy.top() + enemy.h / 3.0
}

/// Classify a player/enemy pair. Stomp is checked first so one overlap never
/// counts as both.
pub fn classify_enemy_contact(player: &Rect, vel_y: f32, enemy: &Rect) -> EnemyContact {
    if is_stomp(player, vel_y, enemy) {
        EnemyContact::Stomp
    } else if player.overlaps(enemy) {
        EnemyContact::Hit
    } else {
        EnemyContact::None
    }
}
