//! Collision tests between circular entities
//!
//! Everything in this game is a circle, so collision detection reduces to
//! center-distance checks. The one rule with teeth is lethality: a hit kills
//! the enemy only once its radius has shrunk below twice the projectile's.

use glam::Vec2;

use crate::consts::POWER_UP_PICKUP_RADIUS;
use crate::distance;

/// Outcome of a resolved projectile-enemy hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Enemy is destroyed: full-circle burst, +150
    Lethal,
    /// Enemy shrinks and survives: half-circle burst, +100
    NonLethal,
}

/// Two circles overlap when their center distance is strictly below the sum
/// of their radii.
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    distance(a_pos, b_pos) < a_radius + b_radius
}

/// Classify a hit. Equality resolves to non-lethal: the enemy survives until
/// its radius drops strictly below twice the projectile's.
#[inline]
pub fn resolve_hit(enemy_radius: f32, projectile_radius: f32) -> HitOutcome {
    if enemy_radius < 2.0 * projectile_radius {
        HitOutcome::Lethal
    } else {
        HitOutcome::NonLethal
    }
}

/// Power-up pickup test: within the sprite's half-extent plus the player's
/// current radius.
#[inline]
pub fn power_up_in_reach(player_pos: Vec2, player_radius: f32, power_up_pos: Vec2) -> bool {
    distance(player_pos, power_up_pos) < POWER_UP_PICKUP_RADIUS + player_radius
}
