//! Periodic entity spawners and particle burst construction
//!
//! Two independent fixed-interval timers run while a session is active: an
//! enemy spawner every 1.5 s and a power-up roll every 15 s. Both advance
//! only while the tab is visible.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::{PI, TAU};

use super::state::{Enemy, EnemyKind, GameState, Particle, PowerUp};
use crate::consts::*;
use crate::unit_toward;

/// Advance both spawn timers by one tick, firing any that come due
pub fn step_spawners(state: &mut GameState) {
    if state.spawners_paused {
        return;
    }
    state.enemy_spawn_timer += 1;
    if state.enemy_spawn_timer >= ENEMY_SPAWN_INTERVAL {
        state.enemy_spawn_timer = 0;
        spawn_enemy(state);
    }
    state.power_up_spawn_timer += 1;
    if state.power_up_spawn_timer >= POWER_UP_SPAWN_INTERVAL {
        state.power_up_spawn_timer = 0;
        maybe_spawn_power_up(state);
    }
}

/// Roll an enemy movement variant with fixed probability bands:
/// 10% spinning, 40% homing, 5% homing-spinning, 45% linear.
fn roll_kind(rng: &mut impl Rng) -> EnemyKind {
    let roll: f32 = rng.random();
    if roll < 0.10 {
        EnemyKind::Spinning
    } else if roll < 0.50 {
        EnemyKind::Homing
    } else if roll < 0.55 {
        EnemyKind::HomingSpinning
    } else {
        EnemyKind::Linear
    }
}

/// Place a new enemy just outside the circle circumscribing the viewport,
/// at a random angle, aimed loosely at the player.
pub fn spawn_enemy(state: &mut GameState) {
    let radius = state
        .rng
        .random_range(ENEMY_MIN_RADIUS..ENEMY_MAX_RADIUS);
    let ring = state.viewport.circumradius();
    let angle = state.rng.random_range(0.0..TAU);
    let center = state.viewport.center();
    let pos = Vec2::new(
        center.x + ring * angle.cos() + radius,
        center.y - ring * angle.sin() - radius,
    );
    let vel = (state.player.pos - pos) / ENEMY_LAUNCH_DIVISOR;
    let hue = state.rng.random_range(0.0..360.0);
    let kind = roll_kind(&mut state.rng);
    log::debug!("enemy spawn: r={radius:.1} kind={kind:?}");
    state.enemies.push(Enemy::new(pos, radius, hue, vel, kind));
}

/// With a coin flip and a population cap of five, drop a power-up somewhere
/// in the left third of the viewport with a small rightward drift.
pub fn maybe_spawn_power_up(state: &mut GameState) {
    if state.power_ups.len() >= MAX_POWER_UPS || !state.rng.random_bool(0.5) {
        return;
    }
    let pos = Vec2::new(
        state.rng.random_range(0.0..state.viewport.width / 3.0),
        state.rng.random_range(0.0..state.viewport.height),
    );
    let vel = Vec2::new(state.rng.random_range(0.0..POWER_UP_MAX_DRIFT), 0.0);
    state.power_ups.push(PowerUp::new(pos, vel));
}

/// Construct the debris burst for a projectile-enemy hit.
///
/// Lethal hits scatter `4 x enemy radius` particles in a full circle around
/// the enemy's last position; the caller orphans them into the session
/// collection. Non-lethal hits fan `2 x enemy radius` particles across a
/// half circle biased along the projectile's incidence direction, anchored
/// at the impact point; the surviving enemy owns them.
pub fn burst_particles(
    rng: &mut impl Rng,
    projectile_pos: Vec2,
    enemy_pos: Vec2,
    enemy_radius: f32,
    hue: f32,
    lethal: bool,
) -> Vec<Particle> {
    let count = if lethal {
        (enemy_radius * 4.0) as usize
    } else {
        (enemy_radius * 2.0) as usize
    };
    let span = if lethal { TAU } else { PI };
    let origin = if lethal { enemy_pos } else { projectile_pos };
    let max_scale = if lethal { 11.0 } else { 8.0 };
    // Fan axis for the non-lethal half circle
    let incidence = unit_toward(projectile_pos, enemy_pos).unwrap_or(Vec2::X);
    let side = incidence.perp();

    let mut burst = Vec::with_capacity(count);
    for i in 0..count {
        let theta = if count > 1 {
            i as f32 * span / (count - 1) as f32
        } else {
            0.0
        };
        let dir = if lethal {
            Vec2::from_angle(theta)
        } else {
            side * theta.cos() + incidence * theta.sin()
        };
        let speed = rng.random_range(0.0..max_scale);
        let radius = rng.random_range(0.0..3.0);
        let lifetime = rng.random_range(10.0..20.0);
        burst.push(Particle::new(origin, dir * speed, radius, hue, lifetime));
    }
    burst
}
