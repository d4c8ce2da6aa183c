//! Per-frame simulation step
//!
//! One `tick` corresponds to one display refresh. The step order within a
//! tick is fixed: spawners, background, player, projectiles, power-ups,
//! auto-fire, enemies (with collision resolution), orphaned debris. Every
//! pass that removes entities in place walks its collection in reverse index
//! order so removal never skips elements.

use glam::Vec2;

use super::collision::{HitOutcome, circles_overlap, power_up_in_reach, resolve_hit};
use super::spawn::{burst_particles, step_spawners};
use super::state::{GameEvent, GamePhase, GameState, Projectile};
use crate::consts::*;
use crate::{distance, unit_toward};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Discrete "shoot toward point" command (click/tap position)
    pub shoot: Option<Vec2>,
    /// Last known pointer position; target of machine-gun fire
    pub pointer: Vec2,
    /// Directional key presses; each sets the player's velocity outright on
    /// its axis, with no accumulation
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Reset and restart the session (start/restart button)
    pub restart: bool,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.restart {
        state.start();
    }
    if state.phase != GamePhase::Running {
        return;
    }

    state.ticks += 1;

    if input.up {
        state.player.vel.y = -PLAYER_SPEED;
    }
    if input.down {
        state.player.vel.y = PLAYER_SPEED;
    }
    if input.left {
        state.player.vel.x = -PLAYER_SPEED;
    }
    if input.right {
        state.player.vel.x = PLAYER_SPEED;
    }
    if let Some(target) = input.shoot {
        fire_projectile(state, target, false);
    }

    step_spawners(state);
    update_background(state);
    update_player(state);

    for projectile in &mut state.projectiles {
        projectile.advance();
    }

    update_power_ups(state);

    // Machine gun: a shot toward the pointer every 4th frame while powered
    if state.player.powered(state.ticks) && state.ticks % AUTO_FIRE_PERIOD == 0 {
        fire_projectile(state, input.pointer, true);
    }

    update_enemies(state);
    if state.phase == GamePhase::Ended {
        return;
    }

    // Orphaned debris outlives the enemy that spawned it
    for i in (0..state.orphan_particles.len()).rev() {
        state.orphan_particles[i].advance();
        if state.orphan_particles[i].expired() {
            state.orphan_particles.remove(i);
        }
    }
}

/// Spawn a projectile from the player toward `target`. A target coincident
/// with the player is rejected rather than producing a NaN velocity.
fn fire_projectile(state: &mut GameState, target: Vec2, auto: bool) {
    let Some(dir) = unit_toward(state.player.pos, target) else {
        log::debug!("shot rejected: target coincides with player");
        return;
    };
    state.projectiles.push(Projectile {
        pos: state.player.pos,
        vel: dir * PROJECTILE_SPEED,
        radius: PROJECTILE_RADIUS,
        auto,
    });
    state.events.push(GameEvent::Shot);
}

/// Alpha bands around the player: dots vanish inside 40 px, sit half-bright
/// in the 40-60 ring, and ease back toward the resting alpha further out.
fn update_background(state: &mut GameState) {
    let player_pos = state.player.pos;
    for bp in &mut state.background {
        let dist = distance(player_pos, bp.pos);
        if dist < 40.0 {
            bp.alpha = 0.0;
        } else if dist < 60.0 {
            bp.alpha = 0.5;
        } else if bp.alpha < BACKGROUND_BASE_ALPHA {
            bp.alpha += BACKGROUND_ALPHA_STEP;
        } else if bp.alpha > BACKGROUND_BASE_ALPHA {
            bp.alpha -= BACKGROUND_ALPHA_STEP;
        }
    }
}

fn update_player(state: &mut GameState) {
    let now = state.ticks;
    let player = &mut state.player;
    if player.powered(now) {
        player.radius = player.base_radius * POWERED_RADIUS_SCALE;
    } else {
        player.powered_until = None;
        player.radius = player.base_radius;
    }
    // Hard stop at the wall: friction and integration only apply when the
    // step would keep the player fully inside
    if state
        .viewport
        .stays_inside(player.pos, player.radius, player.vel)
    {
        player.vel *= FRICTION;
        player.pos += player.vel;
    } else {
        player.vel = Vec2::ZERO;
    }
}

fn update_power_ups(state: &mut GameState) {
    for i in (0..state.power_ups.len()).rev() {
        if state
            .viewport
            .fully_outside(state.power_ups[i].pos, POWER_UP_PICKUP_RADIUS)
        {
            state.power_ups.remove(i);
            continue;
        }
        state.power_ups[i].advance();
        if power_up_in_reach(state.player.pos, state.player.radius, state.power_ups[i].pos) {
            state.power_ups.remove(i);
            // Re-pickup re-arms a fresh window; durations never stack
            state.player.powered_until = Some(state.ticks + POWER_UP_DURATION);
            state.events.push(GameEvent::PowerUpCollected);
        }
    }
}

/// Enemy pass: despawn-by-exit, motion, player contact, owned debris, and
/// the projectile sweep with hit resolution.
fn update_enemies(state: &mut GameState) {
    let viewport = state.viewport;
    for ei in (0..state.enemies.len()).rev() {
        if state.enemies[ei].has_been_inside
            && viewport.fully_outside(state.enemies[ei].pos, state.enemies[ei].radius)
        {
            state.enemies.remove(ei);
            continue;
        }

        let player_pos = state.player.pos;
        state.enemies[ei].advance(player_pos, viewport);

        // Player contact is the terminal transition; score freezes here
        if circles_overlap(
            state.player.pos,
            state.player.radius,
            state.enemies[ei].pos,
            state.enemies[ei].radius,
        ) {
            state.phase = GamePhase::Ended;
            state.events.push(GameEvent::GameOver);
            log::info!("session ended at score {}", state.score);
            return;
        }

        // Debris owned by this enemy from earlier non-lethal hits
        {
            let enemy = &mut state.enemies[ei];
            for pi in (0..enemy.particles.len()).rev() {
                enemy.particles[pi].advance();
                if enemy.particles[pi].expired() {
                    enemy.particles.remove(pi);
                }
            }
        }

        for pi in (0..state.projectiles.len()).rev() {
            if viewport.fully_outside(state.projectiles[pi].pos, state.projectiles[pi].radius) {
                state.projectiles.remove(pi);
                continue;
            }
            let projectile = state.projectiles[pi];
            if !circles_overlap(
                projectile.pos,
                projectile.radius,
                state.enemies[ei].pos,
                state.enemies[ei].radius,
            ) {
                continue;
            }

            let powered = state.player.powered(state.ticks);
            match resolve_hit(state.enemies[ei].radius, projectile.radius) {
                HitOutcome::Lethal => {
                    let enemy = state.enemies.remove(ei);
                    let burst = burst_particles(
                        &mut state.rng,
                        projectile.pos,
                        enemy.pos,
                        enemy.radius,
                        enemy.hue,
                        true,
                    );
                    state.orphan_particles.extend(burst);
                    state.score += SCORE_LETHAL;
                    state.events.push(GameEvent::EnemyKilled {
                        pos: enemy.pos,
                        hue: enemy.hue,
                        score: SCORE_LETHAL,
                    });
                    tint_background(state, enemy.hue);
                    state.projectiles.remove(pi);
                    // Enemy is gone; nothing left for this sweep to hit
                    break;
                }
                HitOutcome::NonLethal => {
                    let (enemy_pos, hue, enemy_radius) = {
                        let enemy = &state.enemies[ei];
                        (enemy.pos, enemy.hue, enemy.radius)
                    };
                    let burst = burst_particles(
                        &mut state.rng,
                        projectile.pos,
                        enemy_pos,
                        enemy_radius,
                        hue,
                        false,
                    );
                    let scale = if powered {
                        POWERED_SHRINK_SCALE
                    } else {
                        SHRINK_SCALE
                    };
                    let enemy = &mut state.enemies[ei];
                    enemy.particles.extend(burst);
                    enemy.radius *= scale;
                    state.score += SCORE_NON_LETHAL;
                    state.events.push(GameEvent::EnemyHit {
                        pos: enemy_pos,
                        hue,
                        score: SCORE_NON_LETHAL,
                    });
                    tint_background(state, hue);
                    state.projectiles.remove(pi);
                }
            }
        }
    }
}

/// Combat tint: flash every background dot to the struck enemy's color; the
/// per-tick alpha bands then ease the flash back down.
fn tint_background(state: &mut GameState, hue: f32) {
    for bp in &mut state.background {
        bp.hue = Some(hue);
        bp.alpha = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bounds::Viewport;
    use crate::sim::state::{Enemy, EnemyKind, Particle, PowerUp};

    fn running_state() -> GameState {
        let mut state = GameState::new(Viewport::new(800.0, 600.0), 42);
        state.start();
        state.drain_events();
        state
    }

    fn still_enemy(pos: Vec2, radius: f32) -> Enemy {
        Enemy::new(pos, radius, 180.0, Vec2::ZERO, EnemyKind::Linear)
    }

    fn projectile_at(pos: Vec2) -> Projectile {
        Projectile {
            pos,
            vel: Vec2::ZERO,
            radius: PROJECTILE_RADIUS,
            auto: false,
        }
    }

    #[test]
    fn test_lethal_hit_awards_150_and_orphans_burst() {
        let mut state = running_state();
        // Keep the player well clear of the impact
        state.player.pos = Vec2::new(700.0, 500.0);
        let enemy_pos = Vec2::new(200.0, 200.0);
        state.enemies.push(still_enemy(enemy_pos, 8.0));
        state.projectiles.push(projectile_at(enemy_pos));

        tick(&mut state, &TickInput::default());

        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.score, 150);
        // Full-circle burst: 4x radius, orphaned but already advanced once
        // by the end-of-tick debris pass
        assert_eq!(state.orphan_particles.len(), 32);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::EnemyKilled { score: 150, .. }))
        );
        // Combat tint flashed the background
        assert!(state.background.iter().all(|bp| bp.hue == Some(180.0)));
    }

    #[test]
    fn test_non_lethal_hit_shrinks_and_awards_100() {
        let mut state = running_state();
        state.player.pos = Vec2::new(700.0, 500.0);
        let enemy_pos = Vec2::new(200.0, 200.0);
        state.enemies.push(still_enemy(enemy_pos, 12.0));
        state.projectiles.push(projectile_at(enemy_pos));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.enemies.len(), 1);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.score, 100);
        assert!((state.enemies[0].radius - 12.0 * SHRINK_SCALE).abs() < 1e-5);
        // Half-circle burst owned by the survivor: 2x radius
        assert_eq!(state.enemies[0].particles.len(), 24);
        assert!(state.orphan_particles.is_empty());
    }

    #[test]
    fn test_threshold_hit_is_non_lethal() {
        let mut state = running_state();
        state.player.pos = Vec2::new(700.0, 500.0);
        let enemy_pos = Vec2::new(200.0, 200.0);
        // Exactly twice the projectile radius
        state.enemies.push(still_enemy(enemy_pos, 10.0));
        state.projectiles.push(projectile_at(enemy_pos));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.score, 100);
    }

    #[test]
    fn test_powered_hits_shrink_harder() {
        let mut state = running_state();
        state.player.pos = Vec2::new(700.0, 500.0);
        state.player.powered_until = Some(10_000);
        let enemy_pos = Vec2::new(200.0, 200.0);
        state.enemies.push(still_enemy(enemy_pos, 20.0));
        state.projectiles.push(projectile_at(enemy_pos));

        tick(&mut state, &TickInput::default());

        assert!((state.enemies[0].radius - 20.0 * POWERED_SHRINK_SCALE).abs() < 1e-5);
    }

    #[test]
    fn test_score_is_monotonic_over_a_session() {
        let mut state = running_state();
        let mut last = 0;
        let input = TickInput {
            pointer: Vec2::new(400.0, 100.0),
            ..TickInput::default()
        };
        for _ in 0..600 {
            tick(&mut state, &input);
            assert!(state.score >= last);
            last = state.score;
            if state.phase == GamePhase::Ended {
                break;
            }
        }
    }

    #[test]
    fn test_shooting_own_position_is_rejected() {
        let mut state = running_state();
        let input = TickInput {
            shoot: Some(state.player.pos),
            ..TickInput::default()
        };
        tick(&mut state, &input);
        assert!(state.projectiles.is_empty());
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_shot_spawns_projectile_at_fixed_speed() {
        let mut state = running_state();
        let input = TickInput {
            shoot: Some(Vec2::new(800.0, 600.0)),
            ..TickInput::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.projectiles.len(), 1);
        assert!((state.projectiles[0].vel.length() - PROJECTILE_SPEED).abs() < 1e-4);
        assert!(state.drain_events().contains(&GameEvent::Shot));
    }

    #[test]
    fn test_player_contact_ends_session_and_freezes_score() {
        let mut state = running_state();
        state.score = 300;
        state
            .enemies
            .push(still_enemy(state.player.pos + Vec2::new(5.0, 0.0), 15.0));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Ended);
        assert!(state.drain_events().contains(&GameEvent::GameOver));

        // Further ticks are no-ops
        let ticks = state.ticks;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.ticks, ticks);
        assert_eq!(state.score, 300);
    }

    #[test]
    fn test_offscreen_spawn_survives_until_it_has_entered() {
        let mut state = running_state();
        let mut enemy = still_enemy(Vec2::new(-200.0, -200.0), 20.0);
        enemy.vel = Vec2::ZERO;
        state.enemies.push(enemy);

        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        // Fully outside but never latched inside: still alive
        assert!(!state.enemies.is_empty());

        state.enemies[0].has_been_inside = true;
        tick(&mut state, &TickInput::default());
        assert!(
            state
                .enemies
                .iter()
                .all(|e| e.pos != Vec2::new(-200.0, -200.0))
        );
    }

    #[test]
    fn test_power_up_pickup_arms_fresh_window() {
        let mut state = running_state();
        state.power_ups.push(PowerUp::new(state.player.pos, Vec2::ZERO));
        tick(&mut state, &TickInput::default());

        assert!(state.power_ups.is_empty());
        assert_eq!(state.player.powered_until, Some(state.ticks + POWER_UP_DURATION));
        assert!(state.drain_events().contains(&GameEvent::PowerUpCollected));

        // A second pickup later re-arms rather than extends
        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
        }
        state.power_ups.push(PowerUp::new(state.player.pos, Vec2::ZERO));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.powered_until, Some(state.ticks + POWER_UP_DURATION));
    }

    #[test]
    fn test_exited_power_up_is_dropped() {
        let mut state = running_state();
        state
            .power_ups
            .push(PowerUp::new(Vec2::new(900.0, 300.0), Vec2::new(1.0, 0.0)));
        tick(&mut state, &TickInput::default());
        assert!(state.power_ups.is_empty());
        assert!(state.player.powered_until.is_none());
    }

    #[test]
    fn test_machine_gun_fires_every_fourth_tick() {
        let mut state = running_state();
        state.player.powered_until = Some(10_000);
        let input = TickInput {
            pointer: Vec2::new(0.0, 0.0),
            ..TickInput::default()
        };
        for _ in 0..AUTO_FIRE_PERIOD as usize {
            tick(&mut state, &input);
        }
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.projectiles[0].auto);
    }

    #[test]
    fn test_player_hard_stops_at_wall() {
        let mut state = running_state();
        state.player.pos = Vec2::new(12.0, 300.0);
        state.player.vel = Vec2::new(-PLAYER_SPEED, 0.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert_eq!(state.player.pos, Vec2::new(12.0, 300.0));
    }

    #[test]
    fn test_movement_key_sets_velocity_outright() {
        let mut state = running_state();
        state.player.vel = Vec2::new(1.0, 1.0);
        let input = TickInput {
            left: true,
            ..TickInput::default()
        };
        tick(&mut state, &input);
        // Set to -4, then damped once by friction during integration
        assert!((state.player.vel.x + PLAYER_SPEED * FRICTION).abs() < 1e-5);
    }

    #[test]
    fn test_orphan_particles_pruned_on_expiry() {
        let mut state = running_state();
        state
            .orphan_particles
            .push(Particle::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 2.0, 50.0, 2.0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.orphan_particles.len(), 1);
        assert_eq!(state.orphan_particles[0].lifetime, 1.0);
        tick(&mut state, &TickInput::default());
        assert!(state.orphan_particles.is_empty());
    }

    #[test]
    fn test_powerup_expiry_restores_radius() {
        let mut state = running_state();
        state.player.powered_until = Some(state.ticks + 3);
        tick(&mut state, &TickInput::default());
        assert!((state.player.radius - PLAYER_RADIUS * POWERED_RADIUS_SCALE).abs() < 1e-5);
        tick(&mut state, &TickInput::default());
        tick(&mut state, &TickInput::default());
        // Deadline reached: radius and power-up state reset
        assert_eq!(state.player.radius, PLAYER_RADIUS);
        assert!(state.player.powered_until.is_none());
    }

    #[test]
    fn test_background_bands_track_player() {
        let mut state = running_state();
        state.player.pos = Vec2::new(400.0, 300.0);
        tick(&mut state, &TickInput::default());
        for bp in &state.background {
            let dist = distance(state.player.pos, bp.pos);
            if dist < 40.0 {
                assert_eq!(bp.alpha, 0.0);
            } else if dist < 60.0 {
                assert_eq!(bp.alpha, 0.5);
            }
        }
    }

    #[test]
    fn test_restart_input_resets_mid_session() {
        let mut state = running_state();
        state.score = 900;
        state.player.powered_until = Some(50_000);
        let input = TickInput {
            restart: true,
            ..TickInput::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.score, 0);
        assert!(state.player.powered_until.is_none());
        // The restarted session ticks immediately
        assert_eq!(state.ticks, 1);
    }
}
