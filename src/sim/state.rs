//! Game state and core simulation types
//!
//! Every collection lives exactly as long as the current session: `start`
//! clears and rebuilds all of it, which also voids any pending power-up
//! expiry from the previous session.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bounds::Viewport;
use crate::consts::*;
use crate::unit_toward;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting on the start button; nothing simulates
    NotStarted,
    /// Active gameplay
    Running,
    /// Player-enemy contact ended the session; score is frozen
    Ended,
}

/// The player-controlled circle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Radius restored when the power-up window closes
    pub base_radius: f32,
    /// Tick deadline of the machine-gun window, when armed
    pub powered_until: Option<u64>,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            base_radius: PLAYER_RADIUS,
            powered_until: None,
        }
    }

    /// Whether the machine-gun window is open at the given tick
    pub fn powered(&self, now: u64) -> bool {
        self.powered_until.is_some_and(|deadline| now < deadline)
    }
}

/// A fired shot; flies straight until it leaves the viewport or connects
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Spawned by the machine gun (renders in the accent color)
    pub auto: bool,
}

impl Projectile {
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }
}

/// Enemy movement variant, rolled once at spawn and fixed for life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Integrates its spawn velocity, nothing else
    Linear,
    /// Re-aims at the player every tick at unit speed
    Homing,
    /// Orbits a drifting center
    Spinning,
    /// Orbits a center that chases the player
    HomingSpinning,
}

/// An enemy circle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// HSL hue in [0, 360); saturation/lightness are fixed by the renderer
    pub hue: f32,
    pub kind: EnemyKind,
    /// Orbit state for the spinning variants
    pub orbit_center: Vec2,
    pub orbit_angle: f32,
    /// Latched the first time the enemy is observed fully inside the
    /// viewport; despawn-by-exit only applies afterwards
    pub has_been_inside: bool,
    /// Debris from non-lethal hits, pruned alongside the enemy
    pub particles: Vec<Particle>,
}

impl Enemy {
    pub fn new(pos: Vec2, radius: f32, hue: f32, vel: Vec2, kind: EnemyKind) -> Self {
        Self {
            pos,
            vel,
            radius,
            hue,
            kind,
            orbit_center: pos,
            orbit_angle: 0.0,
            has_been_inside: false,
            particles: Vec::new(),
        }
    }

    /// Per-tick motion, dispatched on the variant. Homing keeps its previous
    /// velocity if the player sits exactly on top of it.
    pub fn advance(&mut self, player_pos: Vec2, viewport: Viewport) {
        if viewport.fully_inside(self.pos, self.radius) {
            self.has_been_inside = true;
        }
        match self.kind {
            EnemyKind::Linear => {
                self.pos += self.vel;
            }
            EnemyKind::Homing => {
                if let Some(dir) = unit_toward(self.pos, player_pos) {
                    self.vel = dir;
                }
                self.pos += self.vel;
            }
            EnemyKind::Spinning => {
                self.orbit_center += self.vel;
                self.step_orbit();
            }
            EnemyKind::HomingSpinning => {
                if let Some(dir) = unit_toward(self.pos, player_pos) {
                    self.vel = dir;
                }
                self.orbit_center += self.vel;
                self.step_orbit();
            }
        }
    }

    fn step_orbit(&mut self) {
        self.orbit_angle += SPIN_STEP;
        self.pos = self.orbit_center + Vec2::from_angle(self.orbit_angle) * SPIN_ORBIT_RADIUS;
    }
}

/// Short-lived debris circle from a projectile hit
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub hue: f32,
    /// Remaining lifetime in ticks
    pub lifetime: f32,
    /// Lifetime at spawn, denominator of the fade alpha
    pub initial_lifetime: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, hue: f32, lifetime: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            hue,
            lifetime,
            initial_lifetime: lifetime,
        }
    }

    /// Fade alpha: fraction of lifetime remaining
    pub fn alpha(&self) -> f32 {
        self.lifetime / self.initial_lifetime
    }

    pub fn advance(&mut self) {
        self.vel *= FRICTION;
        self.pos += self.vel;
        self.lifetime -= 1.0;
    }

    /// Pruned on the first tick the remaining lifetime drops below one
    pub fn expired(&self) -> bool {
        self.lifetime < 1.0
    }
}

/// A floating machine-gun collectible
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    /// Fixed horizontal drift; no vertical motion
    pub vel: Vec2,
    /// Sprite rotation, advances continuously
    pub angle: f32,
    /// Phase of the alpha yoyo, in half-periods
    pub pulse: f32,
}

impl PowerUp {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            angle: 0.0,
            pulse: 0.0,
        }
    }

    pub fn advance(&mut self) {
        self.angle += POWER_UP_SPIN_STEP;
        self.pulse += 1.0 / POWER_UP_PULSE_TICKS;
        self.pos += self.vel;
    }

    /// Alpha pulses between full and near-zero on a repeating yoyo cycle
    pub fn alpha(&self) -> f32 {
        let t = self.pulse % 2.0;
        if t < 1.0 { 1.0 - t } else { t - 1.0 }
    }
}

/// Static decorative dot; alpha reacts to player proximity and combat
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BackgroundParticle {
    pub pos: Vec2,
    pub alpha: f32,
    /// Combat tint; `None` renders in the neutral base color
    pub hue: Option<f32>,
}

impl BackgroundParticle {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            alpha: BACKGROUND_BASE_ALPHA,
            hue: None,
        }
    }
}

/// Side effects crossing the sim boundary, drained by the platform layer
/// once per frame and mapped to audio and DOM updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A projectile was fired, manually or by the machine gun
    Shot,
    /// Non-lethal hit; anchor and color for the floating "+N" label
    EnemyHit { pos: Vec2, hue: f32, score: u64 },
    /// Lethal hit
    EnemyKilled { pos: Vec2, hue: f32, score: u64 },
    PowerUpCollected,
    /// Player-enemy contact ended the session
    GameOver,
}

/// Complete session state. Owns every live collection; nothing about a game
/// in progress lives outside this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub seed: u64,
    pub viewport: Viewport,
    pub phase: GamePhase,
    /// Frame counter; drives auto-fire cadence and power-up expiry
    pub ticks: u64,
    pub score: u64,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    /// Debris that outlived the enemy that spawned it
    pub orphan_particles: Vec<Particle>,
    pub power_ups: Vec<PowerUp>,
    pub background: Vec<BackgroundParticle>,
    /// Ticks since the last enemy spawn
    pub enemy_spawn_timer: u32,
    /// Ticks since the last power-up roll
    pub power_up_spawn_timer: u32,
    /// Set while the tab is hidden; freezes both spawn timers
    pub spawners_paused: bool,
    pub rng: Pcg32,
    /// Per-tick side effects, drained by the platform layer
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session in the `NotStarted` phase. Call [`GameState::start`]
    /// to begin play.
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        Self {
            seed,
            viewport,
            phase: GamePhase::NotStarted,
            ticks: 0,
            score: 0,
            player: Player::new(viewport.center()),
            projectiles: Vec::new(),
            enemies: Vec::new(),
            orphan_particles: Vec::new(),
            power_ups: Vec::new(),
            background: Vec::new(),
            enemy_spawn_timer: 0,
            power_up_spawn_timer: 0,
            spawners_paused: false,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Single entry and re-entry point: clears all collections, rebuilds the
    /// background grid for the current viewport, resets the score and frame
    /// counter, and places a fresh player at the center.
    ///
    /// Replacing the player also drops any pending power-up expiry, so a
    /// restart can never null out the new session's power-up state.
    pub fn start(&mut self) {
        self.phase = GamePhase::Running;
        self.ticks = 0;
        self.score = 0;
        self.player = Player::new(self.viewport.center());
        self.projectiles.clear();
        self.enemies.clear();
        self.orphan_particles.clear();
        self.power_ups.clear();
        self.enemy_spawn_timer = 0;
        self.power_up_spawn_timer = 0;
        self.rebuild_background();
        self.events.clear();
        log::info!(
            "session started ({}x{}, seed {})",
            self.viewport.width,
            self.viewport.height,
            self.seed
        );
    }

    /// Resize invalidates the running session and restarts with fresh
    /// geometry.
    pub fn restart_with_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.start();
    }

    /// One decorative dot per 25x25 cell, inclusive of one trailing cell
    /// past each edge so the grid covers the whole surface.
    fn rebuild_background(&mut self) {
        self.background.clear();
        let mut x = 0.0;
        while x < self.viewport.width + BACKGROUND_GRID_STEP {
            let mut y = 0.0;
            while y < self.viewport.height + BACKGROUND_GRID_STEP {
                self.background.push(BackgroundParticle::new(Vec2::new(x, y)));
                y += BACKGROUND_GRID_STEP;
            }
            x += BACKGROUND_GRID_STEP;
        }
    }

    /// Hand the frame's side effects to the platform layer
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_start_resets_session() {
        let mut state = GameState::new(viewport(), 1);
        state.start();
        state.score = 500;
        state.ticks = 123;
        state.enemies.push(Enemy::new(
            Vec2::new(10.0, 10.0),
            15.0,
            120.0,
            Vec2::ZERO,
            EnemyKind::Linear,
        ));
        state.player.powered_until = Some(9000);

        state.start();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.ticks, 0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.pos, viewport().center());
        // Pending expiry from the previous session is gone
        assert_eq!(state.player.powered_until, None);
    }

    #[test]
    fn test_background_grid_covers_viewport() {
        let mut state = GameState::new(Viewport::new(100.0, 50.0), 1);
        state.start();
        // x in {0, 25, 50, 75, 100}, y in {0, 25, 50}
        assert_eq!(state.background.len(), 5 * 3);
        assert!(
            state
                .background
                .iter()
                .all(|bp| bp.alpha == BACKGROUND_BASE_ALPHA && bp.hue.is_none())
        );
    }

    #[test]
    fn test_powered_window_is_half_open() {
        let mut player = Player::new(Vec2::ZERO);
        player.powered_until = Some(100);
        assert!(player.powered(99));
        assert!(!player.powered(100));
        assert!(!Player::new(Vec2::ZERO).powered(0));
    }

    #[test]
    fn test_particle_fade_alpha() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(1.0, 0.0), 2.0, 10.0, 16.0);
        assert_eq!(p.alpha(), 1.0);
        p.advance();
        assert!((p.alpha() - 15.0 / 16.0).abs() < 1e-6);
        assert!((p.vel.x - FRICTION).abs() < 1e-6);
    }

    #[test]
    fn test_particle_expires_below_one() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO, 2.0, 10.0, 1.5);
        assert!(!p.expired());
        p.advance();
        assert!(p.expired());
    }

    #[test]
    fn test_power_up_alpha_yoyo() {
        let mut pu = PowerUp::new(Vec2::ZERO, Vec2::new(1.0, 0.0));
        assert!((pu.alpha() - 1.0).abs() < 1e-6);
        for _ in 0..POWER_UP_PULSE_TICKS as usize {
            pu.advance();
        }
        // One half-period later the sprite is fully faded
        assert!(pu.alpha() < 1e-4);
        for _ in 0..POWER_UP_PULSE_TICKS as usize {
            pu.advance();
        }
        assert!((pu.alpha() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_spinning_enemy_orbits_drifting_center() {
        let mut enemy = Enemy::new(
            Vec2::new(100.0, 100.0),
            20.0,
            200.0,
            Vec2::new(1.0, 0.0),
            EnemyKind::Spinning,
        );
        enemy.advance(Vec2::new(400.0, 300.0), Viewport::new(800.0, 600.0));
        assert_eq!(enemy.orbit_center, Vec2::new(101.0, 100.0));
        let expected = enemy.orbit_center + Vec2::from_angle(SPIN_STEP) * SPIN_ORBIT_RADIUS;
        assert!((enemy.pos - expected).length() < 1e-4);
    }

    #[test]
    fn test_homing_enemy_moves_at_unit_speed() {
        let mut enemy = Enemy::new(
            Vec2::new(0.0, 0.0),
            20.0,
            200.0,
            Vec2::new(0.2, 0.1),
            EnemyKind::Homing,
        );
        enemy.advance(Vec2::new(300.0, 400.0), Viewport::new(800.0, 600.0));
        assert!((enemy.vel.length() - 1.0).abs() < 1e-6);
        assert!((enemy.pos - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }

    #[test]
    fn test_homing_enemy_on_top_of_player_keeps_velocity() {
        let player = Vec2::new(50.0, 50.0);
        let mut enemy = Enemy::new(player, 20.0, 200.0, Vec2::new(0.5, 0.0), EnemyKind::Homing);
        enemy.advance(player, Viewport::new(800.0, 600.0));
        // No NaN, previous velocity carried through
        assert_eq!(enemy.pos, player + Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_enemy_latches_inside_flag() {
        let vp = Viewport::new(800.0, 600.0);
        let mut enemy = Enemy::new(
            Vec2::new(-100.0, -100.0),
            20.0,
            200.0,
            Vec2::ZERO,
            EnemyKind::Linear,
        );
        enemy.advance(vp.center(), vp);
        assert!(!enemy.has_been_inside);
        enemy.pos = vp.center();
        enemy.advance(vp.center(), vp);
        assert!(enemy.has_been_inside);
    }
}
