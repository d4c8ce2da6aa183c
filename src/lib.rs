//! Circle Blast - a browser arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `render`: Canvas-2D rendering (wasm only)
//! - `audio`: Procedural sound effects via the Web Audio API (wasm only)
//! - `settings`: Audio/visual preferences persisted to LocalStorage

pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod render;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation tick rate; one tick corresponds to one display frame
    pub const TICK_HZ: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 10.0;
    /// Velocity magnitude assigned per movement key press
    pub const PLAYER_SPEED: f32 = 4.0;
    /// Per-tick velocity damping for the player and debris particles
    pub const FRICTION: f32 = 0.95;
    /// Player radius multiplier while the machine gun is active
    pub const POWERED_RADIUS_SCALE: f32 = 1.5;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    pub const PROJECTILE_SPEED: f32 = 7.0;
    /// Machine-gun fire period (ticks)
    pub const AUTO_FIRE_PERIOD: u64 = 4;

    /// Enemy spawn interval (ticks; 1.5 s)
    pub const ENEMY_SPAWN_INTERVAL: u32 = 90;
    pub const ENEMY_MIN_RADIUS: f32 = 10.0;
    pub const ENEMY_MAX_RADIUS: f32 = 40.0;
    /// Initial enemy velocity is the vector to the player divided by this
    pub const ENEMY_LAUNCH_DIVISOR: f32 = 1000.0;
    /// Orbit radius for the spinning variants
    pub const SPIN_ORBIT_RADIUS: f32 = 30.0;
    /// Orbit angle increment per tick (radians)
    pub const SPIN_STEP: f32 = 0.1;

    /// Enemy radius scale on a non-lethal hit
    pub const SHRINK_SCALE: f32 = 0.6;
    /// Non-lethal shrink while the machine gun is active
    pub const POWERED_SHRINK_SCALE: f32 = 0.4;

    /// Power-up spawn interval (ticks; 15 s)
    pub const POWER_UP_SPAWN_INTERVAL: u32 = 900;
    /// Machine-gun window length (ticks; 15 s)
    pub const POWER_UP_DURATION: u64 = 900;
    /// Maximum simultaneously active power-ups
    pub const MAX_POWER_UPS: usize = 5;
    /// Collision half-extent of the power-up sprite
    pub const POWER_UP_PICKUP_RADIUS: f32 = 9.0;
    /// Maximum horizontal drift speed of a power-up
    pub const POWER_UP_MAX_DRIFT: f32 = 3.0;
    /// Sprite rotation per tick (radians)
    pub const POWER_UP_SPIN_STEP: f32 = 0.01;
    /// Half-period of the alpha pulse (ticks; 0.2 s each way)
    pub const POWER_UP_PULSE_TICKS: f32 = 12.0;

    /// Background particle grid spacing
    pub const BACKGROUND_GRID_STEP: f32 = 25.0;
    pub const BACKGROUND_PARTICLE_RADIUS: f32 = 1.5;
    /// Resting alpha the dots ease back toward after combat flashes
    pub const BACKGROUND_BASE_ALPHA: f32 = 0.1;
    pub const BACKGROUND_ALPHA_STEP: f32 = 0.01;

    /// Score awards
    pub const SCORE_LETHAL: u64 = 150;
    pub const SCORE_NON_LETHAL: u64 = 100;
}

/// Unit vector pointing from `from` toward `to`.
///
/// Returns `None` when the two points coincide; callers decide the fallback
/// instead of propagating a NaN velocity.
#[inline]
pub fn unit_toward(from: Vec2, to: Vec2) -> Option<Vec2> {
    let dir = to - from;
    let len_sq = dir.length_squared();
    if len_sq <= f32::EPSILON {
        None
    } else {
        Some(dir / len_sq.sqrt())
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_toward_is_normalized() {
        let dir = unit_toward(Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0)).unwrap();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir.x - 0.6).abs() < 1e-6);
        assert!((dir.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_unit_toward_coincident_points() {
        let p = Vec2::new(42.0, 17.0);
        assert!(unit_toward(p, p).is_none());
    }
}
