//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Reverse-index iteration wherever a pass removes entities in place
//! - No rendering or platform dependencies

pub mod bounds;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use bounds::Viewport;
pub use collision::{HitOutcome, circles_overlap, power_up_in_reach, resolve_hit};
pub use spawn::{burst_particles, spawn_enemy};
pub use state::{
    BackgroundParticle, Enemy, EnemyKind, GameEvent, GamePhase, GameState, Particle, Player,
    PowerUp, Projectile,
};
pub use tick::{TickInput, tick};
