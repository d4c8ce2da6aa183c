//! Viewport boundary predicates
//!
//! The three predicates below are the only boundary logic in the game; every
//! clamp and despawn decision derives from them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// The rectangular drawing surface, in pixels. Changes only between sessions
/// (window resize rebuilds the session).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Circle lies entirely within the viewport
    pub fn fully_inside(&self, pos: Vec2, radius: f32) -> bool {
        pos.x - radius >= 0.0
            && pos.x + radius <= self.width
            && pos.y - radius >= 0.0
            && pos.y + radius <= self.height
    }

    /// Circle lies entirely outside the viewport
    pub fn fully_outside(&self, pos: Vec2, radius: f32) -> bool {
        pos.x - radius > self.width
            || pos.y - radius > self.height
            || pos.x + radius < 0.0
            || pos.y + radius < 0.0
    }

    /// `fully_inside` evaluated one integration step ahead
    pub fn stays_inside(&self, pos: Vec2, radius: f32, velocity: Vec2) -> bool {
        self.fully_inside(pos + velocity, radius)
    }

    /// Center of the viewport
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Radius of the circle circumscribing the viewport. Enemies spawn just
    /// outside this ring so they always enter from off-screen.
    pub fn circumradius(&self) -> f32 {
        self.center().length()
    }
}
