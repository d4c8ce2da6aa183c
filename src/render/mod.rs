//! Canvas-2D rendering
//!
//! Draws the whole scene once per display frame from a `GameState` snapshot.
//! The simulation never sees this module; it only reads state.

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use crate::sim::{GamePhase, GameState};

/// Renderer over a 2d canvas context
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self { ctx, width, height }
    }

    /// Track canvas size changes so the trail fill covers the full surface
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Draw one frame
    pub fn render(&self, state: &GameState) {
        // Translucent fill instead of a clear leaves motion trails
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.1)");
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);

        self.draw_background(state);

        if state.phase == GamePhase::NotStarted {
            return;
        }

        for pu in &state.power_ups {
            self.draw_power_up(pu);
        }

        self.draw_player(state);

        for projectile in &state.projectiles {
            let color = if projectile.auto { "yellow" } else { "white" };
            self.fill_circle(
                projectile.pos.x as f64,
                projectile.pos.y as f64,
                projectile.radius as f64,
                color,
                1.0,
            );
        }

        for enemy in &state.enemies {
            self.fill_circle(
                enemy.pos.x as f64,
                enemy.pos.y as f64,
                enemy.radius as f64,
                &hsl(enemy.hue),
                1.0,
            );
            for p in &enemy.particles {
                self.draw_particle(p);
            }
        }

        for p in &state.orphan_particles {
            self.draw_particle(p);
        }

        self.ctx.set_global_alpha(1.0);
    }

    fn draw_background(&self, state: &GameState) {
        for dot in &state.background {
            let color = match dot.hue {
                Some(hue) => hsl(hue),
                None => "rgb(200, 200, 200)".to_string(),
            };
            self.fill_circle(
                dot.pos.x as f64,
                dot.pos.y as f64,
                crate::consts::BACKGROUND_PARTICLE_RADIUS as f64,
                &color,
                dot.alpha as f64,
            );
        }
    }

    fn draw_player(&self, state: &GameState) {
        let player = &state.player;
        let color = if player.powered(state.ticks) {
            "yellow"
        } else {
            "white"
        };
        self.fill_circle(
            player.pos.x as f64,
            player.pos.y as f64,
            player.radius as f64,
            color,
            1.0,
        );
    }

    fn draw_particle(&self, p: &crate::sim::Particle) {
        self.fill_circle(
            p.pos.x as f64,
            p.pos.y as f64,
            p.radius as f64,
            &hsl(p.hue),
            p.alpha() as f64,
        );
    }

    /// Small rotating lightning-bolt sprite with a pulsing alpha
    fn draw_power_up(&self, pu: &crate::sim::PowerUp) {
        self.ctx.save();
        self.ctx.set_global_alpha(pu.alpha() as f64);
        let _ = self.ctx.translate(pu.pos.x as f64, pu.pos.y as f64);
        let _ = self.ctx.rotate(pu.angle as f64);
        self.ctx.set_fill_style_str("gold");
        self.ctx.begin_path();
        self.ctx.move_to(3.0, -9.0);
        self.ctx.line_to(-4.0, 1.0);
        self.ctx.line_to(0.0, 1.0);
        self.ctx.line_to(-3.0, 9.0);
        self.ctx.line_to(4.0, -1.0);
        self.ctx.line_to(0.0, -1.0);
        self.ctx.close_path();
        self.ctx.fill();
        self.ctx.restore();
    }

    fn fill_circle(&self, x: f64, y: f64, radius: f64, color: &str, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        let _ = self.ctx.arc(x, y, radius, 0.0, TAU);
        self.ctx.fill();
    }
}

fn hsl(hue: f32) -> String {
    format!("hsl({hue}, 50%, 50%)")
}
