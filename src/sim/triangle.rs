//! Patrolling triangles
//!
//! A triangle alternates between moving straight ahead and turning on the
//! spot. Mode changes are random with a configured mean duration. Leaving the
//! field kills it.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Respawn};
use super::geometry::point_in_isoceles;
use crate::config::GameConfig;
use crate::renderer::shapes::triangle_outline;
use crate::renderer::{Color, RenderSink, life_alpha};
use crate::{heading, polar_to_cartesian};

/// Movement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Movement {
    #[default]
    Moving,
    TurningLeft,
    TurningRight,
}

/// An isoceles triangle target. `pos` is the midpoint of its base; the far
/// vertex sits `half_length` ahead along `phi`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatrolTriangle {
    pub pos: Vec2,
    pub phi: f32,
    pub mode: Movement,
    pub life: i32,
    pub half_length: f32,
    pub half_width: f32,
}

impl PatrolTriangle {
    pub fn new(pos: Vec2, phi: f32, life: i32, half_length: f32, half_width: f32) -> Self {
        Self {
            pos,
            phi,
            mode: Movement::Moving,
            life,
            half_length,
            half_width,
        }
    }

    /// Center of mass, a third of the way from the base to the far vertex
    pub fn centroid(&self) -> Vec2 {
        self.pos + polar_to_cartesian(self.half_length / 3.0, self.phi)
    }

    /// True once the base midpoint has left the field
    pub fn is_outside_field(&self, width: f32, height: f32) -> bool {
        super::collision::is_outside(self.pos, width, height, 0.0)
    }

    fn randomize<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) {
        let field = &config.field;
        let margin = field.spawn_margin;
        self.pos = Vec2::new(
            rng.random_range(margin..=field.width - margin),
            rng.random_range(margin..=field.height - margin),
        );
        self.phi = rng.random_range(0.0..TAU);
        self.life = config.triangle.life.sample(rng);
        self.mode = Movement::Moving;
        self.half_length = config.triangle.half_length;
        self.half_width = config.triangle.half_width;
    }
}

impl Body for PatrolTriangle {
    fn advance<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) {
        let cfg = &config.triangle;
        match self.mode {
            Movement::Moving => {
                self.pos += heading(self.phi) * cfg.speed;
                if rng.random_ratio(1, cfg.move_ticks.saturating_add(1)) {
                    self.mode = if rng.random_bool(cfg.left_turn_weight) {
                        Movement::TurningLeft
                    } else {
                        Movement::TurningRight
                    };
                }
            }
            Movement::TurningLeft | Movement::TurningRight => {
                let dir = if self.mode == Movement::TurningLeft { 1.0 } else { -1.0 };
                self.phi += dir * cfg.turn_rate;
                if rng.random_ratio(1, cfg.turn_ticks.saturating_add(1)) {
                    self.mode = Movement::Moving;
                }
            }
        }
    }

    fn tick_lifecycle<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) {
        self.life -= rng.random_range(0..=config.triangle.max_decay);
    }

    fn is_expired(&self) -> bool {
        self.life <= 0
    }

    fn terminate(&mut self) {
        self.life = 0;
    }

    fn hit_test(&self, point: Vec2) -> bool {
        point_in_isoceles(point, self.pos, self.phi, self.half_length, self.half_width)
    }

    fn score_value<R: Rng + ?Sized>(&self, config: &GameConfig, rng: &mut R) -> u32 {
        let base = config.triangle.score.sample(rng) as f32;
        (base * config.triangle.score_factor).floor() as u32
    }

    fn render(&self, sink: &mut dyn RenderSink, fade: f32) {
        let outline = triangle_outline(self.pos, self.phi, self.half_length, self.half_width);
        sink.fill_polygon(&outline, Color::DEEP_BLUE, life_alpha(self.life, fade));
    }
}

impl Respawn for PatrolTriangle {
    fn spawn<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let mut triangle = PatrolTriangle::new(Vec2::ZERO, 0.0, 1, 1.0, 1.0);
        triangle.randomize(config, rng);
        triangle
    }

    fn reset<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) {
        self.randomize(config, rng);
    }
}
