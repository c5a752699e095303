//! Bouncing circular targets
//!
//! Targets drift in straight lines, resample their velocity when they touch a
//! wall, and fade out as their life counter runs down. Small fresh targets are
//! worth the most.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::collision::{WallCollision, classify_walls, resample_velocity};
use super::entity::{Body, Respawn};
use super::geometry::distance_squared;
use crate::config::GameConfig;
use crate::renderer::{Color, RenderSink, TARGET_PALETTE, life_alpha};

/// A circular target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularTarget {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Ticks left to live; dead at `<= 0`
    pub life: i32,
}

impl CircularTarget {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, life: i32) -> Self {
        Self {
            pos,
            vel,
            radius,
            color: Color::RED,
            life,
        }
    }

    /// Wall classification against the field
    pub fn wall_collision(&self, width: f32, height: f32) -> WallCollision {
        classify_walls(self.pos, self.vel, self.radius, width, height)
    }

    /// Resample velocity if touching a wall. Returns true when it bounced.
    pub fn resolve_walls<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) -> bool {
        let collision = self.wall_collision(config.field.width, config.field.height);
        if collision.is_clear() {
            return false;
        }
        self.vel = resample_velocity(collision, config.target.max_speed, rng);
        true
    }

    /// Unfloored score: `sqrt(life / radius) * 4 * factor`
    pub fn score_weight(&self, factor: f32) -> f32 {
        (self.life.max(0) as f32 / self.radius).sqrt() * 4.0 * factor
    }

    fn randomize<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) {
        let field = &config.field;
        let cfg = &config.target;
        let margin = field.spawn_margin;
        self.pos = Vec2::new(
            rng.random_range(margin..=field.width - margin),
            rng.random_range(margin..=field.height - margin),
        );
        self.radius = cfg.radius.sample(rng);
        self.life = cfg.life.sample(rng);
        self.color = *TARGET_PALETTE.choose(rng).unwrap_or(&Color::RED);
        self.vel = Vec2::new(
            rng.random_range(-cfg.max_speed..=cfg.max_speed),
            rng.random_range(-cfg.max_speed..=cfg.max_speed),
        );
    }
}

impl Body for CircularTarget {
    fn advance<R: Rng + ?Sized>(&mut self, _config: &GameConfig, _rng: &mut R) {
        self.pos += self.vel;
    }

    fn tick_lifecycle<R: Rng + ?Sized>(&mut self, _config: &GameConfig, _rng: &mut R) {
        self.life -= 1;
    }

    fn is_expired(&self) -> bool {
        self.life <= 0
    }

    fn terminate(&mut self) {
        self.life = 0;
    }

    fn hit_test(&self, point: Vec2) -> bool {
        distance_squared(point, self.pos) <= self.radius * self.radius
    }

    fn score_value<R: Rng + ?Sized>(&self, config: &GameConfig, _rng: &mut R) -> u32 {
        self.score_weight(config.target.score_factor).floor() as u32
    }

    fn render(&self, sink: &mut dyn RenderSink, fade: f32) {
        sink.fill_circle(self.pos, self.radius, self.color, life_alpha(self.life, fade));
    }
}

impl Respawn for CircularTarget {
    fn spawn<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let mut target = CircularTarget::new(Vec2::ZERO, Vec2::ZERO, 1.0, 1);
        target.randomize(config, rng);
        target
    }

    fn reset<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) {
        self.randomize(config, rng);
    }
}
