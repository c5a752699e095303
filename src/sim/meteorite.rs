//! Procedural meteorites
//!
//! A meteorite is a star-shaped polygon: vertices evenly spaced in angle, each
//! at its own random distance from the center. It drifts, spins and falls, and
//! only dies by laser hit or by leaving the field.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::is_outside;
use super::entity::Body;
use super::geometry::point_in_polygon;
use crate::config::GameConfig;
use crate::consts::MAX_ALPHA;
use crate::polar_to_cartesian;
use crate::renderer::shapes::transform_outline;
use crate::renderer::{Color, RenderSink};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meteorite {
    pub pos: Vec2,
    pub vel: Vec2,
    pub phi: f32,
    /// Angular velocity (radians per tick)
    pub omega: f32,
    /// Outline in the local frame, counter-clockwise
    pub vertices: Vec<Vec2>,
    pub alive: bool,
}

impl Meteorite {
    pub fn new(pos: Vec2, vel: Vec2, omega: f32, vertices: Vec<Vec2>) -> Self {
        Self {
            pos,
            vel,
            phi: 0.0,
            omega,
            vertices,
            alive: true,
        }
    }

    /// Random meteorite from the configured ranges
    pub fn generate<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let cfg = &config.meteorite;
        let n = cfg.vertex_count().sample(rng).max(3);
        let radius = cfg.vertex_radius();
        let vertices = (0..n)
            .map(|i| polar_to_cartesian(radius.sample(rng), TAU * i as f32 / n as f32))
            .collect();
        let pos = Vec2::new(cfg.spawn_x.sample(rng), cfg.spawn_y.sample(rng));
        let vel = Vec2::new(cfg.velocity_x.sample(rng), cfg.velocity_y.sample(rng));
        let omega = cfg.angular_velocity.sample(rng);
        Meteorite::new(pos, vel, omega, vertices)
    }

    /// Outline in world coordinates
    pub fn outline(&self) -> Vec<Vec2> {
        transform_outline(&self.vertices, self.pos, self.phi)
    }

    /// Distance from the center to the farthest vertex
    pub fn max_radius(&self) -> f32 {
        self.vertices.iter().map(|v| v.length()).fold(0.0, f32::max)
    }

    /// Entirely past the field edge, with no way for any vertex to be visible
    pub fn has_escaped(&self, width: f32, height: f32) -> bool {
        is_outside(self.pos, width, height, self.max_radius())
    }
}

impl Body for Meteorite {
    fn advance<R: Rng + ?Sized>(&mut self, config: &GameConfig, _rng: &mut R) {
        self.pos += self.vel;
        self.vel.y += config.meteorite.gravity;
        self.phi += self.omega;
    }

    fn is_expired(&self) -> bool {
        !self.alive
    }

    fn terminate(&mut self) {
        self.alive = false;
    }

    fn hit_test(&self, point: Vec2) -> bool {
        point_in_polygon(point, &self.outline())
    }

    fn score_value<R: Rng + ?Sized>(&self, config: &GameConfig, rng: &mut R) -> u32 {
        let base = config.meteorite.score.sample(rng) as f32;
        (base * config.meteorite.score_factor).floor() as u32
    }

    fn render(&self, sink: &mut dyn RenderSink, fade: f32) {
        let alpha = (MAX_ALPHA * fade.clamp(0.0, 1.0)) as u8;
        sink.fill_polygon(&self.outline(), Color::STONE, alpha);
    }
}
