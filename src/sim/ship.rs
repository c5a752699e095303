//! Player spaceship
//!
//! Thrust comes from the held direction keys, the heading follows the pointer,
//! and holding the pointer down charges the weapon until release.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{is_outside, triangle_touches_polygon};
use super::entity::Body;
use super::geometry::point_in_isoceles;
use super::laser::Laser;
use super::meteorite::Meteorite;
use crate::config::GameConfig;
use crate::consts::{MAX_ALPHA, MAX_CHARGE, MIN_FIRE_CHARGE};
use crate::renderer::shapes::triangle_outline;
use crate::renderer::{Color, RenderSink};
use crate::{angle_towards, heading};

/// Direction keys held during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spaceship {
    /// Midpoint of the base; the nose sits `half_length` ahead
    pub pos: Vec2,
    pub vel: Vec2,
    pub phi: f32,
    pub half_length: f32,
    pub half_width: f32,
    /// Weapon charge in `[0, MAX_CHARGE]`
    pub charge: f32,
    pub charging: bool,
    /// Point the ship turns towards (usually the pointer)
    pub aim: Option<Vec2>,
    pub alive: bool,
}

impl Spaceship {
    pub fn new(pos: Vec2, phi: f32, half_length: f32, half_width: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            phi,
            half_length,
            half_width,
            charge: 0.0,
            charging: false,
            aim: None,
            alive: true,
        }
    }

    /// Ship at the middle of the field, pointing up
    pub fn spawn(config: &GameConfig) -> Self {
        let center = Vec2::new(config.field.width, config.field.height) * 0.5;
        Spaceship::new(
            center,
            -std::f32::consts::FRAC_PI_2,
            config.ship.half_length,
            config.ship.half_width,
        )
    }

    pub fn nose(&self) -> Vec2 {
        self.pos + heading(self.phi) * self.half_length
    }

    /// Add one thrust impulse per held direction
    pub fn handle_directional_input(&mut self, pressed: &Directions, thrust: f32) {
        if pressed.up {
            self.vel.y -= thrust;
        }
        if pressed.down {
            self.vel.y += thrust;
        }
        if pressed.left {
            self.vel.x -= thrust;
        }
        if pressed.right {
            self.vel.x += thrust;
        }
    }

    pub fn start_charging(&mut self) {
        self.charging = true;
    }

    /// Release the trigger. A charge above the threshold leaves as a laser
    /// from the nose and resets to zero; a weaker charge is kept.
    pub fn fire(&mut self, config: &GameConfig) -> Option<Laser> {
        self.charging = false;
        if self.charge <= MIN_FIRE_CHARGE {
            return None;
        }
        let speed = self.charge / config.ship.laser_speed_divisor;
        let laser = Laser::new(self.nose(), heading(self.phi) * speed, config.laser.radius);
        log::debug!("laser fired: charge={:.1} speed={:.2}", self.charge, speed);
        self.charge = 0.0;
        Some(laser)
    }

    pub fn is_outside_field(&self, width: f32, height: f32) -> bool {
        is_outside(self.pos, width, height, 0.0)
    }

    pub fn is_colliding_with(&self, meteorite: &Meteorite) -> bool {
        triangle_touches_polygon(
            self.pos,
            self.phi,
            self.half_length,
            self.half_width,
            self.nose(),
            &meteorite.outline(),
        )
    }
}

impl Body for Spaceship {
    fn advance<R: Rng + ?Sized>(&mut self, config: &GameConfig, _rng: &mut R) {
        let cfg = &config.ship;
        self.pos += self.vel;
        self.vel *= cfg.damping;
        self.vel.y += cfg.gravity;
        if let Some(aim) = self.aim.filter(|aim| *aim != self.pos) {
            self.phi = angle_towards(self.pos, aim);
        }
        if self.charging {
            self.charge = (self.charge + cfg.charge_step).clamp(0.0, MAX_CHARGE);
        }
    }

    fn is_expired(&self) -> bool {
        !self.alive
    }

    fn terminate(&mut self) {
        self.alive = false;
    }

    fn hit_test(&self, point: Vec2) -> bool {
        point_in_isoceles(point, self.pos, self.phi, self.half_length, self.half_width)
    }

    fn score_value<R: Rng + ?Sized>(&self, _config: &GameConfig, _rng: &mut R) -> u32 {
        0
    }

    fn render(&self, sink: &mut dyn RenderSink, fade: f32) {
        let outline = triangle_outline(self.pos, self.phi, self.half_length, self.half_width);
        let alpha = (MAX_ALPHA * fade.clamp(0.0, 1.0)) as u8;
        sink.fill_polygon(&outline, Color::DEEP_BLUE, alpha);
    }
}
