//! Laser projectiles fired by the spaceship

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{circle_touches_polygon, is_outside};
use super::entity::Body;
use super::geometry::distance_squared;
use super::meteorite::Meteorite;
use crate::config::GameConfig;
use crate::consts::MAX_ALPHA;
use crate::renderer::{Color, RenderSink};

/// A small gravity-affected projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Laser {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
}

impl Laser {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            alive: true,
        }
    }

    /// Contact with a meteorite: inside its outline, or within
    /// `radius + tolerance` of one of its edges
    pub fn is_hitting(&self, meteorite: &Meteorite, tolerance: f32) -> bool {
        circle_touches_polygon(self.pos, self.radius + tolerance, &meteorite.outline())
    }

    /// Fully past the field edge
    pub fn is_outside_field(&self, width: f32, height: f32) -> bool {
        is_outside(self.pos, width, height, self.radius)
    }
}

impl Body for Laser {
    fn advance<R: Rng + ?Sized>(&mut self, config: &GameConfig, _rng: &mut R) {
        self.pos += self.vel;
        self.vel.y += config.laser.gravity;
    }

    fn is_expired(&self) -> bool {
        !self.alive
    }

    fn terminate(&mut self) {
        self.alive = false;
    }

    fn hit_test(&self, point: Vec2) -> bool {
        distance_squared(point, self.pos) <= self.radius * self.radius
    }

    fn score_value<R: Rng + ?Sized>(&self, _config: &GameConfig, _rng: &mut R) -> u32 {
        0
    }

    fn render(&self, sink: &mut dyn RenderSink, fade: f32) {
        let alpha = (MAX_ALPHA * fade.clamp(0.0, 1.0)) as u8;
        sink.fill_circle(self.pos, self.radius, Color::CITRINE, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn square_meteorite(pos: Vec2) -> Meteorite {
        Meteorite::new(
            pos,
            Vec2::ZERO,
            0.0,
            vec![
                Vec2::new(-10.0, -10.0),
                Vec2::new(10.0, -10.0),
                Vec2::new(10.0, 10.0),
                Vec2::new(-10.0, 10.0),
            ],
        )
    }

    #[test]
    fn test_advance_applies_gravity_after_move() {
        let mut config = GameConfig::default();
        config.laser.gravity = 0.5;
        let mut rng = Pcg32::seed_from_u64(0);
        let mut laser = Laser::new(Vec2::ZERO, Vec2::new(2.0, 0.0), 4.0);
        laser.advance(&config, &mut rng);
        assert_eq!(laser.pos, Vec2::new(2.0, 0.0));
        assert_eq!(laser.vel, Vec2::new(2.0, 0.5));
        laser.advance(&config, &mut rng);
        assert_eq!(laser.pos, Vec2::new(4.0, 0.5));
    }

    #[test]
    fn test_hitting_inside_and_near_edge() {
        let meteorite = square_meteorite(Vec2::new(100.0, 100.0));
        let inside = Laser::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 0.0);
        assert!(inside.is_hitting(&meteorite, 0.0));

        // 3 units right of the edge: reach 4 + 0 touches, reach 1 + 1 misses
        let near = Laser::new(Vec2::new(113.0, 100.0), Vec2::ZERO, 4.0);
        assert!(near.is_hitting(&meteorite, 0.0));
        let thin = Laser::new(Vec2::new(113.0, 100.0), Vec2::ZERO, 1.0);
        assert!(!thin.is_hitting(&meteorite, 1.0));
        assert!(thin.is_hitting(&meteorite, 2.0));
    }

    #[test]
    fn test_outside_field() {
        let laser = Laser::new(Vec2::new(-5.0, 10.0), Vec2::ZERO, 4.0);
        assert!(laser.is_outside_field(100.0, 100.0));
        let laser = Laser::new(Vec2::new(-3.0, 10.0), Vec2::ZERO, 4.0);
        assert!(!laser.is_outside_field(100.0, 100.0));
    }

    #[test]
    fn test_terminate_is_idempotent() {
        let mut laser = Laser::new(Vec2::ZERO, Vec2::ZERO, 4.0);
        assert!(!laser.is_expired());
        laser.terminate();
        laser.terminate();
        assert!(laser.is_expired());
    }
}
