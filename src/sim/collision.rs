//! Collision detection and response
//!
//! Circular targets bounce off the field walls by resampling their velocity
//! away from the wall (a soft bounce, not a reflection). Ships, lasers and
//! meteorites collide through the polygon predicates in `geometry`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{point_in_isoceles, point_in_polygon, polygon_edge_distance_squared};
use super::laser::Laser;
use super::meteorite::Meteorite;

/// Where a circle sits relative to one axis of the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallContact {
    /// Past the low wall and still heading into it
    BelowMin,
    InRange,
    /// Past the high wall and still heading into it
    AboveMax,
}

/// Per-axis wall classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallCollision {
    pub x: WallContact,
    pub y: WallContact,
}

impl WallCollision {
    pub const NONE: WallCollision = WallCollision {
        x: WallContact::InRange,
        y: WallContact::InRange,
    };

    #[inline]
    pub fn is_clear(&self) -> bool {
        *self == Self::NONE
    }
}

/// Classify one axis: `coord < radius` moving down, or `coord > bound - radius`
/// moving up, counts as a contact
#[inline]
pub fn classify_axis(coord: f32, velocity: f32, radius: f32, bound: f32) -> WallContact {
    if coord < radius && velocity < 0.0 {
        WallContact::BelowMin
    } else if coord > bound - radius && velocity > 0.0 {
        WallContact::AboveMax
    } else {
        WallContact::InRange
    }
}

pub fn classify_walls(pos: Vec2, vel: Vec2, radius: f32, width: f32, height: f32) -> WallCollision {
    WallCollision {
        x: classify_axis(pos.x, vel.x, radius, width),
        y: classify_axis(pos.y, vel.y, radius, height),
    }
}

/// Draw a new axis velocity that never points back into the touched wall
pub fn resample_axis<R: Rng + ?Sized>(contact: WallContact, max_speed: f32, rng: &mut R) -> f32 {
    match contact {
        WallContact::BelowMin => rng.random_range(1.0..=max_speed),
        WallContact::AboveMax => rng.random_range(-max_speed..=0.0),
        WallContact::InRange => rng.random_range(-max_speed..=max_speed),
    }
}

pub fn resample_velocity<R: Rng + ?Sized>(
    collision: WallCollision,
    max_speed: f32,
    rng: &mut R,
) -> Vec2 {
    Vec2::new(
        resample_axis(collision.x, max_speed, rng),
        resample_axis(collision.y, max_speed, rng),
    )
}

/// True when `pos` lies outside `[-margin, width + margin] x [-margin, height + margin]`
#[inline]
pub fn is_outside(pos: Vec2, width: f32, height: f32, margin: f32) -> bool {
    pos.x < -margin || pos.x > width + margin || pos.y < -margin || pos.y > height + margin
}

/// Small circle against a polygon outline: inside, or within `reach` of an edge
pub fn circle_touches_polygon(center: Vec2, reach: f32, outline: &[Vec2]) -> bool {
    point_in_polygon(center, outline) || polygon_edge_distance_squared(center, outline) <= reach * reach
}

/// Isoceles triangle against a polygon outline.
///
/// Hit when any outline vertex is inside the triangle, or the triangle's nose
/// is inside the outline (a large polygon can swallow the triangle without any
/// of its own vertices entering it).
pub fn triangle_touches_polygon(
    center: Vec2,
    phi: f32,
    length: f32,
    half_width: f32,
    nose: Vec2,
    outline: &[Vec2],
) -> bool {
    outline
        .iter()
        .any(|v| point_in_isoceles(*v, center, phi, length, half_width))
        || point_in_polygon(nose, outline)
}

/// Pairwise laser/meteorite pass.
///
/// Each live laser is matched against live meteorites; on contact both are
/// marked dead. Returns indices of destroyed meteorites in hit order.
pub fn resolve_laser_hits(lasers: &mut [Laser], meteorites: &mut [Meteorite], tolerance: f32) -> Vec<usize> {
    let mut destroyed = Vec::new();
    for laser in lasers.iter_mut().filter(|l| l.alive) {
        for (idx, meteorite) in meteorites.iter_mut().enumerate() {
            if !meteorite.alive {
                continue;
            }
            if laser.is_hitting(meteorite, tolerance) {
                laser.alive = false;
                meteorite.alive = false;
                destroyed.push(idx);
                break;
            }
        }
    }
    destroyed
}
