//! Common entity contract
//!
//! Every game object implements `Body`. Pooled kinds also implement `Respawn`
//! so expired slots can be refreshed in place instead of reallocated.
//! `EntityRef` is the closed set of variants, used by passes that walk every
//! live entity (rendering, click hit tests).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::laser::Laser;
use super::meteorite::Meteorite;
use super::ship::Spaceship;
use super::target::CircularTarget;
use super::triangle::PatrolTriangle;
use crate::config::GameConfig;
use crate::renderer::RenderSink;

/// Operations shared by all entity variants
pub trait Body {
    /// Advance motion (and orientation/mode) by one tick
    fn advance<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R);

    /// Decrement the life counter. Never increments. Collision-only kinds do nothing.
    fn tick_lifecycle<R: Rng + ?Sized>(&mut self, _config: &GameConfig, _rng: &mut R) {}

    fn is_expired(&self) -> bool;

    /// Force the entity dead (idempotent)
    fn terminate(&mut self);

    fn hit_test(&self, point: Vec2) -> bool;

    /// Points for destroying this entity right now. Computed, never stored.
    fn score_value<R: Rng + ?Sized>(&self, config: &GameConfig, rng: &mut R) -> u32;

    /// Describe the entity to `sink`; `fade` scales opacity
    fn render(&self, sink: &mut dyn RenderSink, fade: f32);
}

/// Entities that live in fixed-size pools
pub trait Respawn: Body + Sized {
    /// Fresh randomized entity
    fn spawn<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self;

    /// Re-randomize in place: new attributes, fresh life
    fn reset<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R);
}

/// Variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Target,
    Triangle,
    Ship,
    Meteorite,
    Laser,
}

/// Borrowed view over any entity
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Target(&'a CircularTarget),
    Triangle(&'a PatrolTriangle),
    Ship(&'a Spaceship),
    Meteorite(&'a Meteorite),
    Laser(&'a Laser),
}

impl EntityRef<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Target(_) => EntityKind::Target,
            EntityRef::Triangle(_) => EntityKind::Triangle,
            EntityRef::Ship(_) => EntityKind::Ship,
            EntityRef::Meteorite(_) => EntityKind::Meteorite,
            EntityRef::Laser(_) => EntityKind::Laser,
        }
    }

    pub fn is_expired(&self) -> bool {
        match self {
            EntityRef::Target(e) => e.is_expired(),
            EntityRef::Triangle(e) => e.is_expired(),
            EntityRef::Ship(e) => e.is_expired(),
            EntityRef::Meteorite(e) => e.is_expired(),
            EntityRef::Laser(e) => e.is_expired(),
        }
    }

    pub fn hit_test(&self, point: Vec2) -> bool {
        match self {
            EntityRef::Target(e) => e.hit_test(point),
            EntityRef::Triangle(e) => e.hit_test(point),
            EntityRef::Ship(e) => e.hit_test(point),
            EntityRef::Meteorite(e) => e.hit_test(point),
            EntityRef::Laser(e) => e.hit_test(point),
        }
    }

    pub fn render(&self, sink: &mut dyn RenderSink, fade: f32) {
        match self {
            EntityRef::Target(e) => e.render(sink, fade),
            EntityRef::Triangle(e) => e.render(sink, fade),
            EntityRef::Ship(e) => e.render(sink, fade),
            EntityRef::Meteorite(e) => e.render(sink, fade),
            EntityRef::Laser(e) => e.render(sink, fade),
        }
    }
}
