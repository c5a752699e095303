//! Meteor Rush - entity simulation core for a 2D arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, spawning, session flow)
//! - `config`: Data-driven game balance and difficulty presets
//! - `renderer`: Render sink abstraction consumed by an external drawing backend
//! - `error`: Configuration errors

pub mod config;
pub mod error;
pub mod renderer;
pub mod sim;

pub use config::{Difficulty, GameConfig, Ruleset};
pub use error::{ConfigError, Result};

use glam::Vec2;

/// Game-wide constants that are not part of the tunable configuration
pub mod consts {
    /// Target simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;

    /// Maximum weapon charge
    pub const MAX_CHARGE: f32 = 100.0;
    /// Charge that must be exceeded for a shot to leave the ship
    pub const MIN_FIRE_CHARGE: f32 = 5.0;

    /// Alpha channel ceiling; life counters map directly onto it
    pub const MAX_ALPHA: f32 = 255.0;

    /// Opacity multiplier for a finished session drawn behind the game-over screen
    pub const FINISHED_FADE: f32 = 0.15;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit heading vector for an orientation angle
#[inline]
pub fn heading(phi: f32) -> Vec2 {
    Vec2::new(phi.cos(), phi.sin())
}

/// Angle of the vector pointing from `from` to `to`
#[inline]
pub fn angle_towards(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
