//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per tick, no wall-clock time
//! - Seeded RNG only, passed in explicitly
//! - Stable iteration order (collection order)
//! - No rendering or platform dependencies beyond the `RenderSink` trait

pub mod collision;
pub mod entity;
pub mod geometry;
pub mod laser;
pub mod meteorite;
pub mod ship;
pub mod spawner;
pub mod state;
pub mod target;
pub mod tick;
pub mod triangle;

pub use collision::{WallCollision, WallContact, classify_walls, resample_velocity, resolve_laser_hits};
pub use entity::{Body, EntityKind, EntityRef, Respawn};
pub use geometry::{distance_squared, point_in_isoceles, point_in_polygon};
pub use laser::Laser;
pub use meteorite::Meteorite;
pub use ship::{Directions, Spaceship};
pub use state::{FinishReason, Game, GameEvent, GamePhase, MAX_PENDING_EVENTS, Session};
pub use target::CircularTarget;
pub use tick::{InputEvent, Key, TickInput, TickOutcome, tick};
pub use triangle::{Movement, PatrolTriangle};
