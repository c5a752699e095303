//! Population management
//!
//! Targets and triangles live in fixed-size pools whose expired slots are
//! re-randomized in place. Meteorites are appended at a rate that grows with
//! the score and dropped once dead.

use rand::Rng;

use super::entity::{Body, Respawn};
use super::meteorite::Meteorite;
use crate::config::GameConfig;

/// Fill a pool of `count` fresh entities
pub fn populate<T: Respawn, R: Rng + ?Sized>(count: usize, config: &GameConfig, rng: &mut R) -> Vec<T> {
    (0..count).map(|_| T::spawn(config, rng)).collect()
}

/// Reset every expired slot in place. Returns how many were recycled.
pub fn recycle_expired<T: Respawn, R: Rng + ?Sized>(pool: &mut [T], config: &GameConfig, rng: &mut R) -> usize {
    let mut recycled = 0;
    for entity in pool.iter_mut().filter(|e| e.is_expired()) {
        entity.reset(config, rng);
        recycled += 1;
    }
    if recycled > 0 {
        log::debug!("recycled {} pooled entities", recycled);
    }
    recycled
}

/// Number of meteorites to add this round:
/// `floor(uniform(0, ln(base + score) / ln(base)))`
pub fn meteorite_spawn_count<R: Rng + ?Sized>(score: u64, base: f32, rng: &mut R) -> usize {
    let base = f64::from(base);
    let ceiling = (base + score as f64).ln() / base.ln();
    if !ceiling.is_finite() || ceiling <= 0.0 {
        return 0;
    }
    rng.random_range(0.0..=ceiling).floor() as usize
}

/// Append newly spawned meteorites. Returns how many were added.
pub fn spawn_meteorites<R: Rng + ?Sized>(
    meteorites: &mut Vec<Meteorite>,
    score: u64,
    config: &GameConfig,
    rng: &mut R,
) -> usize {
    let count = meteorite_spawn_count(score, config.meteorite.spawn_base, rng);
    meteorites.extend((0..count).map(|_| Meteorite::generate(config, rng)));
    if count > 0 {
        log::debug!("spawned {} meteorites (score {})", count, score);
    }
    count
}

/// Drop meteorites that were destroyed or left the field
pub fn cull_meteorites(meteorites: &mut Vec<Meteorite>, width: f32, height: f32) {
    meteorites.retain(|m| m.alive && !m.has_escaped(width, height));
}
