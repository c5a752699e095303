//! Game configuration and difficulty presets
//!
//! A `GameConfig` is validated and cloned into each session at start, and is
//! never mutated while the session runs. Loaded from JSON; missing fields fall
//! back to the defaults below.

use std::f32::consts::TAU;
use std::path::Path;

use rand::Rng;
use rand::distr::uniform::SampleUniform;
use serde::{Deserialize, Serialize};

use crate::consts::TICK_RATE;
use crate::error::{ConfigError, Result};

/// Inclusive `[min, max]` range that entities draw attributes from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span<T> {
    pub min: T,
    pub max: T,
}

impl<T: SampleUniform + PartialOrd + Copy> Span<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Degenerate range that always samples `value`
    pub const fn fixed(value: T) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Uniform sample from the range (both ends included)
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        rng.random_range(self.min..=self.max)
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// Which game is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ruleset {
    /// Click fading targets and triangles before the timer runs out
    #[default]
    TargetPractice,
    /// Pilot the spaceship, shoot meteorites, survive
    MeteorShower,
}

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Softcore,
    #[default]
    Mediumcore,
    Hardcore,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Softcore,
        Difficulty::Mediumcore,
        Difficulty::Hardcore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Softcore => "Softcore",
            Difficulty::Mediumcore => "Mediumcore",
            Difficulty::Hardcore => "Hardcore",
        }
    }

    /// Cycle to the next preset (menu button behaviour)
    pub fn next(self) -> Self {
        match self {
            Difficulty::Softcore => Difficulty::Mediumcore,
            Difficulty::Mediumcore => Difficulty::Hardcore,
            Difficulty::Hardcore => Difficulty::Softcore,
        }
    }
}

/// Playing field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
    /// Distance from the walls kept free when pooled targets respawn
    pub spawn_margin: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 900.0,
            spawn_margin: 100.0,
        }
    }
}

/// Session-level rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub ruleset: Ruleset,
    /// Circular target pool size (N)
    pub targets: usize,
    /// Patrol triangle pool size (M)
    pub triangles: usize,
    /// Session length in ticks; `None` runs until a fatal collision
    pub duration_ticks: Option<u32>,
    /// Points lost on a click that hits nothing
    pub miss_penalty: u64,
    /// Points awarded every `survival_interval_ticks` while playing
    pub survival_bonus: u64,
    pub survival_interval_ticks: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ruleset: Ruleset::TargetPractice,
            targets: 5,
            triangles: 2,
            duration_ticks: Some(30 * TICK_RATE),
            miss_penalty: 3,
            survival_bonus: 0,
            survival_interval_ticks: TICK_RATE / 2,
        }
    }
}

/// Bouncing circular targets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Per-axis speed bound (MAX_V)
    pub max_speed: f32,
    pub radius: Span<f32>,
    /// Initial life counter in ticks
    pub life: Span<i32>,
    pub score_factor: f32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            max_speed: 4.0,
            radius: Span::new(30.0, 100.0),
            life: Span::new(150, 250),
            score_factor: 1.0,
        }
    }
}

/// Patrolling triangles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangleConfig {
    /// Length from the base to the far vertex (A)
    pub half_length: f32,
    /// Half of the base width (B)
    pub half_width: f32,
    /// Distance travelled per tick while moving
    pub speed: f32,
    /// Heading change per tick while turning
    pub turn_rate: f32,
    /// Average ticks spent moving before a turn
    pub move_ticks: u32,
    /// Average ticks spent turning
    pub turn_ticks: u32,
    /// Probability that a new turn goes left
    pub left_turn_weight: f64,
    pub life: Span<i32>,
    /// Upper bound of the random per-tick life decay
    pub max_decay: i32,
    pub score: Span<u32>,
    pub score_factor: f32,
}

impl Default for TriangleConfig {
    fn default() -> Self {
        Self {
            half_length: 60.0,
            half_width: 25.0,
            speed: 5.0,
            turn_rate: TAU / 60.0,
            move_ticks: 30,
            turn_ticks: 10,
            left_turn_weight: 2.0 / 3.0,
            life: Span::fixed(255),
            max_decay: 3,
            score: Span::new(5, 25),
            score_factor: 1.0,
        }
    }
}

/// Player spaceship and its weapon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    pub half_length: f32,
    pub half_width: f32,
    /// Velocity multiplier applied every tick
    pub damping: f32,
    /// Added to vy every tick
    pub gravity: f32,
    /// Impulse per pressed direction key per tick
    pub thrust: f32,
    /// Charge gained per tick while the trigger is held
    pub charge_step: f32,
    /// Laser speed = charge / divisor
    pub laser_speed_divisor: f32,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            half_length: 60.0,
            half_width: 25.0,
            damping: 0.9,
            gravity: 0.0,
            thrust: 1.0,
            charge_step: 2.0,
            laser_speed_divisor: 3.0,
        }
    }
}

/// Upper bound on `vertices + vertex_jitter`
pub const MAX_METEORITE_VERTICES: u32 = 256;

/// Procedural meteorites
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteoriteConfig {
    /// Mean vertex count (N)
    pub vertices: u32,
    /// Vertex count jitter (dN)
    pub vertex_jitter: u32,
    /// Mean vertex radius (R)
    pub radius: f32,
    /// Vertex radius jitter (dR)
    pub radius_jitter: f32,
    pub spawn_x: Span<f32>,
    pub spawn_y: Span<f32>,
    pub velocity_x: Span<f32>,
    pub velocity_y: Span<f32>,
    pub angular_velocity: Span<f32>,
    pub gravity: f32,
    /// Meteorites present when the session starts
    pub initial: usize,
    /// Logarithm base of the score-driven spawn rate; must exceed 1
    pub spawn_base: f32,
    /// Ticks between spawn rolls
    pub spawn_interval_ticks: u32,
    pub score: Span<u32>,
    pub score_factor: f32,
}

impl Default for MeteoriteConfig {
    fn default() -> Self {
        Self {
            vertices: 7,
            vertex_jitter: 2,
            radius: 40.0,
            radius_jitter: 15.0,
            spawn_x: Span::new(0.0, 1200.0),
            spawn_y: Span::fixed(0.0),
            velocity_x: Span::new(-2.0, 2.0),
            velocity_y: Span::new(0.5, 3.0),
            angular_velocity: Span::new(-0.05, 0.05),
            gravity: 0.02,
            initial: 2,
            spawn_base: 10.0,
            spawn_interval_ticks: 15,
            score: Span::new(10, 30),
            score_factor: 1.0,
        }
    }
}

impl MeteoriteConfig {
    pub fn vertex_count(&self) -> Span<u32> {
        Span::new(
            self.vertices.saturating_sub(self.vertex_jitter),
            self.vertices.saturating_add(self.vertex_jitter),
        )
    }

    pub fn vertex_radius(&self) -> Span<f32> {
        Span::new(self.radius - self.radius_jitter, self.radius + self.radius_jitter)
    }
}

/// Laser projectiles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserConfig {
    pub radius: f32,
    pub gravity: f32,
    /// Extra distance to a meteorite edge that still counts as a hit
    pub hit_tolerance: f32,
}

impl Default for LaserConfig {
    fn default() -> Self {
        Self {
            radius: 4.0,
            gravity: 0.05,
            hit_tolerance: 2.0,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub field: FieldConfig,
    pub session: SessionConfig,
    pub target: TargetConfig,
    pub triangle: TriangleConfig,
    pub ship: ShipConfig,
    pub meteorite: MeteoriteConfig,
    pub laser: LaserConfig,
}

impl GameConfig {
    /// Timed target clicking: N targets, M triangles
    pub fn target_practice() -> Self {
        Self::default()
    }

    /// Spaceship survival against meteorites
    pub fn meteor_shower() -> Self {
        Self {
            session: SessionConfig {
                ruleset: Ruleset::MeteorShower,
                targets: 0,
                triangles: 0,
                duration_ticks: None,
                survival_bonus: 1,
                ..SessionConfig::default()
            },
            ..Self::default()
        }
    }

    /// Parse a JSON document; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Return a copy tuned for `difficulty`
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.apply_difficulty(difficulty);
        self
    }

    /// Overwrite the difficulty-dependent fields
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        let (max_speed, radius, factor, tri_speed, tri_turn, base) = match difficulty {
            Difficulty::Softcore => (3.0, Span::new(40.0, 110.0), 0.75, 4.0, TAU / 75.0, 20.0),
            Difficulty::Mediumcore => (4.0, Span::new(30.0, 100.0), 1.0, 5.0, TAU / 60.0, 10.0),
            Difficulty::Hardcore => (6.0, Span::new(20.0, 70.0), 1.5, 7.0, TAU / 45.0, 5.0),
        };
        self.target.max_speed = max_speed;
        self.target.radius = radius;
        self.target.score_factor = factor;
        self.triangle.speed = tri_speed;
        self.triangle.turn_rate = tri_turn;
        self.triangle.score_factor = factor;
        self.meteorite.spawn_base = base;
        self.meteorite.score_factor = factor;
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let result = self.check();
        if let Err(err) = &result {
            log::warn!("Rejected configuration: {err}");
        }
        result
    }

    fn check(&self) -> Result<()> {
        let field = &self.field;
        if !(field.width > 0.0 && field.height > 0.0) {
            return Err(ConfigError::invalid("field", "width and height must be positive"));
        }
        if field.spawn_margin < 0.0
            || 2.0 * field.spawn_margin > field.width
            || 2.0 * field.spawn_margin > field.height
        {
            return Err(ConfigError::invalid(
                "field.spawn_margin",
                "margin must be non-negative and leave room inside the field",
            ));
        }

        if self.session.duration_ticks == Some(0) {
            return Err(ConfigError::invalid("session.duration_ticks", "must be positive"));
        }
        if self.session.survival_interval_ticks == 0 {
            return Err(ConfigError::invalid("session.survival_interval_ticks", "must be positive"));
        }

        let target = &self.target;
        if !(target.max_speed >= 1.0) {
            return Err(ConfigError::invalid("target.max_speed", "must be at least 1"));
        }
        check_span("target.radius", &target.radius)?;
        if !(target.radius.min > 0.0) {
            return Err(ConfigError::invalid("target.radius", "radius bounds must be positive"));
        }
        check_span("target.life", &target.life)?;
        if target.life.min <= 0 {
            return Err(ConfigError::invalid("target.life", "life range must be positive"));
        }
        check_factor("target.score_factor", target.score_factor)?;

        let tri = &self.triangle;
        if !(tri.half_length > 0.0 && tri.half_width > 0.0) {
            return Err(ConfigError::invalid("triangle", "half_length and half_width must be positive"));
        }
        check_span("triangle.life", &tri.life)?;
        if tri.life.min <= 0 {
            return Err(ConfigError::invalid("triangle.life", "life range must be positive"));
        }
        if tri.max_decay < 0 {
            return Err(ConfigError::invalid("triangle.max_decay", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&tri.left_turn_weight) {
            return Err(ConfigError::invalid("triangle.left_turn_weight", "must be a probability"));
        }
        check_span("triangle.score", &tri.score)?;
        check_factor("triangle.score_factor", tri.score_factor)?;

        let ship = &self.ship;
        if !(ship.half_length > 0.0 && ship.half_width > 0.0) {
            return Err(ConfigError::invalid("ship", "half_length and half_width must be positive"));
        }
        if !(0.0..=1.0).contains(&ship.damping) {
            return Err(ConfigError::invalid("ship.damping", "must be within [0, 1]"));
        }
        if !(ship.charge_step >= 0.0) {
            return Err(ConfigError::invalid("ship.charge_step", "must not be negative"));
        }
        if !(ship.laser_speed_divisor > 0.0) {
            return Err(ConfigError::invalid("ship.laser_speed_divisor", "must be positive"));
        }

        let met = &self.meteorite;
        if met.vertex_jitter > met.vertices.saturating_sub(3) {
            return Err(ConfigError::invalid(
                "meteorite.vertices",
                format!(
                    "polygon needs at least 3 vertices, got {} - {}",
                    met.vertices, met.vertex_jitter
                ),
            ));
        }
        if met
            .vertices
            .checked_add(met.vertex_jitter)
            .filter(|n| *n <= MAX_METEORITE_VERTICES)
            .is_none()
        {
            return Err(ConfigError::invalid(
                "meteorite.vertices",
                format!("polygon may have at most {MAX_METEORITE_VERTICES} vertices"),
            ));
        }
        if !(met.radius - met.radius_jitter > 0.0) || met.radius_jitter < 0.0 {
            return Err(ConfigError::invalid("meteorite.radius", "vertex radius bounds must be positive"));
        }
        check_span("meteorite.spawn_x", &met.spawn_x)?;
        check_span("meteorite.spawn_y", &met.spawn_y)?;
        check_span("meteorite.velocity_x", &met.velocity_x)?;
        check_span("meteorite.velocity_y", &met.velocity_y)?;
        check_span("meteorite.angular_velocity", &met.angular_velocity)?;
        check_span("meteorite.score", &met.score)?;
        check_factor("meteorite.score_factor", met.score_factor)?;
        if !(met.spawn_base > 1.0) {
            return Err(ConfigError::invalid("meteorite.spawn_base", "logarithm base must exceed 1"));
        }
        if met.spawn_interval_ticks == 0 {
            return Err(ConfigError::invalid("meteorite.spawn_interval_ticks", "must be positive"));
        }

        if !(self.laser.radius >= 0.0 && self.laser.hit_tolerance >= 0.0) {
            return Err(ConfigError::invalid("laser", "radius and hit_tolerance must not be negative"));
        }

        Ok(())
    }
}

fn check_span<T: SampleUniform + PartialOrd + Copy>(field: &'static str, span: &Span<T>) -> Result<()> {
    if span.is_ordered() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "min must not exceed max"))
    }
}

fn check_factor(field: &'static str, factor: f32) -> Result<()> {
    if factor >= 0.0 && factor.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be a finite non-negative number"))
    }
}
