//! Game state and session flow
//!
//! A `Session` owns every entity of one run plus the seeded RNG that drives
//! it. The `Game` controller walks the MENU -> PLAYING -> FINISHED -> MENU
//! cycle and holds the session for the current (or just finished) run.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Body, EntityKind, EntityRef};
use super::laser::Laser;
use super::meteorite::Meteorite;
use super::ship::Spaceship;
use super::spawner;
use super::target::CircularTarget;
use super::triangle::PatrolTriangle;
use crate::config::{Difficulty, GameConfig, Ruleset};
use crate::consts::FINISHED_FADE;
use crate::error::Result;
use crate::renderer::RenderSink;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to start a session
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Session over; entities frozen and drawn faded until acknowledged
    Finished,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    TimeUp,
    Collision,
    OutOfBounds,
}

/// Things that happened during a tick, drained by the host for feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    TargetHit { kind: EntityKind, points: u32 },
    Miss { penalty: u64 },
    LaserFired { pos: Vec2, speed: f32 },
    MeteoriteDestroyed { points: u32 },
    ShipLost { reason: FinishReason },
    SessionFinished { score: u64, reason: FinishReason },
}

/// Events kept between drains
pub const MAX_PENDING_EVENTS: usize = 256;

/// Bounded event queue. Once `MAX_PENDING_EVENTS` are pending, each new
/// event drops the oldest one.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventLog(VecDeque<GameEvent>);

impl EventLog {
    pub(crate) fn push(&mut self, event: GameEvent) {
        if self.0.len() >= MAX_PENDING_EVENTS {
            self.0.pop_front();
        }
        self.0.push_back(event);
    }

    fn drain(&mut self) -> Vec<GameEvent> {
        self.0.drain(..).collect()
    }
}

/// One run of the game
#[derive(Debug, Clone)]
pub struct Session {
    /// Configuration captured at session start; never changes afterwards
    pub config: GameConfig,
    pub(crate) rng: Pcg32,
    pub score: u64,
    /// Ticks simulated so far
    pub time_ticks: u64,
    /// Ticks until the timer runs out (`None` for untimed sessions)
    pub time_left: Option<u32>,
    pub targets: Vec<CircularTarget>,
    pub triangles: Vec<PatrolTriangle>,
    pub ship: Option<Spaceship>,
    pub meteorites: Vec<Meteorite>,
    pub lasers: Vec<Laser>,
    /// Set once a terminal condition is reached
    pub outcome: Option<FinishReason>,
    pub(crate) events: EventLog,
}

impl Session {
    /// Allocate a fresh population for `config` (assumed validated)
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let targets = spawner::populate(config.session.targets, &config, &mut rng);
        let triangles = spawner::populate(config.session.triangles, &config, &mut rng);
        let (ship, meteorites) = match config.session.ruleset {
            Ruleset::TargetPractice => (None, Vec::new()),
            Ruleset::MeteorShower => {
                let meteorites: Vec<Meteorite> = (0..config.meteorite.initial)
                    .map(|_| Meteorite::generate(&config, &mut rng))
                    .collect();
                (Some(Spaceship::spawn(&config)), meteorites)
            }
        };
        let time_left = config.session.duration_ticks;

        log::info!(
            "Session started: ruleset={:?} difficulty={} seed={}",
            config.session.ruleset,
            config.difficulty.as_str(),
            seed
        );

        Self {
            config,
            rng,
            score: 0,
            time_ticks: 0,
            time_left,
            targets,
            triangles,
            ship,
            meteorites,
            lasers: Vec::new(),
            outcome: None,
            events: EventLog::default(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Every live entity, in draw order
    pub fn entities(&self) -> impl Iterator<Item = EntityRef<'_>> {
        let targets = self.targets.iter().map(EntityRef::Target);
        let triangles = self.triangles.iter().map(EntityRef::Triangle);
        let meteorites = self.meteorites.iter().map(EntityRef::Meteorite);
        let lasers = self.lasers.iter().map(EntityRef::Laser);
        let ship = self.ship.iter().map(EntityRef::Ship);
        targets
            .chain(triangles)
            .chain(meteorites)
            .chain(lasers)
            .chain(ship)
            .filter(|e| !e.is_expired())
    }

    pub fn render(&self, sink: &mut dyn RenderSink, fade: f32) {
        for entity in self.entities() {
            entity.render(sink, fade);
        }
    }

    /// Take the events recorded since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub(crate) fn finish(&mut self, reason: FinishReason) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(reason);
        self.events.push(GameEvent::SessionFinished {
            score: self.score,
            reason,
        });
        log::info!(
            "Session finished: reason={:?} score={} ticks={}",
            reason,
            self.score,
            self.time_ticks
        );
    }

    pub(crate) fn ship_alive(&self) -> bool {
        self.ship.as_ref().is_some_and(|s| !s.is_expired())
    }
}

/// Top-level controller
#[derive(Debug, Clone)]
pub struct Game {
    phase: GamePhase,
    config: GameConfig,
    seed: u64,
    sessions_started: u64,
    session: Option<Session>,
    final_score: Option<u64>,
}

impl Game {
    /// Validates `config` up front; a bad configuration never reaches a session
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            phase: GamePhase::Menu,
            config,
            seed,
            sessions_started: 0,
            session: None,
            final_score: None,
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Score recorded at the last PLAYING -> FINISHED transition
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// MENU -> PLAYING with a fresh population. Ignored in other phases.
    pub fn start(&mut self) -> Result<()> {
        if self.phase != GamePhase::Menu {
            return Ok(());
        }
        self.config.validate()?;
        let seed = self.seed.wrapping_add(self.sessions_started);
        self.sessions_started += 1;
        self.session = Some(Session::new(self.config.clone(), seed));
        self.final_score = None;
        self.set_phase(GamePhase::Playing);
        Ok(())
    }

    /// FINISHED -> MENU. Ignored in other phases.
    pub fn acknowledge(&mut self) {
        if self.phase != GamePhase::Finished {
            return;
        }
        self.session = None;
        self.set_phase(GamePhase::Menu);
    }

    /// Switch presets; only allowed from the menu. Returns true if applied.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.phase != GamePhase::Menu {
            return false;
        }
        self.config.apply_difficulty(difficulty);
        log::info!("Difficulty set to {}", difficulty.as_str());
        true
    }

    /// Events from the current session since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session.as_mut().map(Session::drain_events).unwrap_or_default()
    }

    /// Draw the session: full opacity while playing, faded once finished
    pub fn render(&self, sink: &mut dyn RenderSink) {
        let fade = match self.phase {
            GamePhase::Menu => return,
            GamePhase::Playing => 1.0,
            GamePhase::Finished => FINISHED_FADE,
        };
        if let Some(session) = &self.session {
            session.render(sink, fade);
        }
    }

    /// PLAYING -> FINISHED once the session reports an outcome
    pub(crate) fn sync_phase(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let Some(session) = &self.session else {
            return;
        };
        if session.is_finished() {
            self.final_score = Some(session.score);
            self.set_phase(GamePhase::Finished);
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}
