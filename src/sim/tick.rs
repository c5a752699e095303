//! Fixed timestep simulation tick
//!
//! Drains the input events for one frame, routes them to the game controller,
//! then advances the session by exactly one step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::resolve_laser_hits;
use super::entity::{Body, EntityKind};
use super::ship::Directions;
use super::spawner;
use super::state::{FinishReason, Game, GameEvent, GamePhase, Session};
use crate::config::Ruleset;

/// Keys the core reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
    Tab,
    Other,
}

/// Discrete input events, in arrival order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Quit,
    PointerDown(Vec2),
    PointerUp(Vec2),
    KeyDown(Key),
    KeyUp(Key),
    /// Menu button: begin a session
    Start,
    /// Game-over screen dismissed
    Acknowledge,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
    /// Direction keys currently held
    pub pressed: Directions,
    /// Current pointer position, if known
    pub pointer: Option<Vec2>,
}

impl TickInput {
    pub fn with_events(events: Vec<InputEvent>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

/// Advance the game by one fixed timestep
pub fn tick(game: &mut Game, input: &TickInput) -> TickOutcome {
    let mut outcome = TickOutcome::Continue;
    for event in &input.events {
        if game.handle_event(*event) == TickOutcome::Quit {
            outcome = TickOutcome::Quit;
        }
    }
    game.progress(&input.pressed, input.pointer);
    outcome
}

impl Game {
    /// Route one event according to the current phase
    pub fn handle_event(&mut self, event: InputEvent) -> TickOutcome {
        match (self.phase(), event) {
            (_, InputEvent::Quit) | (_, InputEvent::KeyDown(Key::Escape)) => return TickOutcome::Quit,
            (GamePhase::Menu, InputEvent::Start | InputEvent::KeyDown(Key::Enter | Key::Space)) => {
                if let Err(err) = self.start() {
                    log::error!("Cannot start session: {err}");
                }
            }
            (GamePhase::Menu, InputEvent::KeyDown(Key::Tab)) => {
                let next = self.config().difficulty.next();
                self.set_difficulty(next);
            }
            (GamePhase::Finished, InputEvent::Acknowledge | InputEvent::KeyDown(Key::Enter | Key::Space)) => {
                self.acknowledge();
            }
            (GamePhase::Playing, InputEvent::PointerDown(pos)) => {
                if let Some(session) = self.session_mut() {
                    session.pointer_down(pos);
                }
                self.sync_phase();
            }
            (GamePhase::Playing, InputEvent::PointerUp(pos)) => {
                if let Some(session) = self.session_mut() {
                    session.pointer_up(pos);
                }
            }
            _ => {}
        }
        TickOutcome::Continue
    }

    /// One simulation step. Does nothing outside PLAYING.
    pub fn progress(&mut self, pressed: &Directions, pointer: Option<Vec2>) {
        if self.phase() != GamePhase::Playing {
            return;
        }
        if let Some(session) = self.session_mut() {
            session.progress(pressed, pointer);
        }
        self.sync_phase();
    }
}

impl Session {
    /// Pointer pressed: a click in target practice, start charging otherwise
    pub fn pointer_down(&mut self, pos: Vec2) {
        if self.is_finished() {
            return;
        }
        match self.config.session.ruleset {
            Ruleset::TargetPractice => self.click(pos),
            Ruleset::MeteorShower => {
                if let Some(ship) = self.ship.as_mut().filter(|s| !s.is_expired()) {
                    ship.aim = Some(pos);
                    ship.start_charging();
                }
            }
        }
    }

    /// Pointer released: fire whatever charge the ship has built
    pub fn pointer_up(&mut self, pos: Vec2) {
        if self.is_finished() {
            return;
        }
        let Some(ship) = self.ship.as_mut().filter(|s| !s.is_expired()) else {
            return;
        };
        ship.aim = Some(pos);
        if let Some(laser) = ship.fire(&self.config) {
            self.events.push(GameEvent::LaserFired {
                pos: laser.pos,
                speed: laser.vel.length(),
            });
            self.lasers.push(laser);
        }
    }

    /// Hit-test every live clickable entity. Each hit scores and dies; a
    /// click that hits nothing costs the miss penalty.
    pub fn click(&mut self, point: Vec2) {
        if self.is_finished() {
            return;
        }
        let mut hits = 0;
        for target in self.targets.iter_mut() {
            if target.is_expired() || !target.hit_test(point) {
                continue;
            }
            let points = target.score_value(&self.config, &mut self.rng);
            target.terminate();
            self.score += u64::from(points);
            self.events.push(GameEvent::TargetHit {
                kind: EntityKind::Target,
                points,
            });
            hits += 1;
        }
        for triangle in self.triangles.iter_mut() {
            if triangle.is_expired() || !triangle.hit_test(point) {
                continue;
            }
            let points = triangle.score_value(&self.config, &mut self.rng);
            triangle.terminate();
            self.score += u64::from(points);
            self.events.push(GameEvent::TargetHit {
                kind: EntityKind::Triangle,
                points,
            });
            hits += 1;
        }
        if hits == 0 {
            let penalty = self.config.session.miss_penalty;
            self.score = self.score.saturating_sub(penalty);
            self.events.push(GameEvent::Miss { penalty });
        }
    }

    /// Run the per-tick protocol once. A finished session stays frozen.
    pub fn progress(&mut self, pressed: &Directions, pointer: Option<Vec2>) {
        if self.is_finished() {
            return;
        }
        self.time_ticks += 1;

        self.advance_all(pressed, pointer);
        self.resolve_collisions();
        self.run_spawner();
        self.run_lifecycles();
        self.award_survival();
        self.check_terminal();
    }

    fn advance_all(&mut self, pressed: &Directions, pointer: Option<Vec2>) {
        let config = &self.config;
        let rng = &mut self.rng;
        for target in self.targets.iter_mut() {
            target.advance(config, rng);
        }
        for triangle in self.triangles.iter_mut() {
            triangle.advance(config, rng);
        }
        if let Some(ship) = self.ship.as_mut().filter(|s| !s.is_expired()) {
            ship.handle_directional_input(pressed, config.ship.thrust);
            if pointer.is_some() {
                ship.aim = pointer;
            }
            ship.advance(config, rng);
        }
        for meteorite in self.meteorites.iter_mut() {
            meteorite.advance(config, rng);
        }
        for laser in self.lasers.iter_mut() {
            laser.advance(config, rng);
        }
    }

    fn resolve_collisions(&mut self) {
        let (width, height) = (self.config.field.width, self.config.field.height);

        for target in self.targets.iter_mut() {
            target.resolve_walls(&self.config, &mut self.rng);
        }
        for triangle in self.triangles.iter_mut() {
            if triangle.is_outside_field(width, height) {
                triangle.terminate();
            }
        }

        let destroyed = resolve_laser_hits(&mut self.lasers, &mut self.meteorites, self.config.laser.hit_tolerance);
        for idx in destroyed {
            let points = self.meteorites[idx].score_value(&self.config, &mut self.rng);
            self.score += u64::from(points);
            self.events.push(GameEvent::MeteoriteDestroyed { points });
        }
        for laser in self.lasers.iter_mut() {
            if laser.is_outside_field(width, height) {
                laser.terminate();
            }
        }

        if let Some(ship) = self.ship.as_mut().filter(|s| !s.is_expired()) {
            let hit = self
                .meteorites
                .iter()
                .any(|m| m.alive && ship.is_colliding_with(m));
            if hit {
                ship.terminate();
                self.events.push(GameEvent::ShipLost {
                    reason: FinishReason::Collision,
                });
            }
        }
    }

    fn run_spawner(&mut self) {
        if self.config.session.ruleset != Ruleset::MeteorShower {
            return;
        }
        let interval = u64::from(self.config.meteorite.spawn_interval_ticks.max(1));
        if self.time_ticks % interval == 0 {
            spawner::spawn_meteorites(&mut self.meteorites, self.score, &self.config, &mut self.rng);
        }
    }

    fn run_lifecycles(&mut self) {
        let config = &self.config;
        let rng = &mut self.rng;
        for target in self.targets.iter_mut() {
            target.tick_lifecycle(config, rng);
        }
        for triangle in self.triangles.iter_mut() {
            triangle.tick_lifecycle(config, rng);
        }
        spawner::recycle_expired(&mut self.targets, config, rng);
        spawner::recycle_expired(&mut self.triangles, config, rng);
        spawner::cull_meteorites(&mut self.meteorites, config.field.width, config.field.height);
        self.lasers.retain(|l| l.alive);
    }

    fn award_survival(&mut self) {
        let bonus = self.config.session.survival_bonus;
        if bonus == 0 || !self.ship_alive() {
            return;
        }
        let interval = u64::from(self.config.session.survival_interval_ticks.max(1));
        if self.time_ticks % interval == 0 {
            self.score += bonus;
        }
    }

    fn check_terminal(&mut self) {
        if let Some(ship) = &self.ship {
            if ship.is_expired() {
                self.finish(FinishReason::Collision);
                return;
            }
            if ship.is_outside_field(self.config.field.width, self.config.field.height) {
                self.events.push(GameEvent::ShipLost {
                    reason: FinishReason::OutOfBounds,
                });
                self.finish(FinishReason::OutOfBounds);
                return;
            }
        }
        if let Some(left) = self.time_left.as_mut() {
            *left = left.saturating_sub(1);
            if *left == 0 {
                self.finish(FinishReason::TimeUp);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, Span};
    use crate::sim::laser::Laser;
    use crate::sim::meteorite::Meteorite;

    fn single_target_config() -> GameConfig {
        let mut config = GameConfig::target_practice();
        config.session.targets = 1;
        config.session.triangles = 0;
        config.target.life = Span::fixed(50);
        config.target.radius = Span::fixed(10.0);
        config
    }

    fn playing(config: GameConfig, seed: u64) -> Game {
        let mut game = Game::new(config, seed).unwrap();
        game.start().unwrap();
        game
    }

    #[test]
    fn test_click_awards_score_and_expires_target() {
        let mut session = Session::new(single_target_config(), 1);
        session.targets[0].pos = Vec2::new(100.0, 100.0);
        session.click(Vec2::new(100.0, 100.0));
        assert_eq!(session.score, 8);
        assert!(session.targets[0].is_expired());
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::TargetHit {
                kind: EntityKind::Target,
                points: 8
            }]
        );
    }

    #[test]
    fn test_miss_penalty_floors_at_zero() {
        let mut session = Session::new(single_target_config(), 1);
        session.targets[0].pos = Vec2::new(100.0, 100.0);
        session.score = 4;
        session.click(Vec2::new(900.0, 700.0));
        assert_eq!(session.score, 1);
        session.click(Vec2::new(900.0, 700.0));
        assert_eq!(session.score, 0);
        session.click(Vec2::new(900.0, 700.0));
        assert_eq!(session.score, 0);
    }

    #[test]
    fn test_click_hits_triangle() {
        let mut config = single_target_config();
        config.session.targets = 0;
        config.session.triangles = 1;
        let mut session = Session::new(config.clone(), 4);
        let centroid = session.triangles[0].centroid();
        session.click(centroid);
        assert!(session.triangles[0].is_expired());
        assert!(config.triangle.score.contains(session.score as u32));
    }

    #[test]
    fn test_timer_finishes_session_and_freezes_score() {
        let mut config = single_target_config();
        config.session.duration_ticks = Some(2);
        let mut game = playing(config, 3);
        assert_eq!(game.phase(), GamePhase::Playing);

        tick(&mut game, &TickInput::default());
        assert_eq!(game.phase(), GamePhase::Playing);
        tick(&mut game, &TickInput::default());
        assert_eq!(game.phase(), GamePhase::Finished);
        assert_eq!(game.session().unwrap().outcome, Some(FinishReason::TimeUp));

        let score = game.final_score();
        let ticks = game.session().unwrap().time_ticks;
        for _ in 0..5 {
            tick(
                &mut game,
                &TickInput::with_events(vec![InputEvent::PointerDown(Vec2::new(5.0, 5.0))]),
            );
        }
        assert_eq!(game.final_score(), score);
        assert_eq!(game.session().unwrap().score, score.unwrap());
        assert_eq!(game.session().unwrap().time_ticks, ticks);
    }

    #[test]
    fn test_session_progress_frozen_once_finished() {
        let mut config = single_target_config();
        config.session.duration_ticks = Some(2);
        let mut session = Session::new(config, 1);
        session.progress(&Directions::default(), None);
        session.progress(&Directions::default(), None);
        assert!(session.is_finished());
        let snapshot = session.targets.clone();
        session.progress(&Directions::default(), None);
        assert_eq!(session.targets, snapshot);
    }

    #[test]
    fn test_full_phase_cycle_through_tick() {
        let mut config = single_target_config();
        config.session.duration_ticks = Some(1);
        let mut game = Game::new(config, 5).unwrap();
        tick(&mut game, &TickInput::with_events(vec![InputEvent::KeyDown(Key::Tab)]));
        assert_eq!(game.config().difficulty, crate::config::Difficulty::Hardcore);

        tick(&mut game, &TickInput::with_events(vec![InputEvent::KeyDown(Key::Enter)]));
        assert_eq!(game.phase(), GamePhase::Finished);

        tick(&mut game, &TickInput::with_events(vec![InputEvent::Acknowledge]));
        assert_eq!(game.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_quit_reported() {
        let mut game = Game::new(GameConfig::default(), 1).unwrap();
        let out = tick(&mut game, &TickInput::with_events(vec![InputEvent::Quit]));
        assert_eq!(out, TickOutcome::Quit);
        let out = tick(&mut game, &TickInput::default());
        assert_eq!(out, TickOutcome::Continue);
    }

    #[test]
    fn test_targets_recycled_when_life_runs_out() {
        let mut config = single_target_config();
        config.target.life = Span::fixed(3);
        config.session.duration_ticks = None;
        let mut session = Session::new(config, 8);
        for _ in 0..10 {
            session.progress(&Directions::default(), None);
            assert!(!session.targets[0].is_expired());
        }
        assert_eq!(session.targets.len(), 1);
    }

    #[test]
    fn test_deterministic_for_same_seed() {
        let run = |seed| {
            let mut game = Game::new(GameConfig::default(), seed).unwrap();
            tick(&mut game, &TickInput::with_events(vec![InputEvent::Start]));
            for i in 0..120 {
                let click = Vec2::new((i * 37 % 1200) as f32, (i * 53 % 900) as f32);
                tick(&mut game, &TickInput::with_events(vec![InputEvent::PointerDown(click)]));
            }
            let session = game.session().unwrap();
            (session.score, session.targets.clone(), session.triangles.clone())
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_meteor_shower_fire_and_destroy() {
        let mut config = GameConfig::meteor_shower();
        config.meteorite.initial = 0;
        config.meteorite.spawn_interval_ticks = u32::MAX;
        config.laser.gravity = 0.0;
        let mut game = playing(config, 11);

        // Square meteorite straight ahead of the ship's nose
        {
            let session = game.session_mut().unwrap();
            let ship = session.ship.as_ref().unwrap();
            let ahead = ship.nose() + crate::heading(ship.phi) * 80.0;
            session.meteorites.push(Meteorite::new(
                ahead,
                Vec2::ZERO,
                0.0,
                vec![
                    Vec2::new(-20.0, -20.0),
                    Vec2::new(20.0, -20.0),
                    Vec2::new(20.0, 20.0),
                    Vec2::new(-20.0, 20.0),
                ],
            ));
        }

        let aim = {
            let ship = game.session().unwrap().ship.as_ref().unwrap();
            ship.nose() + crate::heading(ship.phi) * 500.0
        };
        tick(&mut game, &TickInput::with_events(vec![InputEvent::PointerDown(aim)]));
        for _ in 0..20 {
            tick(&mut game, &TickInput::default());
        }
        tick(&mut game, &TickInput::with_events(vec![InputEvent::PointerUp(aim)]));
        let events = game.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::LaserFired { .. })));

        for _ in 0..60 {
            tick(&mut game, &TickInput::default());
        }
        let session = game.session().unwrap();
        assert!(session.meteorites.is_empty());
        assert!(session.lasers.is_empty());
        let events = game.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::MeteoriteDestroyed { .. })));
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_ship_collision_ends_session() {
        let mut config = GameConfig::meteor_shower();
        config.meteorite.initial = 0;
        config.meteorite.spawn_interval_ticks = u32::MAX;
        let mut game = playing(config, 12);
        {
            let session = game.session_mut().unwrap();
            let nose = session.ship.as_ref().unwrap().nose();
            session.meteorites.push(Meteorite::new(
                nose,
                Vec2::ZERO,
                0.0,
                vec![Vec2::new(-30.0, 0.0), Vec2::new(10.0, 10.0), Vec2::new(10.0, -10.0)],
            ));
        }
        tick(&mut game, &TickInput::default());
        assert_eq!(game.phase(), GamePhase::Finished);
        assert_eq!(game.session().unwrap().outcome, Some(FinishReason::Collision));
    }

    #[test]
    fn test_ship_leaving_field_ends_session() {
        let mut config = GameConfig::meteor_shower();
        config.meteorite.initial = 0;
        config.meteorite.spawn_interval_ticks = u32::MAX;
        let mut game = playing(config, 13);
        let input = TickInput {
            pressed: Directions {
                left: true,
                ..Default::default()
            },
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut game, &input);
            if game.phase() == GamePhase::Finished {
                break;
            }
        }
        assert_eq!(game.phase(), GamePhase::Finished);
        assert_eq!(game.session().unwrap().outcome, Some(FinishReason::OutOfBounds));
    }

    #[test]
    fn test_survival_bonus_accrues() {
        let mut config = GameConfig::meteor_shower();
        config.meteorite.initial = 0;
        config.meteorite.spawn_interval_ticks = u32::MAX;
        config.session.survival_interval_ticks = 10;
        let mut game = playing(config, 14);
        for _ in 0..30 {
            tick(&mut game, &TickInput::default());
        }
        assert_eq!(game.session().unwrap().score, 3);
    }

    #[test]
    fn test_meteorites_spawn_on_interval_ticks_only() {
        let mut config = GameConfig::meteor_shower();
        config.meteorite.initial = 0;
        let interval = u64::from(config.meteorite.spawn_interval_ticks);
        assert_eq!(interval, 15);
        let mut session = Session::new(config, 21);
        // Large score keeps the spawn ceiling well above one
        session.score = 1_000_000_000;

        let mut spawned = 0;
        for _ in 0..4 * interval {
            let before = session.meteorites.len();
            session.progress(&Directions::default(), None);
            assert!(!session.is_finished());
            let after = session.meteorites.len();
            if after > before {
                assert_eq!(session.time_ticks % interval, 0, "spawn on tick {}", session.time_ticks);
                spawned += after - before;
            }
        }
        assert!(spawned > 0);
    }

    #[test]
    fn test_stray_lasers_are_dropped() {
        let mut session = Session::new(GameConfig::meteor_shower(), 1);
        session.meteorites.clear();
        session.lasers.push(Laser::new(Vec2::new(1195.0, 450.0), Vec2::new(50.0, 0.0), 4.0));
        session.progress(&Directions::default(), None);
        assert!(session.lasers.is_empty());
    }
}
