//! Meteor Rush headless runner
//!
//! Plays one seeded session with a scripted player and logs the outcome.
//! Drawing goes into a `DrawList`, so the whole run stays off-screen.

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use meteor_rush::consts::TICK_RATE;
use meteor_rush::renderer::DrawList;
use meteor_rush::sim::{Directions, Game, GameEvent, GamePhase, InputEvent, Session, TickInput, TickOutcome, tick};
use meteor_rush::{Difficulty, GameConfig, Ruleset};

/// Hard stop for untimed sessions
const MAX_TICKS: u32 = 120 * TICK_RATE;
/// Ticks between scripted clicks
const CLICK_INTERVAL: u32 = TICK_RATE / 3;
/// Ticks the scripted player holds the trigger
const CHARGE_TICKS: u32 = 12;
const DEMO_SEED: u64 = 0x5eed;

/// Meteor Rush - headless demo session
#[derive(Parser, Debug)]
#[command(name = "meteor-rush")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Game to play (defaults to target practice, or the config file's ruleset)
    #[arg(value_enum)]
    ruleset: Option<RulesetArg>,

    /// Difficulty preset applied on top of the configuration
    #[arg(value_enum)]
    difficulty: Option<DifficultyArg>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session seed
    #[arg(short, long, default_value_t = DEMO_SEED)]
    seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum RulesetArg {
    /// Click fading targets before the timer runs out
    TargetPractice,
    /// Pilot the ship and shoot meteorites
    MeteorShower,
}

impl From<RulesetArg> for Ruleset {
    fn from(arg: RulesetArg) -> Self {
        match arg {
            RulesetArg::TargetPractice => Ruleset::TargetPractice,
            RulesetArg::MeteorShower => Ruleset::MeteorShower,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum DifficultyArg {
    #[value(alias = "soft")]
    Softcore,
    #[value(alias = "medium")]
    Mediumcore,
    #[value(alias = "hard")]
    Hardcore,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Softcore => Difficulty::Softcore,
            DifficultyArg::Mediumcore => Difficulty::Mediumcore,
            DifficultyArg::Hardcore => Difficulty::Hardcore,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    env_logger::init();
    log::info!("Meteor Rush (headless) starting...");

    if let Err(err) = run(&cli) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> meteor_rush::Result<()> {
    let config = build_config(cli)?;
    let mut game = Game::new(config, cli.seed)?;
    let mut player = Pcg32::seed_from_u64(cli.seed ^ 0xdead_beef);
    let mut frame = DrawList::new();

    tick(&mut game, &TickInput::with_events(vec![InputEvent::Start]));

    let mut ticks = 0;
    let mut hits = 0;
    let mut misses = 0;
    while game.phase() == GamePhase::Playing && ticks < MAX_TICKS {
        let input = match game.session() {
            Some(session) => scripted_input(session, ticks, &mut player),
            None => TickInput::default(),
        };
        if tick(&mut game, &input) == TickOutcome::Quit {
            break;
        }
        for event in game.drain_events() {
            match event {
                GameEvent::TargetHit { .. } | GameEvent::MeteoriteDestroyed { .. } => hits += 1,
                GameEvent::Miss { .. } => misses += 1,
                GameEvent::SessionFinished { score, reason } => {
                    log::info!("Finished ({reason:?}) with score {score}");
                }
                _ => {}
            }
        }

        frame.clear();
        game.render(&mut frame);
        ticks += 1;
    }

    let score = game
        .final_score()
        .or_else(|| game.session().map(|s| s.score))
        .unwrap_or(0);
    log::info!(
        "Demo done after {} ticks: score={} hits={} misses={} last frame={} draw calls",
        ticks,
        score,
        hits,
        misses,
        frame.len()
    );
    println!("score: {score}");
    Ok(())
}

/// Pick the base configuration, then apply the command-line overrides
fn build_config(cli: &Cli) -> meteor_rush::Result<GameConfig> {
    let mut config = match (&cli.config, cli.ruleset) {
        (Some(path), _) => GameConfig::load(path)?,
        (None, Some(RulesetArg::MeteorShower)) => GameConfig::meteor_shower(),
        (None, _) => GameConfig::target_practice(),
    };
    if cli.config.is_some()
        && let Some(ruleset) = cli.ruleset
    {
        config.session.ruleset = ruleset.into();
    }
    if let Some(difficulty) = cli.difficulty {
        config.apply_difficulty(difficulty.into());
    }
    Ok(config)
}

/// A sloppy but honest player: clicks near live targets, or steers the ship
/// back to the middle and shoots at the closest meteorite
fn scripted_input(session: &Session, tick_index: u32, player: &mut Pcg32) -> TickInput {
    match session.config.session.ruleset {
        Ruleset::TargetPractice => {
            let mut input = TickInput::default();
            let count = session.targets.len() + session.triangles.len();
            if count > 0 && tick_index % CLICK_INTERVAL == 0 {
                let pick = player.random_range(0..count);
                let aim = session
                    .targets
                    .iter()
                    .map(|t| t.pos)
                    .chain(session.triangles.iter().map(|t| t.centroid()))
                    .nth(pick)
                    .unwrap_or(Vec2::ZERO);
                let jitter = Vec2::new(player.random_range(-30.0..=30.0), player.random_range(-30.0..=30.0));
                let point = aim + jitter;
                input.events.push(InputEvent::PointerDown(point));
                input.events.push(InputEvent::PointerUp(point));
            }
            input
        }
        Ruleset::MeteorShower => {
            let Some(ship) = &session.ship else {
                return TickInput::default();
            };
            let center = Vec2::new(session.config.field.width, session.config.field.height) * 0.5;
            let offset = ship.pos - center;
            let pressed = Directions {
                up: offset.y > 80.0,
                down: offset.y < -80.0,
                left: offset.x > 80.0,
                right: offset.x < -80.0,
            };
            let aim = session
                .meteorites
                .iter()
                .map(|m| m.pos)
                .min_by(|a, b| a.distance_squared(ship.pos).total_cmp(&b.distance_squared(ship.pos)));

            let mut input = TickInput {
                pressed,
                pointer: aim,
                ..Default::default()
            };
            let phase = tick_index % (CHARGE_TICKS * 2);
            if let Some(aim) = aim {
                if phase == 0 {
                    input.events.push(InputEvent::PointerDown(aim));
                } else if phase == CHARGE_TICKS {
                    input.events.push(InputEvent::PointerUp(aim));
                }
            }
            input
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_target_practice() {
        let cli = Cli::try_parse_from(["meteor-rush"]).unwrap();
        assert_eq!(cli.ruleset, None);
        assert_eq!(cli.seed, DEMO_SEED);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.session.ruleset, Ruleset::TargetPractice);
        assert_eq!(config.difficulty, Difficulty::default());
    }

    #[test]
    fn test_ruleset_and_difficulty_parsed() {
        let cli = Cli::try_parse_from(["meteor-rush", "meteor-shower", "hard", "--seed", "7"]).unwrap();
        assert_eq!(cli.ruleset, Some(RulesetArg::MeteorShower));
        assert_eq!(cli.difficulty, Some(DifficultyArg::Hardcore));
        assert_eq!(cli.seed, 7);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.session.ruleset, Ruleset::MeteorShower);
        assert_eq!(config.difficulty, Difficulty::Hardcore);
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert!(Cli::try_parse_from(["meteor-rush", "tetris"]).is_err());
        assert!(Cli::try_parse_from(["meteor-rush", "meteor-shower", "nightmare"]).is_err());
        assert!(Cli::try_parse_from(["meteor-rush", "--seed", "abc"]).is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from(["meteor-rush", "--config", "/nonexistent/meteor-rush.json"]).unwrap();
        assert!(matches!(build_config(&cli), Err(meteor_rush::ConfigError::Io(_))));
    }
}
