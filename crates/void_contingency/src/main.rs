//! Headless Void Contingency run
//!
//! Spawns a fleet, drives it at a fixed timestep for a number of seconds and
//! logs telemetry.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;
use void_contingency::{GameConfig, Simulation};
use void_engine::prelude::{Config, Engine};

const DEFAULT_SECONDS: &str = "10";
const FALLBACK_FPS: u32 = 60;

fn main() -> Result<()> {
    let matches = Command::new("void_contingency")
        .about("Runs the Void Contingency ship simulation without a window")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Game configuration (.toml or .ron)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("blueprint")
                .short('b')
                .long("blueprint")
                .value_name("FILE")
                .help("Ship blueprint (.ron) used for every spawned ship")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("seconds")
                .short('s')
                .long("seconds")
                .value_name("SECONDS")
                .help("Wall-clock seconds to run")
                .default_value(DEFAULT_SECONDS)
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("ships")
                .short('n')
                .long("ships")
                .value_name("COUNT")
                .help("Number of ships to spawn")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed for spawn headings and positions")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .help("Update ships across threads")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (error, warn, info, debug, trace)"),
        )
        .get_matches();

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => GameConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(path) = matches.get_one::<PathBuf>("blueprint") {
        config.simulation.blueprint = Some(path.clone());
    }
    if let Some(&ships) = matches.get_one::<usize>("ships") {
        config.simulation.ship_count = ships;
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.simulation.seed = Some(seed);
    }
    if matches.get_flag("parallel") {
        config.simulation.parallel = true;
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.engine.logging.level.clone_from(level);
    }
    config.validate().map_err(anyhow::Error::msg).context("Invalid configuration")?;

    let seconds = matches.get_one::<f32>("seconds").copied().unwrap_or_default();
    let fps = config.engine.target_fps.unwrap_or(FALLBACK_FPS);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let frames = (seconds.max(0.0) * fps as f32).ceil() as u64;

    let mut engine = Engine::initialize(config.engine.clone())?;
    let mut simulation = Simulation::from_config(&config)?;

    let run = engine.run(&mut simulation, Some(frames));
    log::info!(
        "Simulated {:.2}s in {} ticks over {} frames",
        simulation.time(),
        simulation.ticks(),
        engine.frame_count()
    );
    engine.shutdown()?;
    run?;
    Ok(())
}
