use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use echoes::{init_logging, GameSession, LevelConfig, MoveInput, TickInput, WorldId};
use log::info;

/// Runs a level headlessly and prints the final snapshot as JSON
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Level file to load instead of the built-in map
    #[arg(short, long)]
    level: Option<PathBuf>,
    /// World to start in
    #[arg(short, long)]
    world: Option<u8>,
    /// Simulated seconds to run
    #[arg(short, long, default_value_t = 10.0)]
    seconds: f32,
    /// Ticks per simulated second
    #[arg(short, long, default_value_t = 60)]
    tick_rate: u32,
    /// Scripted input
    #[arg(long, value_enum, default_value_t = Script::Idle)]
    script: Script,
}

/// Canned input patterns for the headless runner.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Script {
    /// No input.
    Idle,
    /// Walk towards +x.
    Forward,
    /// Walk towards +x, swinging twice a second.
    Assault,
    /// Alternate between +z and -z every two seconds.
    Patrol,
}

impl Script {
    fn input(self, elapsed: f32, tick: u64, tick_rate: u32) -> TickInput {
        let swing_every = u64::from((tick_rate / 2).max(1));
        match self {
            Self::Idle => TickInput::default(),
            Self::Forward => TickInput {
                movement: MoveInput {
                    forward: true,
                    ..MoveInput::default()
                },
                ..TickInput::default()
            },
            Self::Assault => TickInput {
                movement: MoveInput {
                    forward: true,
                    ..MoveInput::default()
                },
                attack: tick % swing_every == 0,
                interact: true,
            },
            Self::Patrol => {
                let leg = (elapsed / 2.0).floor();
                let right = leg.rem_euclid(2.0) < 1.0;
                TickInput {
                    movement: MoveInput {
                        left: !right,
                        right,
                        ..MoveInput::default()
                    },
                    ..TickInput::default()
                }
            }
        }
    }
}

fn load_level(path: Option<&PathBuf>) -> Result<LevelConfig> {
    match path {
        Some(path) => LevelConfig::from_path(path)
            .with_context(|| format!("loading level {}", path.display())),
        None => Ok(LevelConfig::default()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    ensure!(args.tick_rate > 0, "tick rate must be positive");
    ensure!(args.seconds >= 0.0, "seconds must not be negative");

    let level = load_level(args.level.as_ref())?;
    let mut session = match args.world {
        Some(world) => GameSession::starting_in(level, WorldId(world))?,
        None => GameSession::new(level)?,
    };

    #[expect(
        clippy::cast_precision_loss,
        reason = "Tick rates are small enough to be exact in f32."
    )]
    let dt = 1.0 / args.tick_rate as f32;
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Seconds are checked to be non-negative and runs are short."
    )]
    let total_ticks = (args.seconds / dt).round() as u64;

    info!(
        "running world {:?} for {total_ticks} ticks with script {:?}",
        session.world(),
        args.script
    );
    for tick in 0..total_ticks {
        let input = args.script.input(session.elapsed(), tick, args.tick_rate);
        let summary = session.tick(dt, &input);
        for milestone in &summary.milestones {
            info!("tick {tick}: {milestone:?}");
        }
    }

    let snapshot = session.snapshot();
    let json = serde_json::to_string_pretty(&snapshot).context("serialising snapshot")?;
    emit(&json);
    Ok(())
}

#[expect(
    clippy::print_stdout,
    reason = "The snapshot on stdout is the runner's output."
)]
fn emit(json: &str) {
    println!("{json}");
}
