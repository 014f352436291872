//! Boost Ball headless runner
//!
//! Plays a full match between a scripted driver (standing in for the
//! keyboard) and the bot, then prints the result.

use std::path::PathBuf;
use std::process::ExitCode;

use boost_ball::heading_error;
use boost_ball::sim::{
    Arena, ArenaStyle, GameEvent, GameState, InputSnapshot, JumpEdge, MatchPhase, Team, TickInput,
    format_clock, tick,
};
use boost_ball::{ConfigError, Tuning};
use clap::Parser;
use glam::Vec3;
use log::{LevelFilter, info};

// --- Command Line Arguments ---
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Arena preset (stadium, neon, ice)
    #[arg(long, default_value = "stadium")]
    arena: String,

    /// Seed for kickoff placement
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Match length in seconds (overrides the tuning file)
    #[arg(long)]
    seconds: Option<f32>,

    /// JSON file with tuning overrides
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Simulated frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the effective tuning as JSON and exit
    #[arg(long)]
    dump_tuning: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    // RUST_LOG still refines per-module filters
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), ConfigError> {
    let style =
        ArenaStyle::from_str(&args.arena).ok_or_else(|| ConfigError::UnknownArena(args.arena.clone()))?;
    let arena = Arena::preset(style);
    arena.validate()?;

    let mut tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    if let Some(seconds) = args.seconds {
        tuning.match_.duration = seconds;
        tuning.validate()?;
    }

    if args.dump_tuning {
        println!("{}", tuning.to_json());
        return Ok(());
    }

    if !args.fps.is_finite() || args.fps <= 0.0 {
        return Err(ConfigError::NonPositive { field: "fps" });
    }
    let dt = 1.0 / args.fps;

    info!("Boost Ball (headless) starting...");
    let mut state = GameState::new(arena, tuning, args.seed);
    let mut driver = ScriptedDriver::default();
    let mut hits = [0u32; 2];
    let mut frames = 0u64;

    // Every running tick drains the clock and every pause is bounded
    while !matches!(state.match_state.phase, MatchPhase::Ended { .. }) {
        let input = driver.input(&state);
        tick(&mut state, &input, dt);
        frames += 1;

        for event in state.drain_events() {
            match event {
                GameEvent::Hit { team, .. } => hits[team_index(team)] += 1,
                GameEvent::GoalScored { .. } => {
                    info!("  at {} remaining", format_clock(state.match_state.clock));
                }
                _ => {}
            }
        }
    }

    let ms = &state.match_state;
    println!(
        "{}: Blue {} - {} Orange ({:?}) | touches {}/{} | {} frames",
        state.arena.style.as_str(),
        ms.blue_score,
        ms.orange_score,
        ms.result(),
        hits[0],
        hits[1],
        frames
    );
    Ok(())
}

fn team_index(team: Team) -> usize {
    match team {
        Team::Blue => 0,
        Team::Orange => 1,
    }
}

/// Keyboard stand-in: chases a point behind the ball on the line to the
/// goal Orange defends.
#[derive(Default)]
struct ScriptedDriver {
    jump: JumpEdge,
}

impl ScriptedDriver {
    fn input(&mut self, state: &GameState) -> TickInput {
        let car = state.human();
        let ball = &state.ball;

        let goal = Vec3::new(0.0, ball.body.pos.y, Team::Orange.own_goal_z(&state.arena));
        let behind = (ball.body.pos - goal).normalize_or_zero() * 6.0;
        let to_target = ball.body.pos + behind - car.body.pos;
        let error = heading_error(car.forward(), to_target);
        let distance = to_target.with_y(0.0).length();

        let controls = InputSnapshot {
            forward: error.abs() < 2.0,
            backward: error.abs() >= 2.0,
            left: error > 0.1,
            right: error < -0.1,
            jump: ball.body.pos.y > ball.radius + 6.0 && distance < 20.0,
            boost: error.abs() < 0.3 && distance > 60.0,
        };
        TickInput {
            controls,
            jump_pressed: self.jump.update(controls.jump),
            ..Default::default()
        }
    }
}
