#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Robot Maze program in the terminal.

mod program_text;
mod terminal;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use robot_maze_core::RunOutcome;
use robot_maze_session::{Session, SessionConfig};
use robot_maze_world::level::Level;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::terminal::TerminalPresenter;

/// Command-line arguments accepted by the Robot Maze binary.
#[derive(Debug, Parser)]
#[command(
    name = "robot-maze",
    about = "Guide a robot across a hazardous grid with a list of moves"
)]
struct CliArgs {
    /// TOML level file to play instead of the built-in course.
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,
    /// Program to run, written as U/R/D/L letters or arrows.
    #[arg(long, value_name = "TEXT", default_value = "")]
    program: String,
    /// Removes the program step at INDEX after the program is entered. Repeatable.
    #[arg(long = "remove", value_name = "INDEX")]
    removals: Vec<usize>,
    /// Simulated milliseconds between run transitions.
    #[arg(long, value_name = "MS", default_value_t = 1_000)]
    step_delay_ms: u64,
    /// Milliseconds per frame of the run loop.
    #[arg(long, value_name = "MS", default_value_t = 50)]
    frame_ms: u64,
    /// Upper bound on frames before the run loop gives up.
    #[arg(long, value_name = "COUNT", default_value_t = 100_000)]
    max_frames: u64,
    /// Suppresses board frames and prints only the outcome.
    #[arg(long)]
    quiet: bool,
}

/// Entry point for the Robot Maze command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let level = load_level(args.level.as_deref())?;
    let program = program_text::decode(&args.program).context("failed to parse --program")?;

    let frames: Box<dyn Write> = if args.quiet {
        Box::new(io::sink())
    } else {
        Box::new(io::stdout())
    };

    let config = SessionConfig::new(Duration::from_millis(args.step_delay_ms));
    let mut session = Session::new(level, config, TerminalPresenter::new(frames));
    println!("{}", session.welcome_banner());

    for instruction in program.iter() {
        session.add_instruction(instruction);
    }
    for &index in &args.removals {
        session.remove_instruction_at(index);
    }
    info!(
        program = %program_text::encode(session.program()),
        "program_entered"
    );

    session.start_run();
    let frame = Duration::from_millis(args.frame_ms);
    let mut elapsed_frames = 0_u64;
    while session.is_running() {
        if elapsed_frames >= args.max_frames {
            warn!(max_frames = args.max_frames, "run_abandoned");
            break;
        }
        thread::sleep(frame);
        session.tick(frame);
        elapsed_frames += 1;
    }

    session
        .presenter_mut()
        .finish()
        .context("failed to write board frames")?;
    println!("outcome: {}", describe_outcome(session.last_outcome()));
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn load_level(path: Option<&Path>) -> Result<Level> {
    let Some(path) = path else {
        return Ok(Level::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file {}", path.display()))?;
    Level::from_toml_str(&contents)
        .with_context(|| format!("failed to load level from {}", path.display()))
}

fn describe_outcome(outcome: Option<RunOutcome>) -> &'static str {
    match outcome {
        Some(RunOutcome::Succeeded) => "succeeded",
        Some(RunOutcome::Failed) => "failed",
        Some(RunOutcome::Exhausted) => "exhausted",
        None => "unfinished",
    }
}
