#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Snakes and Ladders in the terminal.

mod board_file;
mod play;

use std::{io, path::PathBuf};

use anyhow::{Context, Result as AnyResult};
use board_file::LoadedBoard;
use clap::Parser;
use snakes_ladders_rendering::TextBackend;
use snakes_ladders_system_dice::{RollSource, ScriptedDice, SeededDice};
use snakes_ladders_system_session::TurnEngine;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the Snakes and Ladders game.
#[derive(Debug, Parser)]
#[command(
    name = "snakes-ladders",
    version,
    about = "Play Snakes and Ladders with chance questions"
)]
struct CliArgs {
    /// Seed for the dice; drawn from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML board file replacing the reference board.
    #[arg(long, value_name = "FILE")]
    board: Option<PathBuf>,
    /// Die faces to roll in order, repeating once exhausted (for example 3,5,6).
    #[arg(long, value_delimiter = ',', conflicts_with = "seed")]
    rolls: Option<Vec<u8>>,
}

/// Entry point for the Snakes and Ladders command-line interface.
fn main() -> AnyResult<()> {
    init_tracing();
    let args = CliArgs::parse();

    let board = match &args.board {
        Some(path) => board_file::load(path)?,
        None => LoadedBoard::reference(),
    };
    let dice = dice_from_args(&args)?;

    let mut engine = TurnEngine::new(board.config, dice);
    let stdin = io::stdin();
    let mut backend = TextBackend::new(io::stdout().lock());
    play::run(&mut engine, &board.theme, stdin.lock(), &mut backend)
}

fn dice_from_args(args: &CliArgs) -> AnyResult<Box<dyn RollSource>> {
    if let Some(rolls) = &args.rolls {
        let dice = ScriptedDice::from_values(rolls).context("invalid --rolls script")?;
        info!(?rolls, "using scripted dice");
        return Ok(Box::new(dice));
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "using seeded dice");
    Ok(Box::new(SeededDice::new(seed)))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
