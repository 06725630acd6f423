//! Interactive input loop.

use std::io::BufRead;

use anyhow::{Context, Result as AnyResult};
use snakes_ladders_core::{Choice, Event, Phase, Rejection};
use snakes_ladders_rendering::{
    describe, BoardPresentation, Presentation, RenderingBackend, Scene, Theme,
};
use snakes_ladders_system_dice::RollSource;
use snakes_ladders_system_session::TurnEngine;
use tracing::{debug, info};

const HELP: &str = "Enter r to roll, 1-9 to answer, n for a new game, h for history, q to quit.";

/// Player command read from a single input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Roll,
    Answer(Choice),
    Restart,
    History,
    Quit,
    Unknown(String),
}

/// Interprets one line of player input. Answers are numbered from one.
pub(crate) fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "" | "r" | "roll" => Input::Roll,
        "n" | "new" => Input::Restart,
        "h" | "history" => Input::History,
        "q" | "quit" => Input::Quit,
        other => match other.parse::<usize>() {
            Ok(number) if number > 0 => Input::Answer(Choice::new(number - 1)),
            _ => Input::Unknown(trimmed.to_owned()),
        },
    }
}

/// Runs the game until the player quits or the input ends.
pub(crate) fn run<D, R, B>(
    engine: &mut TurnEngine<D>,
    theme: &Theme,
    input: R,
    backend: &mut B,
) -> AnyResult<()>
where
    D: RollSource,
    R: BufRead,
    B: RenderingBackend,
{
    present(engine, theme, backend, vec![HELP.to_owned()])?;

    for line in input.lines() {
        let line = line.context("failed to read player input")?;
        let command = parse_input(&line);
        debug!(?command, "player input");

        let messages = match command {
            Input::Quit => {
                info!("player quit");
                return Ok(());
            }
            Input::Roll => match engine.take_next_turn() {
                Ok(outcome) => describe_all(&outcome.events, theme),
                Err(error) => vec![rejected(error.reason, theme)],
            },
            Input::Answer(choice) => match engine.answer_chance(choice) {
                Ok(outcome) => describe_all(&outcome.events, theme),
                Err(error) => vec![rejected(error.reason, theme)],
            },
            Input::Restart => {
                engine.reset();
                vec!["New game started.".to_owned()]
            }
            Input::History => history(engine.history(), theme),
            Input::Unknown(text) => vec![format!("Unrecognised input '{text}'. {HELP}")],
        };

        present(engine, theme, backend, messages)?;
    }

    Ok(())
}

fn present<D, B>(
    engine: &TurnEngine<D>,
    theme: &Theme,
    backend: &mut B,
    mut messages: Vec<String>,
) -> AnyResult<()>
where
    D: RollSource,
    B: RenderingBackend,
{
    if engine.phase() == Phase::Won {
        messages.push("Enter n for a new game or q to quit.".to_owned());
    }

    let setbacks = engine.setbacks();
    let shortcuts = engine.shortcuts();
    let board = BoardPresentation {
        setbacks: &setbacks,
        shortcuts: &shortcuts,
        chance_tiles: engine.chance_tiles(),
    };
    let scene = Scene::new(&engine.snapshot(), &board, engine.question(), messages);
    backend.present(&Presentation::new(theme.clone(), scene))
}

fn describe_all(events: &[Event], theme: &Theme) -> Vec<String> {
    events.iter().map(|event| describe(event, theme)).collect()
}

fn rejected(reason: Rejection, theme: &Theme) -> String {
    describe(&Event::CommandRejected { reason }, theme)
}

fn history(events: &[Event], theme: &Theme) -> Vec<String> {
    if events.is_empty() {
        return vec!["No events yet.".to_owned()];
    }
    events
        .iter()
        .enumerate()
        .map(|(index, event)| format!("{:>3}. {}", index + 1, describe(event, theme)))
        .collect()
}
