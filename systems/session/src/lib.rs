#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn engine that runs a single game session.
//!
//! [`TurnEngine`] is the only surface presentation adapters talk to. It owns
//! the authoritative world and the die, draws rolls, submits commands, and
//! hands back outcome values. Rejected commands surface as [`InvalidState`]
//! and leave the session untouched.

use std::collections::BTreeSet;

use snakes_ladders_core::{
    BoardConfig, ChanceQuestion, Choice, Command, DieFace, Event, GameState, InvalidState, Phase,
    Rejection, TileIndex, Warp,
};
use snakes_ladders_system_dice::{RollSource, SeededDice};
use snakes_ladders_world::{self as world, query, World};
use tracing::{debug, info, instrument, warn};

/// Result of an accepted turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Face drawn from the die.
    pub roll: DieFace,
    /// Events emitted while resolving the turn, in order.
    pub events: Vec<Event>,
    /// Session state after the turn.
    pub state: GameState,
}

impl TurnOutcome {
    /// Tile reached by the roll before any warp.
    #[must_use]
    pub fn landed(&self) -> Option<TileIndex> {
        self.events.iter().find_map(|event| match event {
            Event::RollResult { landed, .. } => Some(*landed),
            _ => None,
        })
    }

    /// Warp applied during the turn, if the roll landed on one.
    #[must_use]
    pub fn warp(&self) -> Option<Warp> {
        self.events.iter().find_map(|event| match event {
            Event::WarpApplied { kind, from, to } => Some(Warp {
                kind: *kind,
                from: *from,
                to: *to,
            }),
            _ => None,
        })
    }

    /// Reports whether the turn ended on a chance tile.
    #[must_use]
    pub fn triggered_chance(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, Event::ChanceTriggered { .. }))
    }

    /// Reports whether the turn won the game.
    #[must_use]
    pub fn won(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, Event::GameWon { .. }))
    }
}

/// Result of an accepted chance answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChanceOutcome {
    /// Whether the answer was correct.
    pub correct: bool,
    /// Setback removed as a reward, if any remained.
    pub removed_setback: Option<TileIndex>,
    /// Events emitted while resolving the answer, in order.
    pub events: Vec<Event>,
    /// Session state after the answer.
    pub state: GameState,
}

/// Runs one game session against a board and a die.
#[derive(Debug)]
pub struct TurnEngine<D = SeededDice> {
    world: World,
    dice: D,
}

impl TurnEngine<SeededDice> {
    /// Creates an engine rolling a seeded ChaCha die.
    #[must_use]
    pub fn seeded(config: BoardConfig, seed: u64) -> Self {
        Self::new(config, SeededDice::new(seed))
    }
}

impl<D> TurnEngine<D>
where
    D: RollSource,
{
    /// Creates an engine for the provided board, drawing rolls from `dice`.
    #[must_use]
    pub fn new(config: BoardConfig, dice: D) -> Self {
        Self {
            world: World::new(config),
            dice,
        }
    }

    /// Read-only copy of the session state.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        query::snapshot(&self.world)
    }

    /// Current state-machine phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        query::phase(&self.world)
    }

    /// Rolls the die and resolves one turn.
    ///
    /// Free rolls do not count towards the roll total. The granted free-roll
    /// flag is cleared by every accepted turn either way. No die is drawn when
    /// the turn is rejected.
    #[instrument(skip(self))]
    pub fn take_turn(&mut self, is_free_roll: bool) -> Result<TurnOutcome, InvalidState> {
        match self.phase() {
            Phase::Idle => {}
            Phase::AwaitingChance => return Err(reject(Rejection::ChancePending)),
            Phase::Won => return Err(reject(Rejection::GameOver)),
        }

        let roll = self.dice.roll();
        let events = self.submit(Command::TakeTurn {
            roll,
            free_roll: is_free_roll,
        })?;
        Ok(TurnOutcome {
            roll,
            events,
            state: self.snapshot(),
        })
    }

    /// Takes the next turn, spending a granted free roll if there is one.
    pub fn take_next_turn(&mut self) -> Result<TurnOutcome, InvalidState> {
        let free_roll = self.snapshot().free_roll_granted;
        self.take_turn(free_roll)
    }

    /// Answers the pending chance question.
    #[instrument(skip(self))]
    pub fn answer_chance(&mut self, choice: Choice) -> Result<ChanceOutcome, InvalidState> {
        let events = self.submit(Command::AnswerChance { choice })?;
        let resolution = events.iter().find_map(|event| match event {
            Event::ChanceResolved {
                correct,
                removed_setback,
            } => Some((*correct, *removed_setback)),
            _ => None,
        });
        debug_assert!(
            resolution.is_some(),
            "accepted answer must resolve the question"
        );
        let (correct, removed_setback) = resolution.unwrap_or((false, None));

        Ok(ChanceOutcome {
            correct,
            removed_setback,
            events,
            state: self.snapshot(),
        })
    }

    /// Starts the session over with the configured board.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        let events = self.collect(Command::Reset);
        debug_assert!(events.is_empty(), "reset emits no events");
        info!("session reset");
    }

    /// Every accepted event since the session started or was last reset.
    #[must_use]
    pub fn history(&self) -> &[Event] {
        query::history(&self.world)
    }

    /// Setbacks still on the board.
    #[must_use]
    pub fn setbacks(&self) -> Vec<Warp> {
        query::setbacks(&self.world)
    }

    /// Shortcuts of the board.
    #[must_use]
    pub fn shortcuts(&self) -> Vec<Warp> {
        query::shortcuts(&self.world)
    }

    /// Tiles that trigger the chance question.
    #[must_use]
    pub fn chance_tiles(&self) -> &BTreeSet<TileIndex> {
        query::chance_tiles(&self.world)
    }

    /// Question asked on chance tiles.
    #[must_use]
    pub fn question(&self) -> &ChanceQuestion {
        query::chance_question(&self.world)
    }

    fn submit(&mut self, command: Command) -> Result<Vec<Event>, InvalidState> {
        let events = self.collect(command);
        if let Some(reason) = events.iter().find_map(|event| match event {
            Event::CommandRejected { reason } => Some(*reason),
            _ => None,
        }) {
            return Err(reject(reason));
        }
        Ok(events)
    }

    fn collect(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        for event in &events {
            debug!(?event, "world event");
            if let Event::GameWon { rolls } = event {
                info!(rolls, "goal reached");
            }
        }
        events
    }
}

fn reject(reason: Rejection) -> InvalidState {
    warn!(%reason, "command rejected");
    InvalidState::from(reason)
}
