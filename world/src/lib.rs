#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Snakes and Ladders.

mod chance;
mod warps;

use snakes_ladders_core::{
    BoardConfig, Choice, Command, DieFace, Event, GameState, Phase, Rejection, TileIndex,
};

use crate::warps::WarpGraph;

/// Represents the authoritative state of a single game session.
#[derive(Debug)]
pub struct World {
    config: BoardConfig,
    warps: WarpGraph,
    position: TileIndex,
    roll_count: u32,
    pending_chance: bool,
    free_roll_granted: bool,
    finished: bool,
    history: Vec<Event>,
}

impl World {
    /// Creates a world on the starting tile for an already validated board.
    #[must_use]
    pub fn new(config: BoardConfig) -> Self {
        let initial = GameState::initial();
        Self {
            warps: WarpGraph::from_config(&config),
            config,
            position: initial.position,
            roll_count: initial.roll_count,
            pending_chance: initial.pending_chance,
            free_roll_granted: initial.free_roll_granted,
            finished: initial.finished,
            history: Vec::new(),
        }
    }

    fn reset(&mut self) {
        let initial = GameState::initial();
        self.position = initial.position;
        self.roll_count = initial.roll_count;
        self.pending_chance = initial.pending_chance;
        self.free_roll_granted = initial.free_roll_granted;
        self.finished = initial.finished;
        self.history.clear();
        self.warps.restore();
    }

    fn snapshot(&self) -> GameState {
        GameState {
            position: self.position,
            roll_count: self.roll_count,
            pending_chance: self.pending_chance,
            free_roll_granted: self.free_roll_granted,
            last_event: self.history.last().copied(),
            finished: self.finished,
        }
    }

    fn record(&mut self, event: Event, out_events: &mut Vec<Event>) {
        self.history.push(event);
        out_events.push(event);
    }

    fn take_turn(&mut self, roll: DieFace, free_roll: bool, out_events: &mut Vec<Event>) {
        let landed = self.position.advance(roll);
        if !free_roll {
            self.roll_count = self.roll_count.saturating_add(1);
        }
        self.free_roll_granted = false;
        self.position = landed;
        self.record(Event::RollResult { roll, landed }, out_events);

        if let Some(warp) = self.warps.resolve(landed) {
            self.position = warp.to;
            self.record(
                Event::WarpApplied {
                    kind: warp.kind,
                    from: warp.from,
                    to: warp.to,
                },
                out_events,
            );
        }

        if self.config.chance_tiles().contains(&self.position) {
            self.pending_chance = true;
            self.record(
                Event::ChanceTriggered {
                    tile: self.position,
                },
                out_events,
            );
        } else {
            self.settle(out_events);
        }
    }

    fn answer_chance(&mut self, choice: Choice, out_events: &mut Vec<Event>) {
        let correct = match chance::grade(self.config.chance_question(), choice) {
            Ok(correct) => correct,
            Err(reason) => {
                out_events.push(Event::CommandRejected { reason });
                return;
            }
        };

        let removed_setback = if correct {
            self.free_roll_granted = true;
            self.warps.remove_highest_setback()
        } else {
            None
        };
        self.pending_chance = false;
        self.record(
            Event::ChanceResolved {
                correct,
                removed_setback,
            },
            out_events,
        );
        self.settle(out_events);
    }

    fn settle(&mut self, out_events: &mut Vec<Event>) {
        if self.position.is_goal() && !self.finished {
            self.finished = true;
            self.record(
                Event::GameWon {
                    rolls: self.roll_count,
                },
                out_events,
            );
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that are not valid in the current phase leave the world untouched
/// and produce a single [`Event::CommandRejected`]. Rejections are reported to
/// the caller only; they never enter the history.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let phase = world.snapshot().phase();
    match command {
        Command::TakeTurn { roll, free_roll } => match phase {
            Phase::Idle => world.take_turn(roll, free_roll, out_events),
            Phase::AwaitingChance => out_events.push(Event::CommandRejected {
                reason: Rejection::ChancePending,
            }),
            Phase::Won => out_events.push(Event::CommandRejected {
                reason: Rejection::GameOver,
            }),
        },
        Command::AnswerChance { choice } => {
            if phase == Phase::AwaitingChance {
                world.answer_chance(choice, out_events);
            } else {
                out_events.push(Event::CommandRejected {
                    reason: Rejection::NoChancePending,
                });
            }
        }
        Command::Reset => world.reset(),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::BTreeSet;

    use super::World;
    use snakes_ladders_core::{ChanceQuestion, Event, GameState, Phase, TileIndex, Warp};

    /// Captures a read-only copy of the session state.
    #[must_use]
    pub fn snapshot(world: &World) -> GameState {
        world.snapshot()
    }

    /// Reports the current state-machine phase.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.snapshot().phase()
    }

    /// Every accepted event since the session started or was last reset.
    #[must_use]
    pub fn history(world: &World) -> &[Event] {
        &world.history
    }

    /// Setbacks still present on the board, ordered by source tile.
    #[must_use]
    pub fn setbacks(world: &World) -> Vec<Warp> {
        world.warps.setbacks()
    }

    /// Shortcuts of the board, ordered by source tile.
    #[must_use]
    pub fn shortcuts(world: &World) -> Vec<Warp> {
        world.warps.shortcuts()
    }

    /// Tiles that trigger the chance question.
    #[must_use]
    pub fn chance_tiles(world: &World) -> &BTreeSet<TileIndex> {
        world.config.chance_tiles()
    }

    /// Question asked on chance tiles.
    #[must_use]
    pub fn chance_question(world: &World) -> &ChanceQuestion {
        world.config.chance_question()
    }
}
