#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snakes and Ladders engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the turn engine. Adapters ask the engine for
//! turns and answers, the engine submits [`Command`] values to the world's
//! `apply` entry point, and the world broadcasts [`Event`] values describing
//! what happened. Presentation code only ever sees [`GameState`] snapshots and
//! events, never the mutable state behind them.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest tile on the board; every session starts here.
pub const FIRST_TILE: u32 = 1;
/// Terminal tile; reaching it wins the game.
pub const FINAL_TILE: u32 = 100;
/// Number of tiles laid out along a single board row.
pub const GRID_WIDTH: u32 = 10;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the token by an already drawn die roll and resolves the landing.
    TakeTurn {
        /// Face shown by the die for this turn.
        roll: DieFace,
        /// Free rolls move the token without counting towards the roll total.
        free_roll: bool,
    },
    /// Answers the pending chance question.
    AnswerChance {
        /// Option selected by the player.
        choice: Choice,
    },
    /// Restores the initial session state and the configured setbacks.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// Reports the die roll and the tile it moved the token to, before warps.
    RollResult {
        /// Face shown by the die.
        roll: DieFace,
        /// Tile reached by the roll, clamped to the final tile.
        landed: TileIndex,
    },
    /// Confirms that a setback or shortcut moved the token.
    WarpApplied {
        /// Whether the warp moved the token backward or forward.
        kind: WarpKind,
        /// Tile the warp started from.
        from: TileIndex,
        /// Tile the token occupies after the warp.
        to: TileIndex,
    },
    /// Announces that the turn ended on a chance tile and a question is pending.
    ChanceTriggered {
        /// Chance tile the token finished the turn on.
        tile: TileIndex,
    },
    /// Reports the evaluation of a chance answer.
    ChanceResolved {
        /// Whether the selected option was the correct one.
        correct: bool,
        /// Setback source removed as a reward, if any remained.
        removed_setback: Option<TileIndex>,
    },
    /// Announces that the token reached the final tile.
    GameWon {
        /// Number of counted rolls it took to win.
        rolls: u32,
    },
    /// Reports that a command was not valid in the current phase.
    CommandRejected {
        /// Specific reason the command was rejected.
        reason: Rejection,
    },
}

/// Reasons the world may refuse a command without changing state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum Rejection {
    /// A chance question must be answered before the next roll.
    #[error("a chance question must be answered before rolling again")]
    ChancePending,
    /// The game has been won; only a reset is accepted.
    #[error("the game is over; restart to play again")]
    GameOver,
    /// An answer was submitted while no question was pending.
    #[error("no chance question is waiting for an answer")]
    NoChancePending,
    /// The selected option is not one of the offered answers.
    #[error("choice {choice} is not one of the {options} offered answers")]
    UnknownChoice {
        /// Zero-based option index that was submitted.
        choice: usize,
        /// Number of options the question offers.
        options: usize,
    },
}

/// Operation called while the machine is not in the required phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("invalid state: {reason}")]
pub struct InvalidState {
    /// Why the operation was refused.
    pub reason: Rejection,
}

impl From<Rejection> for InvalidState {
    fn from(reason: Rejection) -> Self {
        Self { reason }
    }
}

/// Tile number outside the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("tile {value} lies outside the board (1..=100)")]
pub struct InvalidTile {
    /// Offending tile number.
    pub value: u32,
}

/// Die value outside the faces of a six-sided die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("die face {value} is not between 1 and 6")]
pub struct InvalidDieFace {
    /// Offending die value.
    pub value: u8,
}

/// Position on the board, always within `FIRST_TILE..=FINAL_TILE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TileIndex(u32);

impl TileIndex {
    /// Tile every session starts on.
    pub const START: Self = Self(FIRST_TILE);
    /// Terminal tile of the board.
    pub const GOAL: Self = Self(FINAL_TILE);

    /// Creates a tile index, rejecting numbers outside the board.
    pub const fn new(value: u32) -> Result<Self, InvalidTile> {
        if value >= FIRST_TILE && value <= FINAL_TILE {
            Ok(Self(value))
        } else {
            Err(InvalidTile { value })
        }
    }

    /// Retrieves the numeric tile number.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether this is the terminal tile.
    #[must_use]
    pub const fn is_goal(&self) -> bool {
        self.0 == FINAL_TILE
    }

    /// Moves forward by the rolled amount. Overshoot is clamped to the goal.
    #[must_use]
    pub fn advance(self, roll: DieFace) -> Self {
        Self(self.0.saturating_add(u32::from(roll.get())).min(FINAL_TILE))
    }

    /// Projects the tile onto the serpentine grid.
    ///
    /// Rows are numbered from the bottom. Even rows run left to right and odd
    /// rows run right to left, so consecutive tiles are always adjacent.
    #[must_use]
    pub const fn coordinate(self) -> GridCoord {
        let offset = self.0 - FIRST_TILE;
        let row = offset / GRID_WIDTH;
        let step = offset % GRID_WIDTH;
        let column = if row % 2 == 0 {
            step
        } else {
            GRID_WIDTH - 1 - step
        };
        GridCoord::new(column, row)
    }
}

impl TryFrom<u32> for TileIndex {
    type Error = InvalidTile;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TileIndex> for u32 {
    fn from(tile: TileIndex) -> Self {
        tile.get()
    }
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Iterates every tile of the board in ascending order.
pub fn board_tiles() -> impl Iterator<Item = TileIndex> {
    (FIRST_TILE..=FINAL_TILE).map(TileIndex)
}

/// Location of a tile on the 10×10 board grid, counted from the bottom-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    column: u32,
    row: u32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column, increasing to the right.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row, increasing upward.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Face shown by a six-sided die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DieFace(u8);

impl DieFace {
    /// Every face of the die in ascending order.
    pub const ALL: [Self; 6] = [Self(1), Self(2), Self(3), Self(4), Self(5), Self(6)];

    /// Creates a die face, rejecting values outside `1..=6`.
    pub const fn new(value: u8) -> Result<Self, InvalidDieFace> {
        if value >= 1 && value <= 6 {
            Ok(Self(value))
        } else {
            Err(InvalidDieFace { value })
        }
    }

    /// Numeric value of the face.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DieFace {
    type Error = InvalidDieFace;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DieFace> for u8 {
    fn from(face: DieFace) -> Self {
        face.get()
    }
}

impl fmt::Display for DieFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction a warp moves the token in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarpKind {
    /// Moves the token backward ("snake").
    Setback,
    /// Moves the token forward ("ladder").
    Shortcut,
}

/// Single warp edge of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Warp {
    /// Whether the warp is a setback or a shortcut.
    pub kind: WarpKind,
    /// Tile that triggers the warp when landed on.
    pub from: TileIndex,
    /// Tile the warp moves the token to.
    pub to: TileIndex,
}

/// Observable phases of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Ready to accept a roll.
    Idle,
    /// Rolls are blocked until the pending chance question is answered.
    AwaitingChance,
    /// The token reached the final tile; only a reset is accepted.
    Won,
}

/// Zero-based index of an answer option.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Choice(usize);

impl Choice {
    /// Creates a choice referring to the option at `index`.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Zero-based option index.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Read-only snapshot of a session handed to presentation code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Tile currently occupied by the token.
    pub position: TileIndex,
    /// Number of counted (non-free) rolls taken so far.
    pub roll_count: u32,
    /// Indicates whether a chance question awaits an answer.
    pub pending_chance: bool,
    /// Indicates whether the next turn has been granted as a free roll.
    pub free_roll_granted: bool,
    /// Most recent event, kept so adapters can replay the latest message.
    pub last_event: Option<Event>,
    /// Indicates whether the token reached the final tile.
    pub finished: bool,
}

impl GameState {
    /// State every session starts from and returns to on reset.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            position: TileIndex::START,
            roll_count: 0,
            pending_chance: false,
            free_roll_granted: false,
            last_event: None,
            finished: false,
        }
    }

    /// Derives the state-machine phase from the snapshot flags.
    ///
    /// A pending question takes precedence over a finished game so that a
    /// chance tile on the goal still asks its question first.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.pending_chance {
            Phase::AwaitingChance
        } else if self.finished {
            Phase::Won
        } else {
            Phase::Idle
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Multiple-choice question asked when a chance tile is reached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChanceQuestion {
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
}

impl ChanceQuestion {
    /// Creates a question. Validation happens when it becomes part of a [`BoardConfig`].
    #[must_use]
    pub fn new<P, O>(prompt: P, options: Vec<O>, correct_index: usize) -> Self
    where
        P: Into<String>,
        O: Into<String>,
    {
        Self {
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_index,
        }
    }

    /// Text of the question.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Answer options in presentation order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index of the correct option.
    #[must_use]
    pub const fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// Reports whether `choice` refers to one of the offered options.
    #[must_use]
    pub fn offers(&self, choice: Choice) -> bool {
        choice.get() < self.options.len()
    }

    /// Reports whether `choice` is the correct option.
    #[must_use]
    pub const fn is_correct(&self, choice: Choice) -> bool {
        choice.get() == self.correct_index
    }
}

/// Malformed board configuration detected before any turn is taken.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A configured tile number lies outside the board.
    #[error(transparent)]
    InvalidTile(#[from] InvalidTile),
    /// The same tile starts both a setback and a shortcut.
    #[error("tile {tile} starts both a setback and a shortcut")]
    OverlappingWarp {
        /// Tile present in both mappings.
        tile: TileIndex,
    },
    /// A warp leads back to the tile it starts from.
    #[error("warp at tile {tile} points at itself")]
    SelfLoop {
        /// Tile whose warp targets itself.
        tile: TileIndex,
    },
    /// A setback does not move the token backward.
    #[error("setback {from} -> {to} does not move backward")]
    SetbackNotBackward {
        /// Source of the offending setback.
        from: TileIndex,
        /// Target of the offending setback.
        to: TileIndex,
    },
    /// A shortcut does not move the token forward.
    #[error("shortcut {from} -> {to} does not move forward")]
    ShortcutNotForward {
        /// Source of the offending shortcut.
        from: TileIndex,
        /// Target of the offending shortcut.
        to: TileIndex,
    },
    /// A warp starts on the terminal tile.
    #[error("tile {tile} is the goal and cannot start a warp")]
    WarpFromGoal {
        /// Offending warp source.
        tile: TileIndex,
    },
    /// Following warps from a tile eventually returns to it.
    #[error("warps starting at tile {tile} form a cycle")]
    WarpCycle {
        /// Tile on the cycle.
        tile: TileIndex,
    },
    /// The chance question offers no answers.
    #[error("the chance question offers no options")]
    NoOptions,
    /// The correct answer index does not refer to an offered option.
    #[error("correct option {index} is outside the {options} offered options")]
    CorrectOptionMissing {
        /// Configured correct index.
        index: usize,
        /// Number of offered options.
        options: usize,
    },
}

/// Static board description supplied at session start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardConfig {
    setbacks: BTreeMap<TileIndex, TileIndex>,
    shortcuts: BTreeMap<TileIndex, TileIndex>,
    chance_tiles: BTreeSet<TileIndex>,
    chance_question: ChanceQuestion,
}

const REFERENCE_SETBACKS: [(u32, u32); 10] = [
    (16, 6),
    (47, 26),
    (49, 11),
    (56, 53),
    (62, 19),
    (64, 60),
    (87, 24),
    (93, 73),
    (95, 75),
    (98, 78),
];

const REFERENCE_SHORTCUTS: [(u32, u32); 9] = [
    (2, 38),
    (4, 14),
    (9, 31),
    (21, 42),
    (28, 84),
    (36, 44),
    (51, 67),
    (71, 91),
    (80, 100),
];

const REFERENCE_CHANCE_INTERVAL: u32 = 6;

impl BoardConfig {
    /// Creates a validated board configuration.
    pub fn new(
        setbacks: BTreeMap<TileIndex, TileIndex>,
        shortcuts: BTreeMap<TileIndex, TileIndex>,
        chance_tiles: BTreeSet<TileIndex>,
        chance_question: ChanceQuestion,
    ) -> Result<Self, ConfigurationError> {
        let config = Self {
            setbacks,
            shortcuts,
            chance_tiles,
            chance_question,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reference board: classic snakes and ladders with a chance tile every six tiles.
    #[must_use]
    pub fn reference() -> Self {
        let pairs = |entries: &[(u32, u32)]| {
            entries
                .iter()
                .map(|&(from, to)| (TileIndex(from), TileIndex(to)))
                .collect::<BTreeMap<_, _>>()
        };

        Self {
            setbacks: pairs(&REFERENCE_SETBACKS[..]),
            shortcuts: pairs(&REFERENCE_SHORTCUTS[..]),
            chance_tiles: (REFERENCE_CHANCE_INTERVAL..FINAL_TILE)
                .step_by(REFERENCE_CHANCE_INTERVAL as usize)
                .map(TileIndex)
                .collect(),
            chance_question: ChanceQuestion::new(
                "Which retrofit measure typically has the biggest impact on reducing carbon emissions?",
                vec!["Loft insulation", "Solar panels", "Air source heat pumps"],
                2,
            ),
        }
    }

    /// Checks the warp graph and the chance question for structural errors.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (&from, &to) in &self.setbacks {
            check_warp(WarpKind::Setback, from, to)?;
        }
        for (&from, &to) in &self.shortcuts {
            check_warp(WarpKind::Shortcut, from, to)?;
        }

        if let Some(&tile) = self
            .setbacks
            .keys()
            .find(|tile| self.shortcuts.contains_key(tile))
        {
            return Err(ConfigurationError::OverlappingWarp { tile });
        }

        self.check_cycles()?;

        let question = &self.chance_question;
        if question.options.is_empty() {
            return Err(ConfigurationError::NoOptions);
        }
        if question.correct_index >= question.options.len() {
            return Err(ConfigurationError::CorrectOptionMissing {
                index: question.correct_index,
                options: question.options.len(),
            });
        }

        Ok(())
    }

    fn check_cycles(&self) -> Result<(), ConfigurationError> {
        let next = |tile: TileIndex| {
            self.setbacks
                .get(&tile)
                .or_else(|| self.shortcuts.get(&tile))
                .copied()
        };
        let limit = self.setbacks.len() + self.shortcuts.len();

        for &start in self.setbacks.keys().chain(self.shortcuts.keys()) {
            let mut current = next(start);
            for _ in 0..limit {
                match current {
                    Some(tile) if tile == start => {
                        return Err(ConfigurationError::WarpCycle { tile: start });
                    }
                    Some(tile) => current = next(tile),
                    None => break,
                }
            }
        }

        Ok(())
    }

    /// Configured setbacks keyed by source tile.
    #[must_use]
    pub fn setbacks(&self) -> &BTreeMap<TileIndex, TileIndex> {
        &self.setbacks
    }

    /// Configured shortcuts keyed by source tile.
    #[must_use]
    pub fn shortcuts(&self) -> &BTreeMap<TileIndex, TileIndex> {
        &self.shortcuts
    }

    /// Tiles that trigger a chance question.
    #[must_use]
    pub fn chance_tiles(&self) -> &BTreeSet<TileIndex> {
        &self.chance_tiles
    }

    /// Question asked on chance tiles.
    #[must_use]
    pub fn chance_question(&self) -> &ChanceQuestion {
        &self.chance_question
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::reference()
    }
}

fn check_warp(kind: WarpKind, from: TileIndex, to: TileIndex) -> Result<(), ConfigurationError> {
    if from == to {
        return Err(ConfigurationError::SelfLoop { tile: from });
    }
    if from.is_goal() {
        return Err(ConfigurationError::WarpFromGoal { tile: from });
    }
    match kind {
        WarpKind::Setback if to > from => Err(ConfigurationError::SetbackNotBackward { from, to }),
        WarpKind::Shortcut if to < from => Err(ConfigurationError::ShortcutNotForward { from, to }),
        _ => Ok(()),
    }
}
