#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Snakes and Ladders adapters.
//!
//! Adapters build a [`Scene`] from a read-only [`GameState`] snapshot and the
//! board layout, then hand it to a [`RenderingBackend`]. Nothing in this crate
//! mutates game state.

use std::{cmp::Reverse, collections::BTreeSet, io::Write};

use anyhow::{Context, Result as AnyResult};
use snakes_ladders_core::{
    board_tiles, ChanceQuestion, Event, GameState, GridCoord, Phase, TileIndex, Warp, WarpKind,
    GRID_WIDTH,
};

/// Names used when describing the board to the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    /// Title shown above the board.
    pub title: String,
    /// Word used for setbacks.
    pub setback_noun: String,
    /// Word used for shortcuts.
    pub shortcut_noun: String,
    /// Announcement printed when the goal is reached.
    pub goal_message: String,
    /// Replaces the default setback sentence. `{from}` and `{to}` are filled in.
    pub setback_message: Option<String>,
    /// Replaces the default shortcut sentence. `{from}` and `{to}` are filled in.
    pub shortcut_message: Option<String>,
}

impl Theme {
    /// Word used for warps of the provided kind.
    #[must_use]
    pub fn noun(&self, kind: WarpKind) -> &str {
        match kind {
            WarpKind::Setback => &self.setback_noun,
            WarpKind::Shortcut => &self.shortcut_noun,
        }
    }

    fn warp_message(&self, kind: WarpKind, from: TileIndex, to: TileIndex) -> String {
        let template = match kind {
            WarpKind::Setback => self.setback_message.as_deref(),
            WarpKind::Shortcut => self.shortcut_message.as_deref(),
        };
        match (template, kind) {
            (Some(template), _) => template
                .replace("{from}", &from.to_string())
                .replace("{to}", &to.to_string()),
            (None, WarpKind::Setback) => format!(
                "Oh no! A {} drags you from {from} down to {to}.",
                self.noun(kind)
            ),
            (None, WarpKind::Shortcut) => {
                format!("A {} lifts you from {from} up to {to}.", self.noun(kind))
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: "Snakes and Ladders".to_owned(),
            setback_noun: "snake".to_owned(),
            shortcut_noun: "ladder".to_owned(),
            goal_message: "You reached tile 100".to_owned(),
            setback_message: None,
            shortcut_message: None,
        }
    }
}

/// Decoration drawn on a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileMarker {
    /// Tile without special behaviour.
    Plain,
    /// Tile that starts a setback.
    Setback {
        /// Tile the setback leads to.
        to: TileIndex,
    },
    /// Tile that starts a shortcut.
    Shortcut {
        /// Tile the shortcut leads to.
        to: TileIndex,
    },
    /// Tile that triggers the chance question.
    Chance,
    /// Terminal tile.
    Goal,
}

impl TileMarker {
    /// Single character used by text backends.
    #[must_use]
    pub const fn glyph(&self) -> char {
        match self {
            Self::Plain => ' ',
            Self::Setback { .. } => 'v',
            Self::Shortcut { .. } => '^',
            Self::Chance => '?',
            Self::Goal => '*',
        }
    }
}

/// Tile placed on the grid together with its decoration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePresentation {
    /// Tile number.
    pub tile: TileIndex,
    /// Grid cell the tile occupies.
    pub coord: GridCoord,
    /// Decoration drawn on the tile.
    pub marker: TileMarker,
    /// Indicates whether the token stands on this tile.
    pub occupied: bool,
}

/// Board layout a scene is built from.
#[derive(Clone, Copy, Debug)]
pub struct BoardPresentation<'a> {
    /// Setbacks still present on the board.
    pub setbacks: &'a [Warp],
    /// Shortcuts of the board.
    pub shortcuts: &'a [Warp],
    /// Tiles that trigger the chance question.
    pub chance_tiles: &'a BTreeSet<TileIndex>,
}

impl BoardPresentation<'_> {
    fn marker(&self, tile: TileIndex) -> TileMarker {
        if tile.is_goal() {
            return TileMarker::Goal;
        }
        if let Some(warp) = self.setbacks.iter().find(|warp| warp.from == tile) {
            return TileMarker::Setback { to: warp.to };
        }
        if let Some(warp) = self.shortcuts.iter().find(|warp| warp.from == tile) {
            return TileMarker::Shortcut { to: warp.to };
        }
        if self.chance_tiles.contains(&tile) {
            TileMarker::Chance
        } else {
            TileMarker::Plain
        }
    }
}

/// Summary line shown under the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusLine {
    /// Tile occupied by the token.
    pub position: TileIndex,
    /// Counted rolls so far.
    pub roll_count: u32,
    /// Indicates whether the next roll is free.
    pub free_roll: bool,
    /// Current phase of the session.
    pub phase: Phase,
}

/// Pending chance question as shown to the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionPresentation {
    /// Question text.
    pub prompt: String,
    /// Options, numbered from one when displayed.
    pub options: Vec<String>,
}

/// Scene description combining the board, the token and recent messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Every tile, ordered top row first and left to right within a row.
    pub tiles: Vec<TilePresentation>,
    /// Summary of the session state.
    pub status: StatusLine,
    /// Messages describing the latest events.
    pub messages: Vec<String>,
    /// Question to display while a chance event is pending.
    pub question: Option<QuestionPresentation>,
}

impl Scene {
    /// Lays out the board for the provided snapshot.
    #[must_use]
    pub fn new(
        state: &GameState,
        board: &BoardPresentation<'_>,
        question: &ChanceQuestion,
        messages: Vec<String>,
    ) -> Self {
        let mut tiles: Vec<TilePresentation> = board_tiles()
            .map(|tile| TilePresentation {
                tile,
                coord: tile.coordinate(),
                marker: board.marker(tile),
                occupied: tile == state.position,
            })
            .collect();
        tiles.sort_by_key(|tile| (Reverse(tile.coord.row()), tile.coord.column()));

        let phase = state.phase();
        let question = (phase == Phase::AwaitingChance).then(|| QuestionPresentation {
            prompt: question.prompt().to_owned(),
            options: question.options().to_vec(),
        });

        Self {
            tiles,
            status: StatusLine {
                position: state.position,
                roll_count: state.roll_count,
                free_roll: state.free_roll_granted,
                phase,
            },
            messages,
            question,
        }
    }

    /// Looks up the presentation of a single tile.
    #[must_use]
    pub fn tile(&self, tile: TileIndex) -> Option<&TilePresentation> {
        self.tiles.iter().find(|presentation| presentation.tile == tile)
    }

    /// Tiles grouped by row, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &[TilePresentation]> {
        self.tiles.chunks(GRID_WIDTH as usize)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Names used for the board.
    pub theme: Theme,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new(theme: Theme, scene: Scene) -> Self {
        Self { theme, scene }
    }
}

/// Rendering backend capable of presenting Snakes and Ladders scenes.
pub trait RenderingBackend {
    /// Draws the presentation once.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Backend that draws the board as plain text.
#[derive(Debug)]
pub struct TextBackend<W> {
    out: W,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing to `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, presentation: &Presentation) -> std::io::Result<()> {
        let theme = &presentation.theme;
        let scene = &presentation.scene;

        writeln!(self.out, "== {} ==", theme.title)?;
        for row in scene.rows() {
            let cells: Vec<String> = row
                .iter()
                .map(|tile| {
                    let token = if tile.occupied { '@' } else { ' ' };
                    format!("{:>3}{}{}", tile.tile.get(), tile.marker.glyph(), token)
                })
                .collect();
            writeln!(self.out, "{}", cells.join(" ").trim_end())?;
        }
        writeln!(
            self.out,
            "v {}  ^ {}  ? chance  * goal  @ you",
            theme.setback_noun, theme.shortcut_noun
        )?;

        let status = scene.status;
        let free = if status.free_roll {
            " | free roll ready"
        } else {
            ""
        };
        writeln!(
            self.out,
            "Tile {} | Rolls {}{}",
            status.position, status.roll_count, free
        )?;

        for message in &scene.messages {
            writeln!(self.out, "{message}")?;
        }

        if let Some(question) = &scene.question {
            writeln!(self.out, "Chance question: {}", question.prompt)?;
            for (number, option) in question.options.iter().enumerate() {
                writeln!(self.out, "  {}) {option}", number + 1)?;
            }
        }

        self.out.flush()
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()> {
        self.draw(presentation)
            .context("failed to write the board to the terminal")
    }
}

/// Turns an event into a line of text for the player.
#[must_use]
pub fn describe(event: &Event, theme: &Theme) -> String {
    match event {
        Event::RollResult { roll, landed } => {
            format!("You rolled a {roll} and moved to tile {landed}.")
        }
        Event::WarpApplied { kind, from, to } => theme.warp_message(*kind, *from, *to),
        Event::ChanceTriggered { tile } => {
            format!("Tile {tile} is a chance tile. Answer the question to keep playing.")
        }
        Event::ChanceResolved {
            correct: true,
            removed_setback: Some(tile),
        } => format!(
            "Correct! You get a free roll, and the {} on tile {tile} has been removed.",
            theme.setback_noun
        ),
        Event::ChanceResolved {
            correct: true,
            removed_setback: None,
        } => "Correct! You get a free roll.".to_owned(),
        Event::ChanceResolved { correct: false, .. } => {
            "Incorrect. Better luck next time.".to_owned()
        }
        Event::GameWon { rolls } => format!("{} in {rolls} rolls!", theme.goal_message),
        Event::CommandRejected { reason } => format!("Not now: {reason}."),
    }
}
