//! TOML board files.
//!
//! TOML tables only have string keys, so warps are written as
//! `"47" = 26` entries under `[setbacks]` and `[shortcuts]`. The question
//! lives in a `[chance_question]` table; `[question]` is accepted as well.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
};

use anyhow::{Context, Result as AnyResult};
use serde::Deserialize;
use snakes_ladders_core::{BoardConfig, ChanceQuestion, ConfigurationError, InvalidTile, TileIndex};
use snakes_ladders_rendering::Theme;
use thiserror::Error;

/// Board configuration together with the names used to present it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LoadedBoard {
    pub(crate) config: BoardConfig,
    pub(crate) theme: Theme,
}

impl LoadedBoard {
    /// Reference board with the default theme.
    pub(crate) fn reference() -> Self {
        Self {
            config: BoardConfig::reference(),
            theme: Theme::default(),
        }
    }
}

/// Errors raised while turning a board file into a configuration.
#[derive(Debug, Error)]
pub(crate) enum BoardFileError {
    /// The file is not valid TOML or does not match the expected layout.
    #[error("could not parse board file: {0}")]
    Parse(#[from] toml::de::Error),
    /// A warp table key is not a tile number.
    #[error("warp key '{key}' is not a tile number")]
    InvalidKey {
        /// Offending key.
        key: String,
    },
    /// A tile number lies outside the board.
    #[error(transparent)]
    Tile(#[from] InvalidTile),
    /// The board failed validation.
    #[error(transparent)]
    Config(#[from] ConfigurationError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BoardFile {
    #[serde(default)]
    setbacks: BTreeMap<String, u32>,
    #[serde(default)]
    shortcuts: BTreeMap<String, u32>,
    #[serde(default)]
    chance_tiles: Vec<u32>,
    #[serde(alias = "question")]
    chance_question: Option<QuestionFile>,
    #[serde(default)]
    theme: ThemeFile,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct QuestionFile {
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThemeFile {
    title: Option<String>,
    setback_noun: Option<String>,
    shortcut_noun: Option<String>,
    goal_message: Option<String>,
    setback_message: Option<String>,
    shortcut_message: Option<String>,
}

impl ThemeFile {
    fn into_theme(self) -> Theme {
        let fallback = Theme::default();
        Theme {
            title: self.title.unwrap_or(fallback.title),
            setback_noun: self.setback_noun.unwrap_or(fallback.setback_noun),
            shortcut_noun: self.shortcut_noun.unwrap_or(fallback.shortcut_noun),
            goal_message: self.goal_message.unwrap_or(fallback.goal_message),
            setback_message: self.setback_message,
            shortcut_message: self.shortcut_message,
        }
    }
}

/// Reads and validates the board stored at `path`.
pub(crate) fn load(path: &Path) -> AnyResult<LoadedBoard> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read board file {}", path.display()))?;
    parse(&source).with_context(|| format!("invalid board file {}", path.display()))
}

/// Parses a board from TOML source.
///
/// A missing question falls back to the reference question.
pub(crate) fn parse(source: &str) -> Result<LoadedBoard, BoardFileError> {
    let file: BoardFile = toml::from_str(source)?;

    let setbacks = warp_table(file.setbacks)?;
    let shortcuts = warp_table(file.shortcuts)?;
    let chance_tiles = file
        .chance_tiles
        .into_iter()
        .map(TileIndex::new)
        .collect::<Result<BTreeSet<_>, _>>()?;
    let question = match file.chance_question {
        Some(question) => {
            ChanceQuestion::new(question.prompt, question.options, question.correct_index)
        }
        None => BoardConfig::reference().chance_question().clone(),
    };

    let config = BoardConfig::new(setbacks, shortcuts, chance_tiles, question)?;
    Ok(LoadedBoard {
        config,
        theme: file.theme.into_theme(),
    })
}

fn warp_table(
    entries: BTreeMap<String, u32>,
) -> Result<BTreeMap<TileIndex, TileIndex>, BoardFileError> {
    entries
        .into_iter()
        .map(|(key, to)| -> Result<(TileIndex, TileIndex), BoardFileError> {
            let from = key
                .trim()
                .parse::<u32>()
                .map_err(|_| BoardFileError::InvalidKey { key: key.clone() })?;
            Ok((TileIndex::new(from)?, TileIndex::new(to)?))
        })
        .collect()
}
