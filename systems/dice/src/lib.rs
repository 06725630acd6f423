#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Die roll sources for the turn engine.
//!
//! The engine never touches a random number generator directly. It draws
//! every roll from a [`RollSource`], so games can be seeded for replays and
//! tests can script exact roll sequences.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snakes_ladders_core::{DieFace, InvalidDieFace};
use thiserror::Error;

/// Supplies die rolls to the turn engine.
pub trait RollSource {
    /// Draws the next die face.
    fn roll(&mut self) -> DieFace;
}

impl<R> RollSource for Box<R>
where
    R: RollSource + ?Sized,
{
    fn roll(&mut self) -> DieFace {
        (**self).roll()
    }
}

impl<R> RollSource for &mut R
where
    R: RollSource + ?Sized,
{
    fn roll(&mut self) -> DieFace {
        (**self).roll()
    }
}

/// Fair six-sided die driven by a seeded ChaCha generator.
#[derive(Clone, Debug)]
pub struct SeededDice {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededDice {
    /// Creates a die whose roll sequence is fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed the die was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl RollSource for SeededDice {
    fn roll(&mut self) -> DieFace {
        DieFace::ALL[self.rng.gen_range(0..DieFace::ALL.len())]
    }
}

/// Errors raised when building a scripted die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DiceError {
    /// A scripted die needs at least one face.
    #[error("scripted dice need at least one roll")]
    EmptyScript,
    /// A scripted value is not a die face.
    #[error(transparent)]
    InvalidFace(#[from] InvalidDieFace),
}

/// Die that replays a fixed sequence of faces, starting over when it runs out.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    faces: Vec<DieFace>,
    cursor: usize,
    drawn: usize,
}

impl ScriptedDice {
    /// Creates a scripted die from already validated faces.
    pub fn new(faces: Vec<DieFace>) -> Result<Self, DiceError> {
        if faces.is_empty() {
            return Err(DiceError::EmptyScript);
        }
        Ok(Self {
            faces,
            cursor: 0,
            drawn: 0,
        })
    }

    /// Creates a scripted die from raw values, rejecting anything outside `1..=6`.
    pub fn from_values(values: &[u8]) -> Result<Self, DiceError> {
        let faces = values
            .iter()
            .map(|&value| DieFace::new(value))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(faces)
    }

    /// Number of rolls drawn so far.
    #[must_use]
    pub const fn drawn(&self) -> usize {
        self.drawn
    }
}

impl RollSource for ScriptedDice {
    fn roll(&mut self) -> DieFace {
        // `cursor` stays below `faces.len()`, which is never zero.
        let face = self.faces[self.cursor];
        self.cursor = (self.cursor + 1) % self.faces.len();
        self.drawn = self.drawn.saturating_add(1);
        face
    }
}
