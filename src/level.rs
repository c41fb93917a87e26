use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;

use crate::error::InvalidConfiguration;
use crate::format::{op_symbol, parenthesize, print_number};
use crate::generate::create_solvable_game;
use crate::play::Play;
use crate::state::GameState;

/// Difficulty of a puzzle. The level fixes the range the generated target
/// must fall in, and how the number-slot labels evolve as plays are made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Easy, Level::Medium, Level::Hard, Level::VeryHard];

    /// The wire value used in saved games.
    pub fn value(self) -> u32 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
            Self::VeryHard => 4,
        }
    }

    /// Inverse of [`Level::value`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for values no level carries.
    pub fn from_value(value: u32) -> Result<Self, InvalidConfiguration> {
        match value {
            1 => Ok(Self::Easy),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Hard),
            4 => Ok(Self::VeryHard),
            other => Err(InvalidConfiguration::LevelValue(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::VeryHard => "very-hard",
        }
    }

    /// Display asset identifier for the level badge; opaque to the engine.
    pub fn color(self) -> &'static str {
        match self {
            Self::Easy => "green",
            Self::Medium => "yellow",
            Self::Hard | Self::VeryHard => "red",
        }
    }

    /// The range a generated target should land in.
    pub fn target_range(self) -> RangeInclusive<u32> {
        match self {
            Self::Easy => 11..=40,
            Self::Medium => 19..=60,
            Self::Hard => 60..=120,
            Self::VeryHard => 100..=150,
        }
    }

    /// Creates a new game at this level using the thread-local RNG.
    pub fn new_game(self) -> GameState {
        self.new_game_with(&mut rand::rng())
    }

    /// Creates a new game at this level from the given RNG.
    pub fn new_game_with<R: Rng + ?Sized>(self, rng: &mut R) -> GameState {
        let (numbers, target) = create_solvable_game(rng, self.target_range());
        GameState::new(self, numbers, target)
    }

    /// Rewrites the label array to reflect `play`, using this level's
    /// strategy. The labels fold exactly like the numbers: the combined
    /// slot keeps `first`'s position and everything right of `second`
    /// shifts left.
    pub fn next_labels(self, labels: &mut Vec<String>, play: &Play) {
        match self {
            // Plain numbers, no history: every label is just the post-play
            // value, reformatted.
            Self::Easy => {
                labels.clear();
                labels.extend(play.numbers_post().iter().map(|&n| print_number(n)));
            }
            // One step of history: the fresh slot shows how its number was
            // just made, from the operand values, not from earlier labels.
            Self::Medium => {
                let first = parenthesize(&print_number(play.numbers_pre()[play.first()]));
                let second = parenthesize(&print_number(play.numbers_pre()[play.second()]));
                labels.clear();
                labels.extend(play.numbers_post().iter().map(|&n| print_number(n)));
                labels[play.result_slot()] =
                    format!("{first} {} {second}", op_symbol(play.op()));
            }
            // Full history: labels accumulate into one nested expression
            // describing the entire derivation.
            Self::Hard | Self::VeryHard => {
                let first = parenthesize(&labels[play.first()]);
                let second = parenthesize(&labels[play.second()]);
                labels[play.first()] = format!("{first} {} {second}", op_symbol(play.op()));
                labels.remove(play.second());
            }
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
