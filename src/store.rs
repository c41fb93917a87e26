use serde::{Deserialize, Serialize};

use crate::error::{GameError, InvalidConfiguration, InvalidPlay};
use crate::level::Level;
use crate::state::{GameState, GAME_SIZE};

/// Current save format version. Bump when the layout changes; decode
/// refuses versions it does not know.
pub const SAVE_VERSION: u32 = 1;

/// Tolerance when checking a saved play's recorded numbers against the
/// recomputed fold. Own saves round-trip exactly; this absorbs writers
/// that rendered floats with less care.
const RECORD_EPSILON: f64 = 1e-9;

/// Wire form of a [`GameState`], the hand-off layout between screens and
/// the on-disk save layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub version: u32,
    pub level: u32,
    pub numbers: Vec<u32>,
    pub target: u32,
    pub plays: Vec<SavedPlay>,
}

/// Wire form of one play, carrying its recorded pre/post snapshots so the
/// decoder can cross-check them against the recomputed fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlay {
    pub first: usize,
    pub second: usize,
    pub op: char,
    pub numbers_pre: Vec<f64>,
    pub numbers_post: Vec<f64>,
}

impl SavedGame {
    /// # Errors
    ///
    /// Returns the underlying serde_json error; the type itself always
    /// serializes.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// # Errors
    ///
    /// Returns the underlying serde_json error on malformed input. A
    /// well-formed document may still fail [`GameState::from_saved`]
    /// validation.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn records_match(recorded: &[f64], computed: &[f64]) -> bool {
    recorded.len() == computed.len()
        && recorded
            .iter()
            .zip(computed)
            .all(|(&a, &b)| a == b || (a - b).abs() < RECORD_EPSILON)
}

impl GameState {
    pub fn to_saved(&self) -> SavedGame {
        SavedGame {
            version: SAVE_VERSION,
            level: self.level().value(),
            numbers: self.numbers().to_vec(),
            target: self.target(),
            plays: self
                .plays()
                .iter()
                .map(|play| SavedPlay {
                    first: play.first(),
                    second: play.second(),
                    op: play.op(),
                    numbers_pre: play.numbers_pre().to_vec(),
                    numbers_post: play.numbers_post().to_vec(),
                })
                .collect(),
        }
    }

    /// Rebuilds a game from its wire form, re-validating everything: the
    /// version, the level value, the numbers arity, and every play — each
    /// recorded snapshot must match the fold recomputed from the play
    /// triples. Corrupt state is rejected, never silently accepted.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for header problems, `InvalidPlay` for a
    /// play that fails validation or contradicts its recorded numbers.
    pub fn from_saved(saved: &SavedGame) -> Result<Self, GameError> {
        if saved.version != SAVE_VERSION {
            return Err(InvalidConfiguration::Version(saved.version).into());
        }
        let level = Level::from_value(saved.level)?;
        let numbers: [u32; GAME_SIZE] = saved
            .numbers
            .as_slice()
            .try_into()
            .map_err(|_| InvalidConfiguration::NumberCount(saved.numbers.len()))?;
        if saved.plays.len() > GAME_SIZE - 1 {
            return Err(InvalidPlay::TooManyPlays(saved.plays.len()).into());
        }

        let mut state = Self::new(level, numbers, saved.target);
        for (index, saved_play) in saved.plays.iter().enumerate() {
            let play = state.add_play(saved_play.first, saved_play.second, saved_play.op)?;
            if !records_match(&saved_play.numbers_pre, play.numbers_pre()) {
                return Err(InvalidPlay::BrokenChain { index }.into());
            }
            if !records_match(&saved_play.numbers_post, play.numbers_post()) {
                return Err(InvalidPlay::InconsistentRecord { index }.into());
            }
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played_game() -> GameState {
        let mut game = GameState::new(Level::Hard, [7, 2, 8, 3, 1], 31);
        game.add_play(0, 1, '/').unwrap(); // 7 / 2 = 3.5
        game.add_play(2, 3, '-').unwrap(); // 3 - 1 = 2
        game.add_play(0, 2, '*').unwrap(); // 3.5 * 2 = 7
        game
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let game = played_game();
        let json = game.to_saved().to_json().unwrap();
        let restored = GameState::from_saved(&SavedGame::from_json(&json).unwrap()).unwrap();
        assert_eq!(restored, game);
        assert_eq!(restored.labels(), game.labels());
        assert_eq!(restored.trace(), game.trace());
    }

    #[test]
    fn test_round_trip_of_a_fresh_game() {
        let game = GameState::new(Level::Easy, [1, 2, 3, 4, 5], 11);
        let restored = GameState::from_saved(&game.to_saved()).unwrap();
        assert_eq!(restored, game);
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let mut saved = played_game().to_saved();
        saved.version = 2;
        assert_eq!(
            GameState::from_saved(&saved),
            Err(InvalidConfiguration::Version(2).into())
        );
    }

    #[test]
    fn test_unknown_level_value_is_rejected() {
        let mut saved = played_game().to_saved();
        saved.level = 7;
        assert_eq!(
            GameState::from_saved(&saved),
            Err(InvalidConfiguration::LevelValue(7).into())
        );
    }

    #[test]
    fn test_wrong_numbers_arity_is_rejected() {
        let mut saved = played_game().to_saved();
        saved.numbers.pop();
        assert_eq!(
            GameState::from_saved(&saved),
            Err(InvalidConfiguration::NumberCount(4).into())
        );
    }

    #[test]
    fn test_bad_play_triple_is_rejected() {
        let mut saved = played_game().to_saved();
        saved.plays[1].op = '%';
        assert_eq!(
            GameState::from_saved(&saved),
            Err(InvalidPlay::Operator('%').into())
        );
    }

    #[test]
    fn test_tampered_result_is_rejected() {
        let mut saved = played_game().to_saved();
        saved.plays[2].numbers_post[0] = 99.0;
        assert_eq!(
            GameState::from_saved(&saved),
            Err(InvalidPlay::InconsistentRecord { index: 2 }.into())
        );
    }

    #[test]
    fn test_broken_chain_is_rejected() {
        let mut saved = played_game().to_saved();
        saved.plays[1].numbers_pre[0] = 42.0;
        assert_eq!(
            GameState::from_saved(&saved),
            Err(InvalidPlay::BrokenChain { index: 1 }.into())
        );
    }

    #[test]
    fn test_too_many_plays_are_rejected() {
        let mut saved = played_game().to_saved();
        let extra = saved.plays[0].clone();
        saved.plays.extend([extra.clone(), extra]);
        assert_eq!(
            GameState::from_saved(&saved),
            Err(InvalidPlay::TooManyPlays(5).into())
        );
    }
}
