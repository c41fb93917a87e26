use crate::error::InvalidPlay;
use crate::format::{apply_op, op_symbol, print_number, EPSILON};
use crate::level::Level;
use crate::play::Play;

/// The number of starting numbers in every puzzle.
pub const GAME_SIZE: usize = 5;

/// Complete state of one puzzle: the five starting numbers, the target, the
/// difficulty level, and every play made so far.
///
/// The starting numbers and target never change after construction; only
/// the play history moves, and only at its tail (push, pop, clear).
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    level: Level,
    numbers: [u32; GAME_SIZE],
    target: u32,
    plays: Vec<Play>,
}

impl GameState {
    pub fn new(level: Level, numbers: [u32; GAME_SIZE], target: u32) -> Self {
        Self {
            level,
            numbers,
            target,
            plays: Vec::new(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn numbers(&self) -> &[u32; GAME_SIZE] {
        &self.numbers
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    /// How many number slots are still live: 5 minus the plays made.
    pub fn active_count(&self) -> usize {
        GAME_SIZE - self.plays.len()
    }

    /// The numbers as they stand after all plays; the starting numbers when
    /// none have been made.
    pub fn current_numbers(&self) -> Vec<f64> {
        match self.plays.last() {
            Some(play) => play.numbers_post().to_vec(),
            None => self.numbers.iter().map(|&n| f64::from(n)).collect(),
        }
    }

    /// Folds two of the current numbers into one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPlay` if the triple fails validation against the
    /// current numbers. After four plays a single number remains, so no
    /// further triple can validate.
    pub fn add_play(&mut self, first: usize, second: usize, op: char) -> Result<&Play, InvalidPlay> {
        let play = Play::new(first, second, op, &self.current_numbers())?;
        self.plays.push(play);
        Ok(self.plays.last().expect("plays cannot be empty after push"))
    }

    /// Removes and returns the most recent play; the numbers revert to that
    /// play's pre state. Does nothing on an empty history — what "back"
    /// means with no plays is the caller's business.
    pub fn undo_last_play(&mut self) -> Option<Play> {
        self.plays.pop()
    }

    /// Clears all plays, returning the game to its starting numbers.
    pub fn reset(&mut self) {
        self.plays.clear();
    }

    /// The final value, once the game has folded down to one number.
    pub fn current_result(&self) -> Option<f64> {
        let current = self.current_numbers();
        if current.len() == 1 {
            Some(current[0])
        } else {
            None
        }
    }

    /// Whether the final value matches the target within rounding
    /// tolerance. Always false while more than one number remains.
    pub fn is_solved(&self) -> bool {
        match self.current_result() {
            Some(result) => (result - f64::from(self.target)).abs() < EPSILON,
            None => false,
        }
    }

    /// The display labels for the live slots, computed by replaying every
    /// play through this game's level rule.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.numbers.iter().map(|n| n.to_string()).collect();
        for play in &self.plays {
            self.level.next_labels(&mut labels, play);
        }
        labels
    }

    /// The step-by-step record of the solution attempt, one
    /// `"<a> <op> <b> = <result>"` line per play.
    ///
    /// The printed operand texts are folded in lockstep with the numbers,
    /// so a later play prints the *previous result's* text rather than a
    /// freshly reformatted number, and the lines stay consistent with each
    /// other.
    pub fn trace(&self) -> String {
        let mut numbers: Vec<f64> = self.numbers.iter().map(|&n| f64::from(n)).collect();
        let mut printed: Vec<String> = numbers.iter().map(|&n| print_number(n)).collect();

        let mut trace = String::new();
        for play in &self.plays {
            let result = apply_op(numbers[play.first()], numbers[play.second()], play.op());
            let printed_result = print_number(result);

            trace.push_str(&format!(
                "{} {} {} = {}\n",
                printed[play.first()],
                op_symbol(play.op()),
                printed[play.second()],
                printed_result
            ));

            numbers[play.first()] = result;
            printed[play.first()] = printed_result;
            numbers.remove(play.second());
            printed.remove(play.second());
        }
        trace
    }
}
