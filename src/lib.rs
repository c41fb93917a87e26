//! Engine for the "reach the target from five numbers" arithmetic puzzle:
//! puzzle generation, the play-folding state machine, per-difficulty label
//! rendering, an exhaustive solver, and a versioned save format.
//!
//! UI concerns (layout, input devices, preference storage) live with the
//! embedding application; this crate only hands it labels, traces and
//! verdicts.

pub mod entry;
pub mod error;
pub mod format;
pub mod generate;
pub mod level;
pub mod play;
pub mod solve;
pub mod state;
pub mod store;

pub use entry::EntryState;
pub use error::{GameError, InvalidConfiguration, InvalidPlay};
pub use format::{apply_op, op_symbol, parenthesize, print_number, EPSILON, OPS};
pub use generate::{create_solvable_game, find_solvable_target, random_numbers};
pub use level::Level;
pub use play::Play;
pub use solve::{count_solutions, describe_solution, find_solution, Step};
pub use state::{GameState, GAME_SIZE};
pub use store::{SavedGame, SavedPlay, SAVE_VERSION};
