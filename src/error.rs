use thiserror::Error;

/// A play that violates the engine's contract. These indicate a caller bug
/// (or a corrupt saved game), never a normal outcome of play: a UI offering
/// only valid choices cannot produce them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPlay {
    #[error("operator cannot be '{0}'")]
    Operator(char),
    #[error("first and second must be different (both {0})")]
    SameIndex(usize),
    #[error("index {index} out of bounds for {len} numbers")]
    OutOfBounds { index: usize, len: usize },
    #[error("play {index} does not continue the previous numbers")]
    BrokenChain { index: usize },
    #[error("recorded result of play {index} differs from the recomputed fold")]
    InconsistentRecord { index: usize },
    #[error("too many plays for a five number game ({0})")]
    TooManyPlays(usize),
}

/// A game description that cannot exist: wrong numbers arity, an unknown
/// difficulty value, or a save format this build does not understand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidConfiguration {
    #[error("a game needs exactly 5 numbers (got {0})")]
    NumberCount(usize),
    #[error("invalid level value {0}")]
    LevelValue(u32),
    #[error("unsupported save format version {0}")]
    Version(u32),
}

/// Umbrella error for operations that can fail either way, such as decoding
/// a saved game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid play: {0}")]
    Play(#[from] InvalidPlay),
    #[error("invalid configuration: {0}")]
    Configuration(#[from] InvalidConfiguration),
}
