//! Error taxonomy shared by every part of the game engine.

use std::fmt::{Display, Formatter, Result as FmtResult};

use thiserror::Error;

use crate::game::PhaseKind;

/// Reasons a setup is rejected before a round can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    NoCategorySelected,
    TooFewPlayers,
}

impl Display for ValidationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ValidationKind::NoCategorySelected => write!(f, "no category selected"),
            ValidationKind::TooFewPlayers => write!(f, "not enough players"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Bad setup; the game stays in the setup phase
    #[error("invalid setup: {0}")]
    Validation(ValidationKind),

    /// None of the selected category ids exist in the catalog
    #[error("none of the selected categories are available")]
    NoCategorySelected,

    /// The selected categories have no words in the chosen language
    #[error("no words available for the selected categories")]
    NoWordsAvailable,

    #[error("cannot pick from an empty sequence")]
    EmptyInput,

    #[error("cannot pick {requested} distinct items out of {available}")]
    SubsetTooLarge { requested: usize, available: usize },

    /// A round-scoped operation was invoked without a round in play
    #[error("no active round")]
    NoActiveRound,

    #[error("expected the {expected} phase but the game is in {actual}")]
    WrongPhase {
        expected: PhaseKind,
        actual: PhaseKind,
    },

    #[error("the discussion timer must be started from within a tokio runtime")]
    NoRuntime,

    /// Persistence failures from the score or custom category stores
    #[error("store error: {0}")]
    Store(String),
}

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        GameError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Store(err.to_string())
    }
}

pub type GameResult<T> = Result<T, GameError>;
