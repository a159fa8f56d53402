pub mod lifecycle;
pub mod model;
pub mod reveal;
pub mod round;
pub mod scoring;
pub mod timer;

// Re-export the main types
pub use lifecycle::{Game, Phase, PhaseKind};
pub use model::{
    Category, DiscussionState, Language, Player, RevealCursor, Role, Round, SetupConfig,
    SpyHintLevel, WordItem,
};
pub use reveal::{RevealContent, RevealKind, SpyIntel};
pub use scoring::{Punishment, ScoreDelta, ScoreOutcome};
