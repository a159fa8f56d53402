pub mod catalog;
pub mod error;
pub mod game;
pub mod locale;
pub mod store;
pub mod telemetry;
pub mod utils;

pub use error::{GameError, GameResult};
