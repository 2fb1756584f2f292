pub mod config;
pub mod error;
pub mod game;
pub mod matcher;
pub mod timeframe;

pub use config::GameConfig;
pub use error::GameError;
pub use game::{SubmitOutcome, TriviaGame};
pub use matcher::{answer_matches, answer_variants};
