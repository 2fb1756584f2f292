pub mod attempts;
pub mod config;
pub mod content;
pub mod error;
pub mod leaderboard;
pub mod players;
pub mod questions;
pub mod retry;
pub mod rounds;
pub mod schema;


pub use attempts::AttemptStore;
pub use config::DatabaseConfig;
pub use content::{CategorySeed, ContentLoader, QuestionSeed};
pub use error::StoreError;
pub use leaderboard::{accuracy_percent, Leaderboard};
pub use players::PlayerStore;
pub use questions::{QuestionSource, QuestionStore};
pub use retry::retry_with_backoff;
pub use rounds::RoundStore;
pub use schema::create_tables;
