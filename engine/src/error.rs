use database::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The open round is younger than the configured minimum age for a skip.
    #[error("wait {wait_secs} seconds before skipping this round")]
    TooSoon { wait_secs: i64 },
}
