use thiserror::Error;

/// Every storage failure is one of these named kinds; callers never see an
/// ambiguous generic error.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query execution error: {0}")]
    Query(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no round is currently open")]
    NoOpenRound,

    #[error("a round is already open")]
    RoundAlreadyOpen,

    #[error("player not found: {uid}@{platform}")]
    PlayerNotFound { uid: String, platform: String },

    #[error("question not found: {0}")]
    QuestionNotFound(i64),

    #[error("no questions available")]
    EmptyQuestionStore,

    #[error("foreign key violation: {0}")]
    ForeignKey(String),

    #[error("accuracy is undefined without attempts")]
    ZeroAttempts,

    #[error("retry exhausted: {0}")]
    RetryExhausted(String),
}

impl StoreError {
    /// Connection-level faults are safe to retry; everything else either
    /// already happened or will fail the same way again.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Connection(_) | StoreError::Transaction(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                StoreError::ForeignKey(db.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Connection(err.to_string())
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(StoreError::Connection("refused".into()).is_transient());
        assert!(StoreError::Transaction("busy".into()).is_transient());
        assert!(!StoreError::NoOpenRound.is_transient());
        assert!(!StoreError::ForeignKey("round_id".into()).is_transient());
    }
}
