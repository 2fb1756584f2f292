use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ranked leaderboard entry. Everything here is derived from the attempt
/// ledger at query time; nothing is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRow {
    /// Competition rank: tied scores share a rank, the next distinct score's
    /// rank is (players strictly above) + 1.
    pub rank: i64,
    pub player_id: i64,
    pub uid: String,
    pub score: i64,
    pub correct: i64,
    pub incorrect: i64,
    /// Integer percentage, `correct * 100 / (correct + incorrect)`.
    pub percent: i64,
}

/// How multiple attempts by one player against one round collapse into a
/// single correctness outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinPolicy {
    /// Any correct attempt credits the round.
    #[default]
    FirstCorrectWins,
    /// Only the terminal attempt's flag counts.
    LastAttemptWins,
}

/// Half-open time window `[start, end)` over round completion times.
/// `end = None` means unbounded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

impl Window {
    pub fn all_time() -> Self {
        Self {
            start: DateTime::<Utc>::UNIX_EPOCH,
            end: None,
        }
    }

    pub fn since(start: DateTime<Utc>) -> Self {
        Self { start, end: None }
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && self.end.map_or(true, |end| at < end)
    }
}
