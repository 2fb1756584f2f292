use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Question;

/// One question's lifecycle from deal to close. A round with no
/// `complete_time` is the open round; a round that never closes is an
/// abandoned round and stays in history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub id: i64,
    pub question_id: i64,
    pub open_time: DateTime<Utc>,
    pub complete_time: Option<DateTime<Utc>>,
    pub correct_player_id: Option<i64>,
}

impl Round {
    pub fn is_open(&self) -> bool {
        self.complete_time.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundWithQuestion {
    pub round: Round,
    pub question: Question,
}
