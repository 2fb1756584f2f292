use serde::{Deserialize, Serialize};

/// One recorded guess outcome by one player against one round. Append-only;
/// never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    pub id: i64,
    pub round_id: i64,
    pub player_id: i64,
    pub guess_count: i64,
    pub correct: bool,
}
