use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use types::{Round, RoundWithQuestion};

use crate::error::StoreError;
use crate::questions::question_from_row;

/// Opening is a single conditional insert: it only lands when no open round
/// exists, so two concurrent opens can never both succeed. The partial unique
/// index on `round` backs the same invariant at the constraint level.
const OPEN_ROUND: &str = "\
INSERT INTO round (question_id, open_time)
SELECT ?, ?
WHERE NOT EXISTS (SELECT 1 FROM round WHERE complete_time IS NULL)";

/// Locating the open round and closing it happen inside one statement; there
/// is no window for a second open between the lookup and the write. Most
/// recently opened wins if the store somehow holds several open rows.
const CLOSE_ROUND: &str = "\
UPDATE round SET complete_time = ?, correct_player_id = ?
WHERE id = (
    SELECT id FROM round
    WHERE complete_time IS NULL
    ORDER BY open_time DESC, id DESC
    LIMIT 1
)";

const CURRENT_OPEN_ROUND: &str = "\
SELECT id, question_id, open_time, complete_time, correct_player_id
FROM round
WHERE complete_time IS NULL
ORDER BY open_time DESC, id DESC
LIMIT 1";

const LAST_ROUND: &str = "\
SELECT r.id AS round_id, r.question_id, r.open_time, r.complete_time, r.correct_player_id,
       q.id, c.title AS category, c.comment, c.show_year AS year,
       q.value, q.question, q.answer, q.non_text
FROM round r
JOIN question q ON q.id = r.question_id
JOIN category c ON c.id = q.category_id
ORDER BY r.open_time DESC, r.id DESC
LIMIT 1";

fn round_from_row(row: &SqliteRow, id_column: &str) -> Result<Round, StoreError> {
    Ok(Round {
        id: row.try_get(id_column)?,
        question_id: row.try_get("question_id")?,
        open_time: row.try_get("open_time")?,
        complete_time: row.try_get("complete_time")?,
        correct_player_id: row.try_get("correct_player_id")?,
    })
}

#[derive(Clone)]
pub struct RoundStore {
    pool: SqlitePool,
}

impl RoundStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a round for `question_id`. Fails with `RoundAlreadyOpen` while
    /// any round is still open; the caller decides whether to close or
    /// abandon the prior round first.
    pub async fn open_round(
        &self,
        question_id: i64,
        at: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        let result = sqlx::query(OPEN_ROUND)
            .bind(question_id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::RoundAlreadyOpen);
        }
        let round_id = result.last_insert_rowid();
        tracing::info!(round_id, question_id, "round opened");
        Ok(round_id)
    }

    /// Close the open round, crediting `winner` (or nobody). Fails with
    /// `NoOpenRound` if nothing is open.
    pub async fn close_round(
        &self,
        winner: Option<i64>,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(CLOSE_ROUND)
            .bind(at)
            .bind(winner)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NoOpenRound);
        }
        tracing::info!(winner_player_id = winner, "round closed");
        Ok(())
    }

    pub async fn current_open_round(&self) -> Result<Round, StoreError> {
        let row = sqlx::query(CURRENT_OPEN_ROUND)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => round_from_row(&row, "id"),
            None => Err(StoreError::NoOpenRound),
        }
    }

    /// The most recently opened round, open or completed, with its question.
    /// `None` only on a store that has never dealt a round.
    pub async fn last_round(&self) -> Result<Option<RoundWithQuestion>, StoreError> {
        let row = sqlx::query(LAST_ROUND).fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(Some(RoundWithQuestion {
                round: round_from_row(&row, "round_id")?,
                question: question_from_row(&row)?,
            })),
            None => Ok(None),
        }
    }
}
