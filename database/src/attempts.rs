use sqlx::{Row, SqlitePool};
use types::Attempt;

use crate::error::StoreError;

/// Append-only guess ledger. Multiple rows per (round, player) are legal;
/// collapsing them into one outcome is the leaderboard's job, not the
/// ledger's.
#[derive(Clone)]
pub struct AttemptStore {
    pool: SqlitePool,
}

impl AttemptStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn record(
        &self,
        round_id: i64,
        player_id: i64,
        guess_count: i64,
        correct: bool,
    ) -> Result<i64, StoreError> {
        let result =
            sqlx::query("INSERT INTO attempt (round_id, player_id, guess_count, correct) VALUES (?, ?, ?, ?)")
                .bind(round_id)
                .bind(player_id)
                .bind(guess_count)
                .bind(correct)
                .execute(&self.pool)
                .await?;
        tracing::debug!(round_id, player_id, guess_count, correct, "attempt recorded");
        Ok(result.last_insert_rowid())
    }

    /// How many attempts this player has already logged against the round.
    /// Numbers the next guess.
    pub async fn guess_count_for(
        &self,
        round_id: i64,
        player_id: i64,
    ) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM attempt WHERE round_id = ? AND player_id = ?")
            .bind(round_id)
            .bind(player_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("n")?)
    }

    /// Every attempt logged against one round, in submission order.
    pub async fn for_round(&self, round_id: i64) -> Result<Vec<Attempt>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, round_id, player_id, guess_count, correct FROM attempt WHERE round_id = ? ORDER BY id",
        )
        .bind(round_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(Attempt {
                    id: row.try_get("id")?,
                    round_id: row.try_get("round_id")?,
                    player_id: row.try_get("player_id")?,
                    guess_count: row.try_get("guess_count")?,
                    correct: row.try_get("correct")?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::PlayerStore;
    use crate::rounds::RoundStore;
    use crate::tests::{at, memory_pool, seed_question};

    #[tokio::test]
    async fn test_record_and_count() {
        let pool = memory_pool().await;
        let question_id = seed_question(&pool, Some(200), "q", "a", false).await;
        let round_id = RoundStore::new(pool.clone())
            .open_round(question_id, at(100))
            .await
            .expect("open");
        let player_id = PlayerStore::new(pool.clone())
            .ensure("alice", "slack")
            .await
            .expect("player");

        let store = AttemptStore::new(pool);
        assert_eq!(store.guess_count_for(round_id, player_id).await.unwrap(), 0);

        store.record(round_id, player_id, 1, false).await.expect("first");
        store.record(round_id, player_id, 2, true).await.expect("second");
        assert_eq!(store.guess_count_for(round_id, player_id).await.unwrap(), 2);

        let logged = store.for_round(round_id).await.expect("ledger");
        assert_eq!(logged.len(), 2);
        assert!(!logged[0].correct);
        assert!(logged[1].correct);
        assert_eq!(logged[1].guess_count, 2);
    }

    #[tokio::test]
    async fn test_record_rejects_unknown_round() {
        let pool = memory_pool().await;
        let player_id = PlayerStore::new(pool.clone())
            .ensure("alice", "slack")
            .await
            .expect("player");

        let store = AttemptStore::new(pool);
        assert!(matches!(
            store.record(404, player_id, 1, false).await,
            Err(StoreError::ForeignKey(_))
        ));
    }

    #[tokio::test]
    async fn test_record_rejects_unknown_player() {
        let pool = memory_pool().await;
        let question_id = seed_question(&pool, Some(200), "q", "a", false).await;
        let round_id = RoundStore::new(pool.clone())
            .open_round(question_id, at(100))
            .await
            .expect("open");

        let store = AttemptStore::new(pool);
        assert!(matches!(
            store.record(round_id, 404, 1, false).await,
            Err(StoreError::ForeignKey(_))
        ));
    }
}
