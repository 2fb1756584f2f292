use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use types::{ScoreRow, WinPolicy, Window};

use crate::error::StoreError;

/// Derives rankings by aggregating the attempt ledger. Score, counts and
/// rank are recomputed from history on every query, so the results stay
/// consistent if a correctness determination is ever corrected or replayed,
/// and the whole computation is idempotent and safely re-runnable.
#[derive(Clone)]
pub struct Leaderboard {
    pool: SqlitePool,
    policy: WinPolicy,
}

/// Only attempts whose round completed inside the window qualify; abandoned
/// rounds never have a completion time and are invisible here. Rows come
/// back in attempt order so the terminal attempt per (round, player) is the
/// last one seen.
const LEDGER_WINDOW: &str = "\
SELECT a.round_id, a.player_id, a.correct, p.uid, q.value
FROM attempt a
JOIN round r ON r.id = a.round_id
JOIN player p ON p.id = a.player_id
JOIN question q ON q.id = r.question_id
WHERE p.platform = ?1
  AND r.complete_time IS NOT NULL
  AND r.complete_time >= ?2
  AND (?3 IS NULL OR r.complete_time < ?3)
ORDER BY a.id";

/// Windowed accuracy with the zero-attempt division explicitly guarded.
pub fn accuracy_percent(correct: i64, incorrect: i64) -> Result<i64, StoreError> {
    let total = correct + incorrect;
    if total == 0 {
        return Err(StoreError::ZeroAttempts);
    }
    Ok(correct * 100 / total)
}

/// One collapsed (round, player) outcome.
struct Outcome {
    player_id: i64,
    uid: String,
    correct: bool,
    points: i64,
}

#[derive(Default)]
struct Tally {
    player_id: i64,
    uid: String,
    score: i64,
    correct: i64,
    incorrect: i64,
}

impl Leaderboard {
    pub fn new(pool: SqlitePool, policy: WinPolicy) -> Self {
        Self { pool, policy }
    }

    /// The ranked window for one platform. Rank is always computed over the
    /// full platform window; the optional `uid` filter selects that player's
    /// row afterwards (empty if the player has no attempts in the window).
    pub async fn window(
        &self,
        platform: &str,
        window: &Window,
        uid: Option<&str>,
    ) -> Result<Vec<ScoreRow>, StoreError> {
        let rows = sqlx::query(LEDGER_WINDOW)
            .bind(platform)
            .bind(window.start)
            .bind(window.end)
            .fetch_all(&self.pool)
            .await?;

        let outcomes = self.collapse(&rows)?;
        let mut ranked = rank(aggregate(outcomes));
        tracing::debug!(
            platform,
            players = ranked.len(),
            attempts = rows.len(),
            "leaderboard window computed"
        );

        if let Some(uid) = uid {
            ranked.retain(|row| row.uid == uid);
        }
        Ok(ranked)
    }

    pub async fn alltime(&self, platform: &str) -> Result<Vec<ScoreRow>, StoreError> {
        self.window(platform, &Window::all_time(), None).await
    }

    /// All-time score for one player: the sum of point values of rounds that
    /// player answered correctly.
    pub async fn player_score(&self, uid: &str, platform: &str) -> Result<i64, StoreError> {
        Ok(self.player_row(uid, platform).await?.score)
    }

    /// All-time competition rank among the platform's players.
    pub async fn player_rank(&self, uid: &str, platform: &str) -> Result<i64, StoreError> {
        Ok(self.player_row(uid, platform).await?.rank)
    }

    async fn player_row(&self, uid: &str, platform: &str) -> Result<ScoreRow, StoreError> {
        self.window(platform, &Window::all_time(), Some(uid))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::PlayerNotFound {
                uid: uid.to_string(),
                platform: platform.to_string(),
            })
    }

    /// Collapse ledger rows to one outcome per (round, player) under the
    /// configured win policy.
    fn collapse(&self, rows: &[SqliteRow]) -> Result<Vec<Outcome>, StoreError> {
        let mut outcomes: HashMap<(i64, i64), Outcome> = HashMap::new();
        for row in rows {
            let round_id: i64 = row.try_get("round_id")?;
            let player_id: i64 = row.try_get("player_id")?;
            let correct: bool = row.try_get("correct")?;
            let entry = outcomes.entry((round_id, player_id)).or_insert(Outcome {
                player_id,
                uid: row.try_get("uid")?,
                correct: false,
                points: row.try_get::<Option<i64>, _>("value")?.unwrap_or(0),
            });
            match self.policy {
                WinPolicy::FirstCorrectWins => entry.correct |= correct,
                // Rows arrive in attempt order; the last write is the
                // terminal attempt's flag.
                WinPolicy::LastAttemptWins => entry.correct = correct,
            }
        }
        Ok(outcomes.into_values().collect())
    }
}

fn aggregate(outcomes: Vec<Outcome>) -> Vec<Tally> {
    let mut tallies: HashMap<i64, Tally> = HashMap::new();
    for outcome in outcomes {
        let tally = tallies.entry(outcome.player_id).or_insert(Tally {
            player_id: outcome.player_id,
            uid: outcome.uid,
            ..Tally::default()
        });
        if outcome.correct {
            tally.score += outcome.points;
            tally.correct += 1;
        } else {
            tally.incorrect += 1;
        }
    }
    tallies.into_values().collect()
}

/// Standard competition ranking in one pass over the sorted tallies: tied
/// scores share a rank, the next distinct score's rank is (players strictly
/// above) + 1.
fn rank(mut tallies: Vec<Tally>) -> Vec<ScoreRow> {
    tallies.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.uid.cmp(&b.uid)));

    let mut ranked = Vec::with_capacity(tallies.len());
    let mut current_rank = 0;
    let mut previous_score = None;
    for (position, tally) in tallies.into_iter().enumerate() {
        if previous_score != Some(tally.score) {
            current_rank = position as i64 + 1;
            previous_score = Some(tally.score);
        }
        // Tallies always carry at least one outcome, so the guard cannot
        // trip here; it exists for direct callers.
        let percent = accuracy_percent(tally.correct, tally.incorrect).unwrap_or(0);
        ranked.push(ScoreRow {
            rank: current_rank,
            player_id: tally.player_id,
            uid: tally.uid,
            score: tally.score,
            correct: tally.correct,
            incorrect: tally.incorrect,
            percent,
        });
    }
    ranked
}
