use std::time::Duration;

use chrono::{DateTime, Utc};
use database::{
    retry_with_backoff, AttemptStore, Leaderboard, PlayerStore, QuestionSource, QuestionStore,
    RoundStore,
};
use sqlx::SqlitePool;
use types::{Round, RoundWithQuestion, ScoreRow, Window};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::matcher::answer_matches;
use crate::timeframe;

/// The game loop's view of the trivia core: deals questions, takes answers,
/// closes rounds, serves scoreboards. Holds no game state of its own; every
/// cross-request invariant lives in the store, so any number of instances
/// can drive the same database.
pub struct TriviaGame {
    config: GameConfig,
    questions: QuestionStore,
    players: PlayerStore,
    rounds: RoundStore,
    attempts: AttemptStore,
    leaderboard: Leaderboard,
}

/// What happened to one submitted guess.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub correct: bool,
    /// 1-based position of this guess among the player's guesses this round.
    pub guess_number: i64,
    /// The winner's score row for today's window, present on a win.
    pub winner: Option<ScoreRow>,
}

impl TriviaGame {
    pub fn new(pool: SqlitePool, config: GameConfig) -> Self {
        let questions =
            QuestionStore::new(pool.clone()).with_case_sensitive_search(config.case_sensitive_search);
        Self {
            questions,
            players: PlayerStore::new(pool.clone()),
            rounds: RoundStore::new(pool.clone()),
            attempts: AttemptStore::new(pool.clone()),
            leaderboard: Leaderboard::new(pool, config.win_policy),
            config,
        }
    }

    /// Deal a random question and open its round. The prior round must be
    /// closed or skipped first; dealing over an open round is a conflict.
    pub async fn deal(&self, at: DateTime<Utc>) -> Result<RoundWithQuestion, GameError> {
        let question = self.questions.random().await?;
        let round_id = self.rounds.open_round(question.id, at).await?;
        tracing::info!(round_id, question_id = question.id, "dealt new question");
        Ok(RoundWithQuestion {
            round: Round {
                id: round_id,
                question_id: question.id,
                open_time: at,
                complete_time: None,
                correct_player_id: None,
            },
            question,
        })
    }

    /// Restore the current question after a restart: the last round dealt,
    /// if it is still open.
    pub async fn resume(&self) -> Result<Option<RoundWithQuestion>, GameError> {
        match self.rounds.last_round().await? {
            Some(last) if last.round.is_open() => Ok(Some(last)),
            _ => Ok(None),
        }
    }

    /// Handle one guess from a player against the open round.
    ///
    /// The guess is matched before anything is written. A wrong guess is
    /// appended to the ledger and the round stays open. A right guess closes
    /// the round first and appends the correct attempt after: the close is
    /// the atomic step, so when two right answers race, exactly one attempt
    /// row is ever flagged correct and the loser surfaces `NoOpenRound`.
    pub async fn submit_answer(
        &self,
        uid: &str,
        text: &str,
        at: DateTime<Utc>,
    ) -> Result<SubmitOutcome, GameError> {
        let round = self.rounds.current_open_round().await?;
        let question = self.questions.by_id(round.question_id).await?;
        let player_id = self.players.ensure(uid, &self.config.platform).await?;
        let guess_number = self.attempts.guess_count_for(round.id, player_id).await? + 1;

        let correct = answer_matches(text, &question.answer, self.config.min_matching_characters);
        if !correct {
            self.attempts
                .record(round.id, player_id, guess_number, false)
                .await?;
            return Ok(SubmitOutcome {
                correct: false,
                guess_number,
                winner: None,
            });
        }

        self.rounds.close_round(Some(player_id), at).await?;
        self.attempts
            .record(round.id, player_id, guess_number, true)
            .await?;
        tracing::info!(round_id = round.id, uid, "round won");

        let winner = self
            .leaderboard
            .window(&self.config.platform, &timeframe::days_ago(0), Some(uid))
            .await?
            .into_iter()
            .next();
        Ok(SubmitOutcome {
            correct: true,
            guess_number,
            winner,
        })
    }

    /// Close the open round with no winner. Refused while the round is
    /// younger than the configured minimum age.
    pub async fn skip(&self, at: DateTime<Utc>) -> Result<(), GameError> {
        let round = self.rounds.current_open_round().await?;
        let age = at.signed_duration_since(round.open_time).num_seconds();
        let wait_secs = self.config.min_seconds_before_new - age;
        if wait_secs > 0 {
            return Err(GameError::TooSoon { wait_secs });
        }
        self.rounds.close_round(None, at).await?;
        tracing::info!(round_id = round.id, "round skipped");
        Ok(())
    }

    pub async fn last_round(&self) -> Result<Option<RoundWithQuestion>, GameError> {
        Ok(self.rounds.last_round().await?)
    }

    pub async fn ensure_player(&self, uid: &str) -> Result<i64, GameError> {
        Ok(self.players.ensure(uid, &self.config.platform).await?)
    }

    /// The ranked scoreboard for a window, optionally narrowed to one
    /// player's row. Read-only and idempotent, so transient storage faults
    /// are retried here.
    pub async fn scoreboard(
        &self,
        window: &Window,
        uid: Option<&str>,
    ) -> Result<Vec<ScoreRow>, GameError> {
        let leaderboard = self.leaderboard.clone();
        let platform = self.config.platform.clone();
        let window = *window;
        let uid = uid.map(str::to_string);

        let rows = retry_with_backoff(
            move || {
                let leaderboard = leaderboard.clone();
                let platform = platform.clone();
                let uid = uid.clone();
                Box::pin(async move {
                    leaderboard
                        .window(&platform, &window, uid.as_deref())
                        .await
                })
            },
            2,
            Duration::from_millis(50),
        )
        .await?;
        Ok(rows)
    }

    pub async fn player_score(&self, uid: &str) -> Result<i64, GameError> {
        Ok(self
            .leaderboard
            .player_score(uid, &self.config.platform)
            .await?)
    }

    pub async fn player_rank(&self, uid: &str) -> Result<i64, GameError> {
        Ok(self
            .leaderboard
            .player_rank(uid, &self.config.platform)
            .await?)
    }
}
