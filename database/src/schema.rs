use sqlx::SqlitePool;

use crate::error::StoreError;

/// Schema bootstrap, run once at startup. All statements are idempotent.
///
/// The partial unique index on `round` is the single-open-round invariant:
/// every open row indexes the same expression value, so a second open row is
/// a constraint violation no matter how it is inserted.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS category (
        id INTEGER NOT NULL PRIMARY KEY,
        show_number INTEGER,
        show_year INTEGER,
        title TEXT NOT NULL,
        comment TEXT
    )",
    "CREATE TABLE IF NOT EXISTS question (
        id INTEGER NOT NULL PRIMARY KEY,
        category_id INTEGER NOT NULL REFERENCES category (id),
        value INTEGER,
        question TEXT NOT NULL,
        answer TEXT NOT NULL,
        non_text INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS player (
        id INTEGER NOT NULL PRIMARY KEY,
        uid TEXT NOT NULL,
        platform TEXT NOT NULL,
        UNIQUE (uid, platform)
    )",
    "CREATE TABLE IF NOT EXISTS round (
        id INTEGER NOT NULL PRIMARY KEY,
        question_id INTEGER NOT NULL REFERENCES question (id),
        open_time TEXT NOT NULL,
        complete_time TEXT,
        correct_player_id INTEGER REFERENCES player (id)
    )",
    "CREATE TABLE IF NOT EXISTS attempt (
        id INTEGER NOT NULL PRIMARY KEY,
        round_id INTEGER NOT NULL REFERENCES round (id),
        player_id INTEGER NOT NULL REFERENCES player (id),
        guess_count INTEGER NOT NULL,
        correct INTEGER NOT NULL
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS round_single_open
        ON round ((complete_time IS NULL)) WHERE complete_time IS NULL",
    "CREATE INDEX IF NOT EXISTS round_complete_time ON round (complete_time)",
    "CREATE INDEX IF NOT EXISTS attempt_round ON attempt (round_id)",
    "CREATE INDEX IF NOT EXISTS attempt_player ON attempt (player_id)",
];

pub async fn create_tables(pool: &SqlitePool) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!("schema bootstrap complete");
    Ok(())
}
