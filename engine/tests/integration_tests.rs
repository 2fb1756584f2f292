//! End-to-end tests for the round driver: deal, guess, win, skip and
//! scoreboard flows against an in-memory store.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use database::{create_tables, ContentLoader, DatabaseConfig, StoreError};
use engine::{GameConfig, GameError, TriviaGame};
use sqlx::SqlitePool;

const SEED: &str = r#"[
    {
        "show_number": 7094,
        "show_year": 2015,
        "title": "WORLD CAPITALS",
        "comment": null,
        "questions": [
            { "value": 200, "question": "Capital of France", "answer": "Paris" }
        ]
    }
]"#;

async fn seeded_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: ":memory:".to_string(),
        pool_size: 1,
        acquire_timeout: Duration::from_secs(5),
    };
    let pool = config.create_pool().await.expect("in-memory pool");
    create_tables(&pool).await.expect("schema bootstrap");
    ContentLoader::new(pool.clone())
        .load_json(SEED)
        .await
        .expect("seed content");
    pool
}

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).unwrap()
}

#[tokio::test]
async fn test_wrong_then_right_guess_wins_the_round() {
    let game = TriviaGame::new(seeded_pool().await, GameConfig::new("slack"));

    let dealt = game.deal(Utc::now()).await.expect("deal");
    assert_eq!(dealt.question.answer, "Paris");

    let alice = game.ensure_player("alice").await.expect("register");
    assert_eq!(game.ensure_player("alice").await.expect("again"), alice);

    let miss = game
        .submit_answer("alice", "London", Utc::now())
        .await
        .expect("wrong guess");
    assert!(!miss.correct);
    assert_eq!(miss.guess_number, 1);
    assert!(miss.winner.is_none());

    let hit = game
        .submit_answer("alice", "paris", Utc::now())
        .await
        .expect("right guess");
    assert!(hit.correct);
    assert_eq!(hit.guess_number, 2);

    // Winner stats come from today's window.
    let winner = hit.winner.expect("winner stats");
    assert_eq!(winner.player_id, alice);
    assert_eq!(winner.uid, "alice");
    assert_eq!(winner.score, 200);
    assert_eq!(winner.rank, 1);

    // The round is closed and recorded.
    let last = game.last_round().await.expect("query").expect("round");
    assert!(!last.round.is_open());
    assert_eq!(last.round.id, dealt.round.id);
    assert!(last.round.correct_player_id.is_some());

    assert_eq!(game.player_score("alice").await.expect("score"), 200);
    assert_eq!(game.player_rank("alice").await.expect("rank"), 1);
}

#[tokio::test]
async fn test_dealing_over_an_open_round_is_a_conflict() {
    let game = TriviaGame::new(seeded_pool().await, GameConfig::new("slack"));

    game.deal(at(100)).await.expect("first deal");
    assert!(matches!(
        game.deal(at(101)).await,
        Err(GameError::Store(StoreError::RoundAlreadyOpen))
    ));
}

#[tokio::test]
async fn test_guess_without_an_open_round() {
    let game = TriviaGame::new(seeded_pool().await, GameConfig::new("slack"));
    assert!(matches!(
        game.submit_answer("alice", "Paris", Utc::now()).await,
        Err(GameError::Store(StoreError::NoOpenRound))
    ));
}

#[tokio::test]
async fn test_skip_respects_minimum_round_age() {
    let mut config = GameConfig::new("slack");
    config.min_seconds_before_new = 30;
    let game = TriviaGame::new(seeded_pool().await, config);

    game.deal(at(100)).await.expect("deal");

    match game.skip(at(110)).await {
        Err(GameError::TooSoon { wait_secs }) => assert_eq!(wait_secs, 20),
        other => panic!("expected TooSoon, got {other:?}"),
    }

    game.skip(at(130)).await.expect("old enough now");

    // A skipped round stays in history with no winner and credits nobody.
    let last = game.last_round().await.expect("query").expect("round");
    assert!(!last.round.is_open());
    assert_eq!(last.round.correct_player_id, None);
    assert!(game
        .scoreboard(&types::Window::all_time(), None)
        .await
        .expect("scoreboard")
        .is_empty());
}

#[tokio::test]
async fn test_resume_restores_only_open_rounds() {
    let game = TriviaGame::new(seeded_pool().await, GameConfig::new("slack"));

    assert!(game.resume().await.expect("fresh store").is_none());

    let dealt = game.deal(Utc::now()).await.expect("deal");
    let resumed = game.resume().await.expect("query").expect("open round");
    assert_eq!(resumed.round.id, dealt.round.id);
    assert_eq!(resumed.question.answer, "Paris");

    game.submit_answer("alice", "Paris", Utc::now())
        .await
        .expect("win closes the round");
    assert!(game.resume().await.expect("query").is_none());
}

#[tokio::test]
async fn test_scoreboard_ranks_players() {
    let game = TriviaGame::new(seeded_pool().await, GameConfig::new("slack"));

    // Two rounds of the same question: alice wins both, bob misses once.
    game.deal(Utc::now()).await.expect("deal");
    game.submit_answer("bob", "Berlin", Utc::now())
        .await
        .expect("bob misses");
    game.submit_answer("alice", "Paris", Utc::now())
        .await
        .expect("alice wins");

    game.deal(Utc::now()).await.expect("second deal");
    game.submit_answer("alice", "Paris", Utc::now())
        .await
        .expect("alice wins again");

    let rows = game
        .scoreboard(&types::Window::all_time(), None)
        .await
        .expect("scoreboard");
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].uid.as_str(), rows[0].rank, rows[0].score), ("alice", 1, 400));
    assert_eq!((rows[1].uid.as_str(), rows[1].rank, rows[1].score), ("bob", 2, 0));
    assert_eq!(rows[1].percent, 0);

    let only_bob = game
        .scoreboard(&types::Window::all_time(), Some("bob"))
        .await
        .expect("scoreboard");
    assert_eq!(only_bob.len(), 1);
    assert_eq!(only_bob[0].rank, 2, "rank stays relative to the full board");
}
