use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use types::Question;

use crate::error::StoreError;

/// Read-only collaborator interface over the trivia content store.
///
/// The sequences are finite and restartable: calling `all` or `search` again
/// starts a fresh pass over the store.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// One question chosen uniformly at random among eligible questions.
    async fn random(&self) -> Result<Question, StoreError>;

    /// Exact lookup by id.
    async fn by_id(&self, id: i64) -> Result<Question, StoreError>;

    /// Every eligible question, lazily.
    fn all(&self) -> BoxStream<'_, Result<Question, StoreError>>;

    /// Eligible questions whose question or answer text contains `needle`.
    fn search<'a>(&'a self, needle: &str) -> BoxStream<'a, Result<Question, StoreError>>;
}

const RANDOM_QUESTION: &str = "\
SELECT q.id, c.title AS category, c.comment, c.show_year AS year,
       q.value, q.question, q.answer, q.non_text
FROM question q JOIN category c ON c.id = q.category_id
WHERE q.non_text = 0
ORDER BY RANDOM() LIMIT 1";

const QUESTION_BY_ID: &str = "\
SELECT q.id, c.title AS category, c.comment, c.show_year AS year,
       q.value, q.question, q.answer, q.non_text
FROM question q JOIN category c ON c.id = q.category_id
WHERE q.id = ?";

const ALL_QUESTIONS: &str = "\
SELECT q.id, c.title AS category, c.comment, c.show_year AS year,
       q.value, q.question, q.answer, q.non_text
FROM question q JOIN category c ON c.id = q.category_id
WHERE q.non_text = 0
ORDER BY q.id";

const SEARCH_LIKE: &str = "\
SELECT q.id, c.title AS category, c.comment, c.show_year AS year,
       q.value, q.question, q.answer, q.non_text
FROM question q JOIN category c ON c.id = q.category_id
WHERE q.non_text = 0
  AND (q.question LIKE '%' || ?1 || '%' OR q.answer LIKE '%' || ?1 || '%')
ORDER BY q.id";

const SEARCH_EXACT_CASE: &str = "\
SELECT q.id, c.title AS category, c.comment, c.show_year AS year,
       q.value, q.question, q.answer, q.non_text
FROM question q JOIN category c ON c.id = q.category_id
WHERE q.non_text = 0
  AND (INSTR(q.question, ?1) > 0 OR INSTR(q.answer, ?1) > 0)
ORDER BY q.id";

pub(crate) fn question_from_row(row: &SqliteRow) -> Result<Question, StoreError> {
    Ok(Question {
        id: row.try_get("id")?,
        category: row.try_get("category")?,
        comment: row.try_get("comment")?,
        year: row.try_get("year")?,
        value: row.try_get("value")?,
        question: row.try_get("question")?,
        answer: row.try_get("answer")?,
        non_text: row.try_get("non_text")?,
    })
}

#[derive(Clone)]
pub struct QuestionStore {
    pool: SqlitePool,
    case_sensitive_search: bool,
}

impl QuestionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            case_sensitive_search: false,
        }
    }

    pub fn with_case_sensitive_search(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive_search = case_sensitive;
        self
    }
}

#[async_trait]
impl QuestionSource for QuestionStore {
    async fn random(&self) -> Result<Question, StoreError> {
        let row = sqlx::query(RANDOM_QUESTION)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => question_from_row(&row),
            None => Err(StoreError::EmptyQuestionStore),
        }
    }

    async fn by_id(&self, id: i64) -> Result<Question, StoreError> {
        let row = sqlx::query(QUESTION_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => question_from_row(&row),
            None => Err(StoreError::QuestionNotFound(id)),
        }
    }

    fn all(&self) -> BoxStream<'_, Result<Question, StoreError>> {
        sqlx::query(ALL_QUESTIONS)
            .fetch(&self.pool)
            .map(|row| row.map_err(StoreError::from).and_then(|r| question_from_row(&r)))
            .boxed()
    }

    fn search<'a>(&'a self, needle: &str) -> BoxStream<'a, Result<Question, StoreError>> {
        let query = if self.case_sensitive_search {
            SEARCH_EXACT_CASE
        } else {
            SEARCH_LIKE
        };
        sqlx::query(query)
            .bind(needle.to_owned())
            .fetch(&self.pool)
            .map(|row| row.map_err(StoreError::from).and_then(|r| question_from_row(&r)))
            .boxed()
    }
}
