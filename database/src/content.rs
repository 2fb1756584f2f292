use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::StoreError;

/// One question inside a category seed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSeed {
    pub value: Option<i64>,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub non_text: bool,
}

/// One scraped category with its questions, as produced by the content
/// scraping pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySeed {
    pub show_number: Option<i64>,
    pub show_year: Option<i64>,
    pub title: String,
    pub comment: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionSeed>,
}

/// Loads scraped trivia content into the store. Each load is one
/// transaction: either the whole batch lands or none of it does.
pub struct ContentLoader {
    pool: SqlitePool,
}

impl ContentLoader {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn load(&self, categories: &[CategorySeed]) -> Result<u64, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        let mut loaded = 0u64;
        for category in categories {
            let result = sqlx::query(
                "INSERT INTO category (show_number, show_year, title, comment) VALUES (?, ?, ?, ?)",
            )
            .bind(category.show_number)
            .bind(category.show_year)
            .bind(&category.title)
            .bind(&category.comment)
            .execute(&mut *tx)
            .await?;
            let category_id = result.last_insert_rowid();

            for question in &category.questions {
                sqlx::query(
                    "INSERT INTO question (category_id, value, question, answer, non_text) VALUES (?, ?, ?, ?, ?)",
                )
                .bind(category_id)
                .bind(question.value)
                .bind(&question.question)
                .bind(&question.answer)
                .bind(question.non_text)
                .execute(&mut *tx)
                .await?;
                loaded += 1;
            }
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Transaction(e.to_string()))?;
        tracing::info!(categories = categories.len(), questions = loaded, "content loaded");
        Ok(loaded)
    }

    pub async fn load_json(&self, json: &str) -> Result<u64, StoreError> {
        let categories: Vec<CategorySeed> = serde_json::from_str(json)?;
        self.load(&categories).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::{QuestionSource, QuestionStore};
    use crate::tests::memory_pool;

    const SEED: &str = r#"[
        {
            "show_number": 7094,
            "show_year": 2015,
            "title": "U.S. PRESIDENTS",
            "comment": "all answers are presidents",
            "questions": [
                { "value": 200, "question": "First president", "answer": "Washington" },
                { "value": 400, "question": "Wrote the Declaration", "answer": "Jefferson" },
                { "value": null, "question": "Shown in this portrait", "answer": "Lincoln", "non_text": true }
            ]
        }
    ]"#;

    #[tokio::test]
    async fn test_load_json_seeds_categories_and_questions() {
        let pool = memory_pool().await;
        let loaded = ContentLoader::new(pool.clone())
            .load_json(SEED)
            .await
            .expect("load");
        assert_eq!(loaded, 3);

        let question = QuestionStore::new(pool).by_id(1).await.expect("question");
        assert_eq!(question.category, "U.S. PRESIDENTS");
        assert_eq!(question.year, Some(2015));
        assert_eq!(question.answer, "Washington");
    }

    #[tokio::test]
    async fn test_load_json_rejects_malformed_content() {
        let pool = memory_pool().await;
        let result = ContentLoader::new(pool).load_json("{ not json").await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }
}
