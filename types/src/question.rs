use serde::{Deserialize, Serialize};

/// One trivia item, flattened with its category row. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub category: String,
    pub comment: Option<String>,
    pub year: Option<i64>,
    pub value: Option<i64>,
    pub question: String,
    pub answer: String,
    pub non_text: bool,
}

impl Question {
    /// Point value credited to a correct answer. Unvalued questions count zero.
    pub fn points(&self) -> i64 {
        self.value.unwrap_or(0)
    }
}
