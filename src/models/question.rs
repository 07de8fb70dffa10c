// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub course_id: i64,

    /// The text content of the question.
    pub content: String,

    /// Point value awarded when the question is answered correctly.
    pub grade: i64,
}

/// Represents the 'choices' table in the database.
/// Several choices of one question may be marked correct (multi-select).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub content: String,
    pub is_correct: bool,
}

/// DTO for sending a question to the client (excludes correctness flags).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub content: String,
    pub grade: i64,
    pub choices: Vec<PublicChoice>,
}

/// DTO for sending a choice to the client (excludes `is_correct`).
#[derive(Debug, Serialize)]
pub struct PublicChoice {
    pub id: i64,
    pub content: String,
}

impl From<Choice> for PublicChoice {
    fn from(choice: Choice) -> Self {
        PublicChoice {
            id: choice.id,
            content: choice.content,
        }
    }
}
