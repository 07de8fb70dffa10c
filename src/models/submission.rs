// src/models/submission.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::{course::Course, question::Choice};

/// Represents the 'submissions' table in the database.
/// One row per exam attempt; the selected choices live in the
/// 'submission_choices' link table and never change after creation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub enrollment_id: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Exam result page: total grade plus the choices the user selected.
#[derive(Debug, Serialize)]
pub struct ExamResultResponse {
    pub course: Course,
    pub grade: i64,
    pub choices: Vec<Choice>,
}
