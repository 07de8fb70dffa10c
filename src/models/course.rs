// src/models/course.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::question::PublicQuestion;

/// Represents the 'courses' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,

    pub name: String,

    pub description: String,

    /// Publication date; the course list is ordered by this, newest first.
    pub pub_date: chrono::DateTime<chrono::Utc>,
}

/// Represents the 'enrollments' table in the database.
/// One row per (user, course) pair, enforced by a unique constraint.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,

    /// Enrollment mode, defaults to 'audit' on creation.
    pub mode: String,

    pub date_joined: Option<chrono::DateTime<chrono::Utc>>,
}

/// Course detail page: the course plus its exam questions.
/// Questions are exposed through `PublicQuestion` so correctness flags
/// never reach the client.
#[derive(Debug, Serialize)]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub course: Course,
    pub questions: Vec<PublicQuestion>,
}
