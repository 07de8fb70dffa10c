// src/handlers/exam.rs

use std::collections::{BTreeMap, HashMap, HashSet};

use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use sqlx::PgPool;

use crate::{
    error::AppError,
    handlers::course::fetch_course,
    models::{question::Choice, submission::ExamResultResponse},
    scoring::{QuestionKey, total_grade},
    utils::jwt::Claims,
};

/// Helper struct for fetching the answer key of a course.
/// One row per (question, choice) pair; choice columns are NULL for a
/// question that has no choices at all.
#[derive(sqlx::FromRow)]
struct AnswerKeyRow {
    question_id: i64,
    grade: i64,
    choice_id: Option<i64>,
    is_correct: Option<bool>,
}

/// Collects selected choice ids from the exam form payload.
///
/// The exam page posts one checkbox per selected choice, named
/// `choice_<id>` with the id as its value. Anything else in the payload
/// (other fields, unparsable values) is ignored.
fn extract_choice_ids(form: &HashMap<String, String>) -> Vec<i64> {
    form.iter()
        .filter(|(key, _)| key.starts_with("choice_"))
        .filter_map(|(_, value)| value.parse::<i64>().ok())
        .collect()
}

/// Records an exam attempt for the current user.
///
/// Requires an existing enrollment in the course - submitting never
/// creates one. The submission and its choice links are written in one
/// transaction; submitted ids that match no choice row are silently
/// dropped. Redirects to the result page of the new submission.
pub async fn submit(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
    Form(payload): Form<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    fetch_course(&pool, course_id).await?;

    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;

    let enrollment_id = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id FROM enrollments
        WHERE user_id = $1 AND course_id = $2
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Not enrolled in this course".to_string()))?;

    let submitted_ids = extract_choice_ids(&payload);

    let mut tx = pool.begin().await?;

    let submission_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO submissions (enrollment_id)
        VALUES ($1)
        RETURNING id
        "#,
    )
    .bind(enrollment_id)
    .fetch_one(&mut *tx)
    .await?;

    // Links only the ids that resolve to real choice rows; unknown ids
    // submitted in the payload are skipped without error.
    sqlx::query(
        r#"
        INSERT INTO submission_choices (submission_id, choice_id)
        SELECT $1, id FROM choices WHERE id = ANY($2)
        "#,
    )
    .bind(submission_id)
    .bind(&submitted_ids)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        "User {} submitted exam attempt {} for course {}",
        user_id,
        submission_id,
        course_id
    );

    Ok(Redirect::to(&format!(
        "/course/{}/submission/{}/result",
        course_id, submission_id
    )))
}

/// Shows the graded result of one exam attempt.
///
/// Exact-set-match grading: each question awards its full grade iff the
/// selected choices belonging to it equal its correct choices precisely,
/// summed over every question of the course.
pub async fn show_exam_result(
    State(pool): State<PgPool>,
    Path((course_id, submission_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let course = fetch_course(&pool, course_id).await?;

    sqlx::query_scalar::<_, i64>("SELECT id FROM submissions WHERE id = $1")
        .bind(submission_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Submission not found".to_string()))?;

    let selected_choices = sqlx::query_as::<_, Choice>(
        r#"
        SELECT c.id, c.question_id, c.content, c.is_correct
        FROM choices c
        JOIN submission_choices sc ON sc.choice_id = c.id
        WHERE sc.submission_id = $1
        ORDER BY c.id
        "#,
    )
    .bind(submission_id)
    .fetch_all(&pool)
    .await?;

    // LEFT JOIN keeps questions without choices in the answer key; an
    // empty correct set matches an empty selection.
    let key_rows = sqlx::query_as::<_, AnswerKeyRow>(
        r#"
        SELECT q.id AS question_id, q.grade, c.id AS choice_id, c.is_correct
        FROM questions q
        LEFT JOIN choices c ON c.question_id = q.id
        WHERE q.course_id = $1
        ORDER BY q.id
        "#,
    )
    .bind(course_id)
    .fetch_all(&pool)
    .await?;

    let questions = build_answer_key(key_rows);
    let selected_ids: HashSet<i64> = selected_choices.iter().map(|c| c.id).collect();
    let grade = total_grade(&questions, &selected_ids);

    Ok(Json(ExamResultResponse {
        course,
        grade,
        choices: selected_choices,
    }))
}

/// Folds answer-key rows into per-question keys.
fn build_answer_key(rows: Vec<AnswerKeyRow>) -> Vec<QuestionKey> {
    let mut by_question: BTreeMap<i64, QuestionKey> = BTreeMap::new();

    for row in rows {
        let question = by_question.entry(row.question_id).or_insert_with(|| QuestionKey {
            question_id: row.question_id,
            grade: row.grade,
            choice_ids: HashSet::new(),
            correct_choice_ids: HashSet::new(),
        });

        if let Some(choice_id) = row.choice_id {
            question.choice_ids.insert(choice_id);
            if row.is_correct.unwrap_or(false) {
                question.correct_choice_ids.insert(choice_id);
            }
        }
    }

    by_question.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_choice_ids_reads_prefixed_fields_only() {
        let mut form = HashMap::new();
        form.insert("choice_3".to_string(), "3".to_string());
        form.insert("choice_7".to_string(), "7".to_string());
        form.insert("csrf_token".to_string(), "abc".to_string());
        form.insert("choice_bad".to_string(), "not-a-number".to_string());

        let mut ids = extract_choice_ids(&form);
        ids.sort();
        assert_eq!(ids, vec![3, 7]);
    }

    #[test]
    fn build_answer_key_groups_rows_per_question() {
        let rows = vec![
            AnswerKeyRow { question_id: 1, grade: 10, choice_id: Some(1), is_correct: Some(true) },
            AnswerKeyRow { question_id: 1, grade: 10, choice_id: Some(2), is_correct: Some(false) },
            AnswerKeyRow { question_id: 2, grade: 5, choice_id: None, is_correct: None },
        ];

        let key = build_answer_key(rows);
        assert_eq!(key.len(), 2);
        assert_eq!(key[0].choice_ids.len(), 2);
        assert_eq!(key[0].correct_choice_ids.len(), 1);
        assert!(key[1].choice_ids.is_empty());
    }
}
