// src/handlers/course.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{
        course::{Course, CourseDetailResponse},
        question::{Choice, PublicChoice, PublicQuestion, Question},
    },
    utils::jwt::Claims,
};

/// Lists all courses, newest publication first.
pub async fn list_courses(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let courses = sqlx::query_as::<_, Course>(
        r#"
        SELECT id, name, description, pub_date
        FROM courses
        ORDER BY pub_date DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(courses))
}

/// Retrieves a single course with its exam questions and choices.
///
/// Choices go out through `PublicChoice`, so the exam page never sees
/// which ones are correct.
pub async fn get_course(
    State(pool): State<PgPool>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let course = fetch_course(&pool, course_id).await?;

    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, course_id, content, grade
        FROM questions
        WHERE course_id = $1
        ORDER BY id
        "#,
    )
    .bind(course_id)
    .fetch_all(&pool)
    .await?;

    let choices = sqlx::query_as::<_, Choice>(
        r#"
        SELECT c.id, c.question_id, c.content, c.is_correct
        FROM choices c
        JOIN questions q ON c.question_id = q.id
        WHERE q.course_id = $1
        ORDER BY c.id
        "#,
    )
    .bind(course_id)
    .fetch_all(&pool)
    .await?;

    let questions = questions
        .into_iter()
        .map(|q| PublicQuestion {
            id: q.id,
            content: q.content,
            grade: q.grade,
            choices: choices
                .iter()
                .filter(|c| c.question_id == q.id)
                .cloned()
                .map(PublicChoice::from)
                .collect(),
        })
        .collect();

    Ok(Json(CourseDetailResponse { course, questions }))
}

/// Enrolls the current user in a course, idempotently.
///
/// Get-or-create rides on the (user_id, course_id) unique constraint:
/// the insert is a no-op when the enrollment already exists, so two
/// concurrent enrolls still end with exactly one row. New enrollments
/// start in 'audit' mode. Redirects to the course detail page.
pub async fn enroll(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let course = fetch_course(&pool, course_id).await?;

    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO enrollments (user_id, course_id, mode)
        VALUES ($1, $2, 'audit')
        ON CONFLICT (user_id, course_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .execute(&pool)
    .await?;

    if inserted.rows_affected() > 0 {
        tracing::info!("User {} enrolled in course {}", user_id, course.id);
    }

    Ok(Redirect::to(&format!("/{}", course_id)))
}

/// Looks up a course by id, mapping a missing row to 404.
pub(crate) async fn fetch_course(pool: &PgPool, course_id: i64) -> Result<Course, AppError> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT id, name, description, pub_date
        FROM courses
        WHERE id = $1
        "#,
    )
    .bind(course_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Course not found".to_string()))
}
