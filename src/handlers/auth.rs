// src/handlers/auth.rs

use axum::{
    Form, Json,
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{LoginForm, RegistrationForm, User},
    utils::{
        cookie::{clear_session_cookie, session_cookie},
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Handles login from the navbar form.
///
/// On valid credentials, signs a session token and sets the session
/// cookie. Bad credentials set nothing; either way the browser is
/// redirected to the index with no error feedback.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Form(payload): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user = fetch_user_by_name(&pool, &payload.username).await?;

    let mut response = Redirect::to("/").into_response();

    if let Some(user) = user {
        if verify_password(&payload.psw, &user.password)? {
            set_session(&mut response, &user, &config)?;
            tracing::info!("User {} logged in", user.username);
        } else {
            tracing::debug!("Rejected login for {}", payload.username);
        }
    }

    Ok(response)
}

/// Clears the session cookie and redirects home.
pub async fn logout() -> Result<Response, AppError> {
    let mut response = Redirect::to("/").into_response();
    response
        .headers_mut()
        .append(header::SET_COOKIE, header_value(&clear_session_cookie())?);
    Ok(response)
}

/// Renders the registration form description.
pub async fn show_registration() -> impl IntoResponse {
    registration_form()
}

/// Creates a new user account from the registration form.
///
/// With both username and password present (and within bounds), creates
/// the user with the optional profile fields, logs them in immediately
/// and redirects home. An incomplete or invalid form re-renders the
/// registration page with no explicit error. A taken username is the one
/// loud failure (409).
pub async fn register(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Form(payload): Form<RegistrationForm>,
) -> Result<Response, AppError> {
    if payload.validate().is_err() {
        return Ok(registration_form().into_response());
    }

    let hashed_password = hash_password(&payload.psw)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password, first_name, last_name, email)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, username, password, first_name, last_name, email, created_at
        "#,
    )
    .bind(&payload.username)
    .bind(&hashed_password)
    .bind(&payload.firstname)
    .bind(&payload.lastname)
    .bind(&payload.email)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        // Postgres error code for unique violation is 23505
        if e.to_string().contains("unique constraint") || e.to_string().contains("23505") {
            AppError::Conflict(format!("Username '{}' already exists", payload.username))
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    tracing::info!("Registered user {}", user.username);

    let mut response = Redirect::to("/").into_response();
    set_session(&mut response, &user, &config)?;
    Ok(response)
}

/// The registration page body: which fields the form expects.
fn registration_form() -> Json<serde_json::Value> {
    Json(json!({
        "form": {
            "required": ["username", "psw"],
            "optional": ["firstname", "lastname", "email"],
        }
    }))
}

/// Signs a token for the user and attaches the session cookie.
fn set_session(response: &mut Response, user: &User, config: &Config) -> Result<(), AppError> {
    let token = sign_jwt(
        user.id,
        &user.username,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;
    let cookie = session_cookie(&token, config.jwt_expiration);
    response
        .headers_mut()
        .append(header::SET_COOKIE, header_value(&cookie)?);
    Ok(())
}

async fn fetch_user_by_name(pool: &PgPool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password, first_name, last_name, email, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(user)
}

fn header_value(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value).map_err(|e| AppError::InternalServerError(e.to_string()))
}
