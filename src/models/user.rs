// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub first_name: String,
    pub last_name: String,
    pub email: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Form payload of the navbar login form.
/// The password field arrives as `psw`, matching the form markup.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub psw: String,
}

/// Form payload of the registration page.
/// `firstname`, `lastname` and `email` are optional profile fields.
#[derive(Debug, Deserialize, Validate)]
pub struct RegistrationForm {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 150,
        message = "Username length must be between 1 and 150 characters."
    ))]
    pub username: String,
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 128,
        message = "Password length must be between 1 and 128 characters."
    ))]
    pub psw: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: String,
}
