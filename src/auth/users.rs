use rusqlite::{params, ErrorCode, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::auth::password::MIN_PASSWORD_LEN;
use crate::db::models::User;
use crate::error::{AppError, AppResult};
use crate::state::DbPool;
use crate::validate::{require_text, Validate};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), String> {
        require_text("username", &self.username, 40)?;
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), String> {
        require_text("email", &self.email, 254)?;
        require_text("password", &self.password, 1024)
    }
}

fn validate_email(email: &str) -> Result<(), String> {
    require_text("email", email, 254)?;
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err("email is not valid".to_string()),
    }
}

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Insert a user. Username and email are compared after trimming; email
/// is stored lowercased.
pub fn create_user(
    pool: &DbPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> AppResult<User> {
    let conn = pool.get()?;
    let username = username.trim();
    let email = email.trim().to_lowercase();

    // UNIQUE(username), UNIQUE(email) are the only duplicate check
    conn.execute(
        "INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3)",
        params![username, email, password_hash],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Username or email already registered".into())
        } else {
            AppError::Database(e)
        }
    })?;
    let id = conn.last_insert_rowid();

    let user = conn.query_row(
        &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
        params![id],
        user_from_row,
    )?;
    Ok(user)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

pub fn find_by_email(pool: &DbPool, email: &str) -> AppResult<Option<User>> {
    let conn = pool.get()?;
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS),
            params![email.trim().to_lowercase()],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

pub fn find_by_id(pool: &DbPool, id: i64) -> AppResult<Option<User>> {
    let conn = pool.get()?;
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
            params![id],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}
