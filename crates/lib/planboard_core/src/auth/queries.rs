//! Auth-related database queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::AuthError;
use crate::models::auth::{Session, User, UserWithPassword};
use crate::ids::new_row_id;

/// Postgres unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

/// Fetch a user (with password hash) by email.
pub async fn find_user_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<UserWithPassword>, AuthError> {
    let row = sqlx::query_as::<_, (String, String, Option<String>, Option<String>)>(
        "SELECT id::text, email, name, password_hash FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(id, email, name, password_hash)| UserWithPassword {
        user: User { id, email, name },
        password_hash,
    }))
}

/// Fetch user email and name by user ID.
pub async fn get_user_by_id(pool: &PgPool, user_id: &str) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, (String, Option<String>)>(
        "SELECT email, name FROM users WHERE id = $1::uuid",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(email, name)| User {
        id: user_id.to_string(),
        email,
        name,
    }))
}

/// Create a new user. A duplicate email is a validation error.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    name: Option<&str>,
    password_hash: &str,
) -> Result<User, AuthError> {
    let user_id = sqlx::query_scalar::<_, String>(
        "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3) RETURNING id::text",
    )
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AuthError::ValidationError("Email already registered".into())
        } else {
            AuthError::Storage(e)
        }
    })?;
    Ok(User {
        id: user_id,
        email: email.to_string(),
        name: name.map(str::to_string),
    })
}

/// Store a session row. The `token` column is UNIQUE; a collision surfaces
/// as a storage error.
pub async fn insert_session(pool: &PgPool, session: &Session) -> Result<(), AuthError> {
    sqlx::query(
        "INSERT INTO sessions (id, user_id, token, created_at, expires_at) \
         VALUES ($1::uuid, $2::uuid, $3, $4, $5)",
    )
    .bind(&session.id)
    .bind(&session.user_id)
    .bind(&session.token)
    .bind(session.created_at)
    .bind(session.expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Find a non-expired session by token in a single read.
pub async fn find_valid_session(pool: &PgPool, token: &str) -> Result<Option<Session>, AuthError> {
    let row = sqlx::query_as::<_, (String, String, DateTime<Utc>, DateTime<Utc>)>(
        "SELECT id::text, user_id::text, created_at, expires_at \
         FROM sessions \
         WHERE token = $1 \
           AND expires_at > now()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(id, user_id, created_at, expires_at)| Session {
        id,
        user_id,
        token: token.to_string(),
        created_at,
        expires_at,
    }))
}

/// Delete a session by token. Zero affected rows is not an error.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), AuthError> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Fetch the raw role text a user holds on a project.
pub async fn get_project_role(
    pool: &PgPool,
    project_id: &str,
    user_id: &str,
) -> Result<Option<String>, AuthError> {
    let role = sqlx::query_scalar::<_, String>(
        "SELECT role FROM project_roles WHERE project_id = $1::uuid AND user_id = $2::uuid",
    )
    .bind(project_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(role)
}

/// Grant or replace a user's role on a project.
pub async fn set_project_role(
    pool: &PgPool,
    project_id: &str,
    user_id: &str,
    role: &str,
) -> Result<(), AuthError> {
    sqlx::query(
        "INSERT INTO project_roles (id, project_id, user_id, role) \
         VALUES ($1::uuid, $2::uuid, $3::uuid, $4) \
         ON CONFLICT (project_id, user_id) DO UPDATE SET role = EXCLUDED.role",
    )
    .bind(new_row_id())
    .bind(project_id)
    .bind(user_id)
    .bind(role)
    .execute(pool)
    .await?;
    Ok(())
}
