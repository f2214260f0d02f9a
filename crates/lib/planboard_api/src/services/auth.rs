//! Authentication service: register/login/logout flows delegating to
//! `planboard_core::auth`.

use tracing::info;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::AuthUser;
use planboard_core::auth::AuthError;
use planboard_core::auth::password::validate_password;

/// Outcome of a successful login or registration.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: AuthUser,
    /// Fresh session token for the cookie.
    pub token: String,
}

/// Run bcrypt off the async workers; high costs take around a second.
async fn blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("password task: {e}")))
}

/// Register a new user account and start a session for it.
pub async fn register(
    state: &AppState,
    email: &str,
    password: &str,
    name: Option<&str>,
) -> AppResult<Authenticated> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    validate_password(password)?;

    if state.users.find_user_by_email(email).await?.is_some() {
        return Err(AppError::Validation("Email already registered".into()));
    }

    let hasher = state.hasher;
    let plaintext = password.to_string();
    let pw_hash = blocking(move || hasher.hash_password(&plaintext)).await??;
    let user = state.users.create_user(email, name, &pw_hash).await?;
    let token = state.sessions.create_session(&user.id).await?;

    info!(user_id = %user.id, "user registered");
    Ok(Authenticated {
        user: user.into(),
        token,
    })
}

/// Authenticate with email + password.
///
/// Unknown email, missing hash and wrong password are all the same
/// `Invalid credentials` error.
pub async fn login(state: &AppState, email: &str, password: &str) -> AppResult<Authenticated> {
    let record = state
        .users
        .find_user_by_email(email.trim())
        .await?
        .ok_or(AuthError::CredentialError)?;

    let pw_hash = record
        .password_hash
        .clone()
        .ok_or(AuthError::CredentialError)?;

    let hasher = state.hasher;
    let plaintext = password.to_string();
    if !blocking(move || hasher.check_password(&plaintext, &pw_hash)).await? {
        return Err(AuthError::CredentialError.into());
    }

    let token = state.sessions.create_session(&record.user.id).await?;

    info!(user_id = %record.user.id, "user logged in");
    Ok(Authenticated {
        user: record.user.into(),
        token,
    })
}

/// Logout: destroy the session named by `token`, if any.
pub async fn logout(state: &AppState, token: Option<&str>) -> AppResult<()> {
    if let Some(token) = token {
        state.sessions.destroy_session(token).await?;
        info!("session destroyed");
    }
    Ok(())
}

/// Look up the user behind an identity.
pub async fn current_user(state: &AppState, user_id: &str) -> AppResult<Option<AuthUser>> {
    let user = state.users.find_user_by_id(user_id).await?;
    Ok(user.map(AuthUser::from))
}
