//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::SignedCookieJar;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::{CurrentUser, jar_session_token};
use crate::models::{AuthResponse, LoginRequest, LogoutResponse, MeResponse, RegisterRequest};
use crate::services::auth;

/// `POST /auth/register`: create an account and start a session.
pub async fn register_handler(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(SignedCookieJar, Json<AuthResponse>)> {
    let auth = auth::register(&state, &body.email, &body.password, body.name.as_deref()).await?;
    let jar = jar.add(state.cookie_policy.session_cookie(&auth.token));
    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            user: auth.user,
        }),
    ))
}

/// `POST /auth/login`: authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Json(body): Json<LoginRequest>,
) -> AppResult<(SignedCookieJar, Json<AuthResponse>)> {
    let auth = auth::login(&state, &body.email, &body.password).await?;
    let jar = jar.add(state.cookie_policy.session_cookie(&auth.token));
    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            user: auth.user,
        }),
    ))
}

/// `POST /auth/logout`: destroy the current session and clear the cookie.
/// Succeeds without a session.
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> AppResult<(SignedCookieJar, Json<LogoutResponse>)> {
    let token = jar_session_token(&jar);
    auth::logout(&state, token.as_deref()).await?;
    let jar = jar.add(state.cookie_policy.clear_session_cookie());
    Ok((jar, Json(LogoutResponse { success: true })))
}

/// `GET /auth/me`: the current user, or `null` when anonymous.
pub async fn me_handler(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
) -> AppResult<Json<MeResponse>> {
    let user = match user {
        Some(current) => auth::current_user(&state, current.user_id()).await?,
        None => None,
    };
    Ok(Json(MeResponse {
        authenticated: user.is_some(),
        user,
    }))
}
