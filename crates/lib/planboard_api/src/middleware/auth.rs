//! Authentication middleware: session cookie extraction and validation.
//!
//! Two modes share one credential path:
//!
//! - [`attach_identity`] (soft): never rejects. A valid session attaches a
//!   [`CurrentUser`]; a missing or invalid one leaves the request anonymous,
//!   and the two cases are indistinguishable downstream.
//! - [`require_auth`] (hard): a missing or invalid session ends the request
//!   with `401 Unauthorized` (plain text) before the handler runs.
//!
//! Only this module reads the transport credential. Everything downstream
//! sees the resolved [`Identity`] through [`current_identity`],
//! [`is_authenticated`], or the [`CurrentUser`] extractor.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{Extensions, HeaderMap, StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Key, SignedCookieJar};
use tracing::debug;

use crate::AppState;
use crate::services::cookies::SESSION_COOKIE;
use planboard_core::models::auth::Identity;

/// Typed request-extension key holding the resolved caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub Identity);

impl CurrentUser {
    pub fn user_id(&self) -> &str {
        &self.0.user_id
    }
}

/// "Get identity": the caller attached to this request, if any.
pub fn current_identity(extensions: &Extensions) -> Option<&Identity> {
    extensions.get::<CurrentUser>().map(|user| &user.0)
}

/// "Is authenticated": whether an identity is attached.
pub fn is_authenticated(extensions: &Extensions) -> bool {
    current_identity(extensions).is_some()
}

/// Read the session token from a correctly signed `session` cookie.
fn session_token(headers: &HeaderMap, key: &Key) -> Option<String> {
    jar_session_token(&SignedCookieJar::<Key>::from_headers(headers, key.clone()))
}

/// Session token carried by an already extracted jar. Handlers that must
/// act on the raw token (logout) go through here instead of the cookie.
pub(crate) fn jar_session_token(jar: &SignedCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Resolve the request's credential to an identity, discarding the reason
/// on failure.
async fn resolve_identity(state: &AppState, headers: &HeaderMap) -> Option<Identity> {
    let token = session_token(headers, &state.cookie_key)?;
    match state.sessions.validate_session(&token).await {
        Ok(user_id) => Some(Identity::new(user_id)),
        Err(_) => None,
    }
}

/// Axum middleware (soft mode): attaches `CurrentUser` when the session
/// cookie validates, otherwise passes the request through untouched.
pub async fn attach_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match resolve_identity(&state, request.headers()).await {
        Some(identity) => {
            request.extensions_mut().insert(CurrentUser(identity));
        }
        None => debug!("no usable session, continuing anonymously"),
    }
    next.run(request).await
}

/// Axum middleware (hard mode): rejects with 401 unless the session cookie
/// validates, then injects `CurrentUser` for the handler.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(identity) = resolve_identity(&state, request.headers()).await else {
        debug!(path = %request.uri().path(), "rejecting unauthenticated request");
        return AuthRejection.into_response();
    };
    request.extensions_mut().insert(CurrentUser(identity));
    next.run(request).await
}

/// Hard-mode rejection: `401` with a plain-text body.
#[derive(Debug, Clone, Copy)]
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthRejection)
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_reflect_extension() {
        let mut ext = Extensions::new();
        assert!(current_identity(&ext).is_none());
        assert!(!is_authenticated(&ext));

        ext.insert(CurrentUser(Identity::new("user-1")));
        assert_eq!(current_identity(&ext).map(|i| i.user_id.as_str()), Some("user-1"));
        assert!(is_authenticated(&ext));
    }

    #[test]
    fn unrelated_string_extensions_are_ignored() {
        let mut ext = Extensions::new();
        ext.insert(String::from("user-1"));
        assert!(!is_authenticated(&ext));
    }

    #[test]
    fn unsigned_cookie_is_not_a_credential() {
        let key = Key::generate();
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            "session=plain-token".parse().unwrap(),
        );
        assert!(session_token(&headers, &key).is_none());
    }

    #[test]
    fn empty_signed_cookie_is_not_a_credential() {
        let key = Key::generate();
        let jar: SignedCookieJar = SignedCookieJar::new(key).add((SESSION_COOKIE, ""));
        assert!(jar.get(SESSION_COOKIE).is_some());
        assert!(jar_session_token(&jar).is_none());
    }

    #[test]
    fn signed_cookie_round_trips() {
        let key = Key::generate();
        let jar: SignedCookieJar = SignedCookieJar::new(key.clone()).add((SESSION_COOKIE, "tok-123"));
        let signed = jar.get(SESSION_COOKIE).is_some();
        assert!(signed);

        let response = (jar, ()).into_response();
        let set_cookie = response
            .headers()
            .get(axum::http::header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        let pair = set_cookie.split(';').next().unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::COOKIE, pair.parse().unwrap());
        assert_eq!(session_token(&headers, &key).as_deref(), Some("tok-123"));
    }
}
