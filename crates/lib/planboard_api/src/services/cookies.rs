//! Cookie service: build and clear the httpOnly `session` cookie.
//!
//! The cookie carries the opaque session token and is signed with a key
//! derived from `SESSION_SECRET` (see [`cookie_key`]).

use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use sha2::{Digest, Sha512};
use time::Duration;

use crate::config::Environment;
use planboard_core::auth::session::SESSION_TTL_DAYS;

/// Cookie name for the session token.
pub const SESSION_COOKIE: &str = "session";

/// Derive the 64-byte cookie signing key from the configured secret.
pub fn cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Attribute set for the session cookie, fixed per environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookiePolicy {
    /// `Secure` + `Strict` in production, `Lax` over plain HTTP otherwise.
    pub fn for_environment(env: Environment) -> Self {
        if env.is_production() {
            Self {
                secure: true,
                same_site: SameSite::Strict,
            }
        } else {
            Self {
                secure: false,
                same_site: SameSite::Lax,
            }
        }
    }

    /// Build the session cookie (7 days).
    pub fn session_cookie(&self, token: &str) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE.to_string(), token.to_string()))
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .path("/".to_string())
            .max_age(Duration::days(SESSION_TTL_DAYS))
            .build()
    }

    /// Build an expired cookie to clear the session.
    pub fn clear_session_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE.to_string(), String::new()))
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .path("/".to_string())
            .max_age(Duration::ZERO)
            .build()
    }
}
