//! Database-backed session lifecycle.
//!
//! Sessions are opaque random tokens. Every validation re-reads the store;
//! there is no in-process cache to invalidate.
//!
//! Logout race: `destroy_session` is not ordered against a concurrent
//! `validate_session` on the same token. A validation whose read started
//! before the delete committed may still succeed once. That window is bounded
//! by a single query and is accepted; no locking is used to close it.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use rand::{Rng, rng};
use tracing::{debug, warn};

use super::AuthError;
use crate::models::auth::Session;
use crate::store::SessionRepository;
use crate::ids::new_row_id;

/// Session lifetime: 7 days.
pub const SESSION_TTL_DAYS: i64 = 7;

/// Random bytes per token (256 bits).
const TOKEN_BYTES: usize = 32;

/// Session lifetime as a `chrono::Duration`.
pub fn session_ttl() -> Duration {
    Duration::days(SESSION_TTL_DAYS)
}

/// Generate a session token: 32 bytes from the thread-local CSPRNG,
/// URL-safe base64 without padding (43 chars).
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Creates, validates and destroys sessions against a [`SessionRepository`].
#[derive(Clone)]
pub struct SessionStore {
    repo: Arc<dyn SessionRepository>,
}

impl SessionStore {
    pub fn new(repo: Arc<dyn SessionRepository>) -> Self {
        Self { repo }
    }

    /// Start a session for `user_id` and return its token.
    ///
    /// No uniqueness pre-check is made; the store's unique constraint on
    /// `token` is the guard.
    pub async fn create_session(&self, user_id: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let session = Session {
            id: new_row_id(),
            user_id: user_id.to_string(),
            token: generate_token(),
            created_at: now,
            expires_at: now + session_ttl(),
        };
        self.repo.insert_session(&session).await?;
        debug!(user_id, session_id = %session.id, "session created");
        Ok(session.token)
    }

    /// Resolve a token to its user id.
    ///
    /// Missing, expired and unreadable sessions all yield
    /// [`AuthError::InvalidOrExpiredSession`].
    pub async fn validate_session(&self, token: &str) -> Result<String, AuthError> {
        match self.repo.find_valid_session(token).await {
            Ok(Some(session)) => Ok(session.user_id),
            Ok(None) => Err(AuthError::InvalidOrExpiredSession),
            Err(e) => {
                warn!(error = %e, "session lookup failed");
                Err(AuthError::InvalidOrExpiredSession)
            }
        }
    }

    /// Delete the session for `token`. Unknown tokens are not an error.
    pub async fn destroy_session(&self, token: &str) -> Result<(), AuthError> {
        self.repo.delete_session(token).await
    }
}
