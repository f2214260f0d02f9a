//! Authentication domain models.
//!
//! These are internal domain models, distinct from the API request and
//! response types (which carry `#[serde(rename)]` for camelCase etc.).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

/// User with password hash (for internal auth flows).
#[derive(Debug, Clone)]
pub struct UserWithPassword {
    pub user: User,
    pub password_hash: Option<String>,
}

/// Session record stored in the `sessions` table.
///
/// Never updated in place: created at login, read on every request,
/// deleted at logout.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    /// Opaque bearer secret; unique across all sessions.
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// A session is valid strictly before its expiry instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// A user's role within one project. Role text is kept as stored;
/// normalisation happens in [`crate::auth::roles`].
#[derive(Debug, Clone)]
pub struct ProjectRole {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    pub role: String,
}

/// Resolved caller identity, attached to a request once its session
/// validates. Used as the typed request-scope key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}
