//! Persistence ports consumed by the auth core.
//!
//! The store is the single source of truth for sessions and project roles;
//! nothing above it caches either. Two adapters ship here: [`PgStore`] for
//! PostgreSQL and [`MemoryStore`] for tests and local demos.

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use async_trait::async_trait;

use crate::auth::AuthError;
use crate::models::auth::{Session, User, UserWithPassword};

/// Session rows.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert a new session. Token collisions must be rejected.
    async fn insert_session(&self, session: &Session) -> Result<(), AuthError>;

    /// Single read of the session with this token whose expiry is still in
    /// the future.
    async fn find_valid_session(&self, token: &str) -> Result<Option<Session>, AuthError>;

    /// Delete the session with this token, if any.
    async fn delete_session(&self, token: &str) -> Result<(), AuthError>;
}

/// Project role rows, at most one per `(project_id, user_id)`.
#[async_trait]
pub trait ProjectRoleRepository: Send + Sync {
    async fn find_project_role(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<Option<String>, AuthError>;

    /// Insert the role, replacing any existing row for the pair.
    async fn upsert_project_role(
        &self,
        project_id: &str,
        user_id: &str,
        role: &str,
    ) -> Result<(), AuthError>;
}

/// User accounts for login and registration.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserWithPassword>, AuthError>;

    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, AuthError>;

    /// Create a user. A duplicate email is `AuthError::ValidationError`.
    async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<User, AuthError>;
}
