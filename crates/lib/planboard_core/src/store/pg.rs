//! PostgreSQL adapter over [`crate::auth::queries`].

use async_trait::async_trait;
use sqlx::PgPool;

use super::{ProjectRoleRepository, SessionRepository, UserRepository};
use crate::auth::{AuthError, queries};
use crate::models::auth::{Session, User, UserWithPassword};

/// Store backed by a shared `PgPool`.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SessionRepository for PgStore {
    async fn insert_session(&self, session: &Session) -> Result<(), AuthError> {
        queries::insert_session(&self.pool, session).await
    }

    async fn find_valid_session(&self, token: &str) -> Result<Option<Session>, AuthError> {
        queries::find_valid_session(&self.pool, token).await
    }

    async fn delete_session(&self, token: &str) -> Result<(), AuthError> {
        queries::delete_session(&self.pool, token).await
    }
}

#[async_trait]
impl ProjectRoleRepository for PgStore {
    async fn find_project_role(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<Option<String>, AuthError> {
        queries::get_project_role(&self.pool, project_id, user_id).await
    }

    async fn upsert_project_role(
        &self,
        project_id: &str,
        user_id: &str,
        role: &str,
    ) -> Result<(), AuthError> {
        queries::set_project_role(&self.pool, project_id, user_id, role).await
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserWithPassword>, AuthError> {
        queries::find_user_by_email(&self.pool, email).await
    }

    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, AuthError> {
        queries::get_user_by_id(&self.pool, user_id).await
    }

    async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        queries::create_user(&self.pool, email, name, password_hash).await
    }
}
