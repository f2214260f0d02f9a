//! In-process adapter. Same uniqueness rules as the SQL schema.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ProjectRoleRepository, SessionRepository, UserRepository};
use crate::auth::AuthError;
use crate::models::auth::{ProjectRole, Session, User, UserWithPassword};
use crate::ids::new_row_id;

#[derive(Default)]
struct Tables {
    /// Keyed by token.
    sessions: HashMap<String, Session>,
    /// Keyed by `(project_id, user_id)`.
    project_roles: HashMap<(String, String), ProjectRole>,
    /// Keyed by user id.
    users: HashMap<String, UserWithPassword>,
}

/// Cloneable handle to shared in-memory tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included.
    pub async fn session_count(&self) -> usize {
        self.tables.read().await.sessions.len()
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn insert_session(&self, session: &Session) -> Result<(), AuthError> {
        let mut tables = self.tables.write().await;
        if tables.sessions.contains_key(&session.token) {
            return Err(AuthError::Internal("duplicate session token".into()));
        }
        tables
            .sessions
            .insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn find_valid_session(&self, token: &str) -> Result<Option<Session>, AuthError> {
        let now = Utc::now();
        let tables = self.tables.read().await;
        Ok(tables
            .sessions
            .get(token)
            .filter(|s| s.is_valid_at(now))
            .cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<(), AuthError> {
        self.tables.write().await.sessions.remove(token);
        Ok(())
    }
}

#[async_trait]
impl ProjectRoleRepository for MemoryStore {
    async fn find_project_role(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<Option<String>, AuthError> {
        let tables = self.tables.read().await;
        Ok(tables
            .project_roles
            .get(&(project_id.to_string(), user_id.to_string()))
            .map(|r| r.role.clone()))
    }

    async fn upsert_project_role(
        &self,
        project_id: &str,
        user_id: &str,
        role: &str,
    ) -> Result<(), AuthError> {
        let mut tables = self.tables.write().await;
        let key = (project_id.to_string(), user_id.to_string());
        match tables.project_roles.get_mut(&key) {
            Some(existing) => existing.role = role.to_string(),
            None => {
                tables.project_roles.insert(
                    key,
                    ProjectRole {
                        id: new_row_id(),
                        project_id: project_id.to_string(),
                        user_id: user_id.to_string(),
                        role: role.to_string(),
                    },
                );
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserWithPassword>, AuthError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.user.email == email)
            .cloned())
    }

    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, AuthError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(user_id).map(|u| u.user.clone()))
    }

    async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.user.email == email) {
            return Err(AuthError::ValidationError("Email already registered".into()));
        }
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.map(str::to_string),
        };
        tables.users.insert(
            user.id.clone(),
            UserWithPassword {
                user: user.clone(),
                password_hash: Some(password_hash.to_string()),
            },
        );
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn session(token: &str, ttl: Duration) -> Session {
        let now = Utc::now();
        Session {
            id: new_row_id(),
            user_id: "user-1".into(),
            token: token.into(),
            created_at: now,
            expires_at: now + ttl,
        }
    }

    #[tokio::test]
    async fn duplicate_token_is_rejected() {
        let store = MemoryStore::new();
        store.insert_session(&session("t", Duration::hours(1))).await.unwrap();
        let err = store
            .insert_session(&session("t", Duration::hours(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn expired_session_is_not_found_but_still_stored() {
        let store = MemoryStore::new();
        store
            .insert_session(&session("old", Duration::seconds(-1)))
            .await
            .unwrap();
        assert!(store.find_valid_session("old").await.unwrap().is_none());
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn upsert_keeps_one_row_per_pair() {
        let store = MemoryStore::new();
        store.upsert_project_role("p", "u", "VIEWER").await.unwrap();
        store.upsert_project_role("p", "u", "ADMIN").await.unwrap();
        assert_eq!(
            store.find_project_role("p", "u").await.unwrap().as_deref(),
            Some("ADMIN")
        );
        assert_eq!(store.tables.read().await.project_roles.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        store.create_user("a@example.com", None, "h").await.unwrap();
        let err = store
            .create_user("a@example.com", Some("A"), "h")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ValidationError(_)));
    }
}
