//! Project-scoped authorization.
//!
//! A guard, not a filter: every operation that mutates a project-scoped
//! resource must call [`AuthorizationEngine::has_project_permission`] (or
//! [`AuthorizationEngine::require_project_role`]) before acting. Nothing here
//! intercepts requests on its own.

use std::sync::Arc;

use tracing::{debug, warn};

use super::AuthError;
use super::roles::{Role, satisfies};
use crate::models::auth::Identity;
use crate::store::ProjectRoleRepository;

/// Evaluates a caller's project role against a required role.
#[derive(Clone)]
pub struct AuthorizationEngine {
    roles: Arc<dyn ProjectRoleRepository>,
}

impl AuthorizationEngine {
    pub fn new(roles: Arc<dyn ProjectRoleRepository>) -> Self {
        Self { roles }
    }

    /// Fails closed: `false` without an identity, without a role row, on
    /// storage failure, or when either role is outside the hierarchy.
    pub async fn has_project_permission(
        &self,
        identity: Option<&Identity>,
        project_id: &str,
        required_role: &str,
    ) -> bool {
        let Some(identity) = identity else {
            return false;
        };

        let user_role = match self
            .roles
            .find_project_role(project_id, &identity.user_id)
            .await
        {
            Ok(Some(role)) => role,
            Ok(None) => {
                debug!(project_id, user_id = %identity.user_id, "no project role");
                return false;
            }
            Err(e) => {
                warn!(project_id, error = %e, "project role lookup failed");
                return false;
            }
        };

        satisfies(&user_role, required_role)
    }

    /// Error-returning form of [`Self::has_project_permission`].
    ///
    /// No identity is [`AuthError::Unauthorized`]; a known identity without
    /// enough rank is [`AuthError::Forbidden`].
    pub async fn require_project_role(
        &self,
        identity: Option<&Identity>,
        project_id: &str,
        required: Role,
    ) -> Result<(), AuthError> {
        if identity.is_none() {
            return Err(AuthError::Unauthorized);
        }
        if self
            .has_project_permission(identity, project_id, required.as_str())
            .await
        {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::store::MemoryStore;

    struct BrokenRoles;

    #[async_trait]
    impl ProjectRoleRepository for BrokenRoles {
        async fn find_project_role(
            &self,
            _project_id: &str,
            _user_id: &str,
        ) -> Result<Option<String>, AuthError> {
            Err(AuthError::Storage(sqlx::Error::PoolClosed))
        }

        async fn upsert_project_role(
            &self,
            _project_id: &str,
            _user_id: &str,
            _role: &str,
        ) -> Result<(), AuthError> {
            Err(AuthError::Storage(sqlx::Error::PoolClosed))
        }
    }

    async fn engine_with(role: &str) -> AuthorizationEngine {
        let mem = MemoryStore::new();
        mem.upsert_project_role("project-1", "alice", role)
            .await
            .unwrap();
        AuthorizationEngine::new(Arc::new(mem))
    }

    #[tokio::test]
    async fn anonymous_is_denied() {
        let engine = engine_with("OWNER").await;
        assert!(!engine.has_project_permission(None, "project-1", "VIEWER").await);
    }

    #[tokio::test]
    async fn role_rank_decides() {
        let engine = engine_with("MEMBER").await;
        let alice = Identity::new("alice");
        assert!(engine.has_project_permission(Some(&alice), "project-1", "VIEWER").await);
        assert!(engine.has_project_permission(Some(&alice), "project-1", "member").await);
        assert!(!engine.has_project_permission(Some(&alice), "project-1", "ADMIN").await);
    }

    #[tokio::test]
    async fn missing_row_is_denied() {
        let engine = engine_with("OWNER").await;
        let alice = Identity::new("alice");
        let bob = Identity::new("bob");
        assert!(!engine.has_project_permission(Some(&alice), "project-2", "VIEWER").await);
        assert!(!engine.has_project_permission(Some(&bob), "project-1", "VIEWER").await);
    }

    #[tokio::test]
    async fn unknown_roles_are_denied() {
        let engine = engine_with("SUPERUSER").await;
        let alice = Identity::new("alice");
        assert!(!engine.has_project_permission(Some(&alice), "project-1", "VIEWER").await);

        let engine = engine_with("OWNER").await;
        assert!(!engine.has_project_permission(Some(&alice), "project-1", "ROOT").await);
    }

    #[tokio::test]
    async fn storage_failure_is_denied() {
        let engine = AuthorizationEngine::new(Arc::new(BrokenRoles));
        let alice = Identity::new("alice");
        assert!(!engine.has_project_permission(Some(&alice), "project-1", "VIEWER").await);
    }

    #[tokio::test]
    async fn require_distinguishes_unauthorized_from_forbidden() {
        let engine = engine_with("VIEWER").await;
        let alice = Identity::new("alice");
        assert!(matches!(
            engine.require_project_role(None, "project-1", Role::Viewer).await,
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            engine
                .require_project_role(Some(&alice), "project-1", Role::Admin)
                .await,
            Err(AuthError::Forbidden)
        ));
        assert!(
            engine
                .require_project_role(Some(&alice), "project-1", Role::Viewer)
                .await
                .is_ok()
        );
    }
}
