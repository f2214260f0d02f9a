//! # planboard_api
//!
//! HTTP surface for Planboard authentication: session cookie transport,
//! soft and hard authentication middleware, and the auth endpoints.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum_extra::extract::cookie::Key;
use sqlx::PgPool;

use planboard_core::auth::AuthError;
use planboard_core::auth::authorization::AuthorizationEngine;
use planboard_core::auth::password::PasswordHasher;
use planboard_core::auth::session::SessionStore;
use planboard_core::store::{
    PgStore, ProjectRoleRepository, SessionRepository, UserRepository,
};

use crate::config::ApiConfig;
use crate::handlers::{auth, health, projects};
use crate::services::cookies::{CookiePolicy, cookie_key};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub authz: AuthorizationEngine,
    pub users: Arc<dyn UserRepository>,
    pub hasher: PasswordHasher,
    pub cookie_policy: CookiePolicy,
    /// Signing key for the session cookie.
    pub cookie_key: Key,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// Wire every component to one store implementing all persistence ports.
    pub fn new<S>(store: S, config: ApiConfig) -> Result<Self, AuthError>
    where
        S: SessionRepository + ProjectRoleRepository + UserRepository + 'static,
    {
        let store = Arc::new(store);
        Ok(Self {
            sessions: SessionStore::new(store.clone()),
            authz: AuthorizationEngine::new(store.clone()),
            users: store,
            hasher: PasswordHasher::new(config.bcrypt_cost)?,
            cookie_policy: CookiePolicy::for_environment(config.environment),
            cookie_key: cookie_key(&config.session_secret),
            config,
        })
    }

    /// State backed by PostgreSQL.
    pub fn postgres(pool: PgPool, config: ApiConfig) -> Result<Self, AuthError> {
        Self::new(PgStore::new(pool), config)
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Run embedded database migrations.
///
/// Delegates to `planboard_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    planboard_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    // Soft authentication: identity attached when the cookie validates.
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/me", get(auth::me_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::attach_identity,
        ));

    // Hard authentication: 401 before the handler runs.
    let protected = Router::new()
        .route(
            "/projects/{project_id}/access/{role}",
            get(projects::check_access_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
}
