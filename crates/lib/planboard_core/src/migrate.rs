//! Schema migrations for the auth tables (`users`, `sessions`,
//! `project_roles`), embedded at compile time from `migrations/`.

use sqlx::PgPool;

/// Bring the schema up to date. Already-applied migrations are skipped.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
