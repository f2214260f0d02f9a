//! Project access handlers.
//!
//! Mounted behind `require_auth`, so the caller is always known here.

use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;

/// `GET /projects/{project_id}/access/{role}`: `204` when the caller holds
/// at least `role` on the project, `403` otherwise. Unknown roles deny.
pub async fn check_access_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((project_id, role)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    if state
        .authz
        .has_project_permission(Some(&user.0), &project_id, &role)
        .await
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Forbidden(format!(
            "Role {role} required on project {project_id}"
        )))
    }
}
