// handlers/elevated/users/delete.rs - DELETE /users/:id handler

use axum::extract::{Path, State};
use axum::Extension;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthIdentity};
use crate::state::AppState;

/// DELETE /users/:id - Delete another identity.
///
/// The target must differ from the caller: self-deletion only exists as the
/// password-confirmed DELETE /auth/profile, which keeps an administrator from
/// accidentally removing the last admin account through this path.
pub async fn user_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthIdentity>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    if id == auth.id {
        return Err(ApiError::forbidden(
            "Cannot delete your own identity through this endpoint",
        ));
    }

    let removed = state.store.delete(id).await?;
    if !removed {
        return Err(ApiError::not_found("Identity not found"));
    }

    tracing::info!("identity {} deleted by administrator {}", id, auth.id);

    Ok(ApiResponse::<()>::no_content())
}
