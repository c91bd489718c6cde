// handlers/protected/profile/delete.rs - DELETE /auth/profile handler

use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::auth::verify_password;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthIdentity};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProfileDeleteRequest {
    /// Current password, required as the explicit confirmation step for
    /// self-deletion. A bearer token alone is not enough.
    pub password: String,
}

/// DELETE /auth/profile - Delete the caller's own identity.
///
/// This is the only self-deletion path; the administrator deletion route
/// rejects a target id equal to the caller id.
pub async fn profile_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthIdentity>,
    Json(body): Json<ProfileDeleteRequest>,
) -> ApiResult<()> {
    let identity = super::load_caller(&state, &auth).await?;

    if !verify_password(&body.password, &identity.password_hash) {
        tracing::warn!("identity {} failed self-deletion confirmation", identity.id);
        return Err(ApiError::forbidden("Password confirmation failed"));
    }

    state.store.delete(identity.id).await?;
    tracing::info!("identity {} deleted own account", identity.id);

    Ok(ApiResponse::<()>::no_content())
}
