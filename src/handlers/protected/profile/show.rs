// handlers/protected/profile/show.rs - GET /auth/profile handler

use axum::{extract::State, Extension};

use crate::database::models::identity::PublicIdentity;
use crate::middleware::{ApiResponse, ApiResult, AuthIdentity};
use crate::state::AppState;

/// GET /auth/profile - Fetch the caller's own public identity.
pub async fn profile_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthIdentity>,
) -> ApiResult<PublicIdentity> {
    let identity = super::load_caller(&state, &auth).await?;
    Ok(ApiResponse::success(identity.into()))
}
