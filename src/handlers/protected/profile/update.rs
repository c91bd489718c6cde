// handlers/protected/profile/update.rs - PUT /auth/profile handler

use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::auth::hash_password;
use crate::database::models::identity::PublicIdentity;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthIdentity};
use crate::state::AppState;

/// Self-service update payload. Only the display name and password are
/// editable here; email and handle are immutable after registration, and a
/// `role` key in the body is silently dropped during deserialization, so no
/// caller can elevate their own role through this path.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// PUT /auth/profile - Update the caller's own name and/or password.
pub async fn profile_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthIdentity>,
    Json(body): Json<ProfileUpdateRequest>,
) -> ApiResult<PublicIdentity> {
    if body.name.is_none() && body.password.is_none() {
        return Err(ApiError::bad_request("Nothing to update"));
    }

    let mut identity = super::load_caller(&state, &auth).await?;

    if let Some(name) = body.name {
        if name.trim().is_empty() {
            return Err(ApiError::bad_request("Name cannot be empty"));
        }
        identity.name = name;
    }

    if let Some(password) = body.password {
        if password.len() < 6 {
            return Err(ApiError::bad_request(
                "Password must be at least 6 characters",
            ));
        }
        identity.password_hash = hash_password(&password)?;
    }

    let updated = state
        .store
        .update(&identity)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Identity no longer exists"))?;

    tracing::info!("identity {} updated own profile", updated.id);

    Ok(ApiResponse::success(updated.into()))
}
