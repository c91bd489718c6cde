// handlers/elevated/users/update.rs - PUT /users/:id handler

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::identity::{PublicIdentity, Role};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Administrator update payload. Unlike the self-service path, `role` is a
/// legitimate field here and is applied verbatim to the target record.
#[derive(Debug, Deserialize)]
pub struct UserUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub handle: Option<String>,
    pub role: Option<Role>,
}

/// PUT /users/:id - Update another identity's name, handle, email or role.
pub async fn user_put(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UserUpdateRequest>,
) -> ApiResult<PublicIdentity> {
    let mut identity = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Identity not found"))?;

    if let Some(name) = body.name {
        if name.trim().is_empty() {
            return Err(ApiError::bad_request("Name cannot be empty"));
        }
        identity.name = name;
    }
    if let Some(email) = body.email {
        if !email.contains('@') {
            return Err(ApiError::bad_request("Invalid email address"));
        }
        identity.email = email;
    }
    if let Some(handle) = body.handle {
        if handle.trim().is_empty() {
            return Err(ApiError::bad_request("Handle cannot be empty"));
        }
        identity.handle = handle;
    }
    if let Some(role) = body.role {
        if role != identity.role {
            tracing::info!("identity {} role changed to {}", identity.id, role);
        }
        identity.role = role;
    }

    let updated = state
        .store
        .update(&identity)
        .await?
        .ok_or_else(|| ApiError::not_found("Identity not found"))?;

    Ok(ApiResponse::success(updated.into()))
}
