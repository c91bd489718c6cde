// handlers/elevated/users/show.rs - GET /users/:id handler

use axum::extract::{Path, State};
use uuid::Uuid;

use crate::database::models::identity::PublicIdentity;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /users/:id - Fetch a single identity.
pub async fn user_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<PublicIdentity> {
    let identity = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Identity not found"))?;

    Ok(ApiResponse::success(identity.into()))
}
