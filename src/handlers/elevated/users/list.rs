// handlers/elevated/users/list.rs - GET /users handler

use axum::extract::State;

use crate::database::models::identity::PublicIdentity;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /users - List all identities as public projections.
pub async fn user_list(State(state): State<AppState>) -> ApiResult<Vec<PublicIdentity>> {
    let identities = state.store.list().await?;
    let public: Vec<PublicIdentity> = identities.iter().map(PublicIdentity::from).collect();
    Ok(ApiResponse::success(public))
}
