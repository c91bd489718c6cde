// handlers/public/auth/login.rs - POST /auth/login handler

use axum::{extract::State, Json};
use serde::Deserialize;

use super::Session;
use crate::auth::verify_password;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address or login handle, matched case-sensitive as stored.
    pub identifier: String,
    pub password: String,
}

/// POST /auth/login - Verify credentials and issue a bearer token.
///
/// Lookup and password mismatch both answer with the same generic 401 so the
/// response never reveals which part of the credentials was wrong.
pub async fn login_post(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Session> {
    if body.identifier.is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request("Identifier and password are required"));
    }

    let identity = state
        .store
        .find_by_identifier(&body.identifier)
        .await?
        .ok_or_else(ApiError::invalid_credentials)?;

    if !verify_password(&body.password, &identity.password_hash) {
        tracing::debug!("failed login attempt for identity {}", identity.id);
        return Err(ApiError::invalid_credentials());
    }

    let token = state.tokens.issue_default(identity.id, identity.role)?;
    let expires_in = state.tokens.default_ttl().num_seconds();

    tracing::info!("identity {} logged in", identity.id);

    Ok(ApiResponse::success(Session {
        token,
        identity: identity.into(),
        expires_in,
    }))
}
