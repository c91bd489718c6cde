// handlers/public/auth/register.rs - POST /auth/register handler

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Deserialize;

use super::Session;
use crate::auth::hash_password;
use crate::database::models::identity::Identity;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Registration payload. There is deliberately no `role` field here: new
/// identities always start as `standard`, whatever the caller sends.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub handle: String,
    pub password: String,
}

/// POST /auth/register - Create an identity and issue its first token.
///
/// The duplicate pre-check is an early exit only; the storage layer's unique
/// constraints decide the winner when two registrations race on the same
/// email or handle.
pub async fn register_post(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<Session> {
    validate(&body)?;

    if let Some(field) = state.store.identifier_taken(&body.email, &body.handle).await? {
        return Err(crate::database::StoreError::Duplicate(field).into());
    }

    let password_hash = hash_password(&body.password)?;
    let identity = state
        .store
        .insert(Identity::new(body.name, body.email, body.handle, password_hash))
        .await?;

    let token = state.tokens.issue_default(identity.id, identity.role)?;
    let expires_in = state.tokens.default_ttl().num_seconds();

    tracing::info!("registered identity {} ({})", identity.id, identity.handle);

    Ok(ApiResponse::created(Session {
        token,
        identity: identity.into(),
        expires_in,
    }))
}

fn validate(body: &RegisterRequest) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    if body.name.trim().is_empty() {
        field_errors.insert("name".to_string(), "This field is required".to_string());
    }
    if body.email.trim().is_empty() {
        field_errors.insert("email".to_string(), "This field is required".to_string());
    } else if !body.email.contains('@') {
        field_errors.insert("email".to_string(), "Invalid email address".to_string());
    }
    if body.handle.trim().is_empty() {
        field_errors.insert("handle".to_string(), "This field is required".to_string());
    }
    if body.password.len() < 6 {
        field_errors.insert(
            "password".to_string(),
            "Password must be at least 6 characters".to_string(),
        );
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error(
            "Invalid registration request",
            Some(field_errors),
        ))
    }
}
