use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::Claims;
use crate::database::models::identity::Role;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller context attached to the request.
///
/// After `auth_middleware` this carries the verified token claims as-is
/// (claim-trust). Routes layered with `refresh_identity_middleware` get it
/// replaced with freshly loaded store state instead.
#[derive(Clone, Debug)]
pub struct AuthIdentity {
    pub id: Uuid,
    pub role: Role,
}

impl From<Claims> for AuthIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
        }
    }
}

/// Bearer token middleware: extracts `Authorization: Bearer <token>`,
/// verifies it, and injects the caller's [`AuthIdentity`] into the request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;
    let claims = state.tokens.verify(&token)?;

    request.extensions_mut().insert(AuthIdentity::from(claims));

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header.
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        Some(_) => Err(ApiError::unauthorized("Empty bearer token")),
        None => Err(ApiError::unauthorized(
            "Authorization header must use Bearer token format",
        )),
    }
}
