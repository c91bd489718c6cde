use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::middleware::auth::AuthIdentity;
use crate::state::AppState;

/// Store-refresh middleware for role-gated routes.
///
/// Token claims reflect the credential store at issuance, not revocation
/// since. This layer re-fetches the identity by the claim id so a demoted or
/// deleted account loses privileged access immediately instead of at token
/// expiry. Must run after `auth_middleware`.
pub async fn refresh_identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = request
        .extensions()
        .get::<AuthIdentity>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let identity = state
        .store
        .find_by_id(auth.id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("token presented for identity {} which no longer exists", auth.id);
            ApiError::unauthorized("Identity no longer exists")
        })?;

    // Replace the claim-trust context with the store's current view,
    // fresh role included.
    request.extensions_mut().insert(AuthIdentity {
        id: identity.id,
        role: identity.role,
    });

    Ok(next.run(request).await)
}
