use axum::{extract::Request, middleware::Next, response::Response};

use crate::database::models::identity::Role;
use crate::error::ApiError;
use crate::middleware::auth::AuthIdentity;

/// Role gate for administrator-only routes. Runs after identity attachment,
/// never before: a missing context is a 401, a wrong role is a 403.
pub async fn require_admin_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    let auth = request
        .extensions()
        .get::<AuthIdentity>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if auth.role != Role::Administrator {
        tracing::debug!("identity {} denied: administrator role required", auth.id);
        return Err(ApiError::forbidden("Administrator role required"));
    }

    Ok(next.run(request).await)
}
