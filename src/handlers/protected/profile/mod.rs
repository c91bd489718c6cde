// handlers/protected/profile - the caller's own identity, bearer token
// required. These routes run on verified token claims (claim-trust); every
// handler still loads the record itself, so a deleted identity answers 401.

pub mod delete;
pub mod show;
pub mod update;

pub use delete::profile_delete;
pub use show::profile_get;
pub use update::profile_put;

use crate::database::models::identity::Identity;
use crate::error::ApiError;
use crate::middleware::AuthIdentity;
use crate::state::AppState;

/// Load the caller's own record. A valid token for an identity that has
/// since been removed is treated as unauthenticated.
pub(crate) async fn load_caller(
    state: &AppState,
    auth: &AuthIdentity,
) -> Result<Identity, ApiError> {
    state
        .store
        .find_by_id(auth.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Identity no longer exists"))
}
