// handlers/public/auth - token acquisition endpoints, no authentication
// required. Registration and login both end in the same token-issuance step.

use serde::Serialize;

use crate::database::models::identity::PublicIdentity;

pub mod login;
pub mod register;

pub use login::login_post;
pub use register::register_post;

/// Body returned by both login and registration: a bearer token plus the
/// public projection of the authenticated identity.
#[derive(Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub identity: PublicIdentity,
    /// Seconds until the token expires.
    pub expires_in: i64,
}
