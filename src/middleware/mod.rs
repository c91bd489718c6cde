pub mod auth;
pub mod refresh_identity;
pub mod require_admin;
pub mod response;

pub use auth::{auth_middleware, AuthIdentity};
pub use refresh_identity::refresh_identity_middleware;
pub use require_admin::require_admin_middleware;
pub use response::{ApiResponse, ApiResult};
