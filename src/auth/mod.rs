// Authentication primitives: password hashing and bearer token service.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, PasswordError};
pub use token::{Claims, TokenError, TokenService};
