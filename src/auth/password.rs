use thiserror::Error;

use crate::config;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
}

/// Hash a plaintext password with bcrypt, using the configured work factor.
///
/// bcrypt generates a fresh random salt per call, so hashing the same
/// plaintext twice yields two different stored values.
pub fn hash_password(plaintext: &str) -> Result<String, PasswordError> {
    let cost = config::config().security.bcrypt_cost;
    Ok(bcrypt::hash(plaintext, cost)?)
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// Never fails outward: an unparseable or corrupt hash logs the failure and
/// verifies as `false`.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    match bcrypt::verify(plaintext, hash) {
        Ok(matched) => matched,
        Err(e) => {
            tracing::error!("password verification failed against stored hash: {}", e);
            false
        }
    }
}
