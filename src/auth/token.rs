use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;
use crate::database::models::identity::Role;

/// Claims embedded in every bearer token. `sub` and `role` reflect the
/// credential store at the moment of issuance; role-gated routes re-fetch
/// the identity rather than trusting `role` for the token's whole lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing secret is not configured")]
    MissingSecret,

    #[error("token generation failed: {0}")]
    Signing(jsonwebtoken::errors::Error),

    /// Covers malformed, expired and tampered tokens alike. The exact cause
    /// is logged at debug level and never reaches the client.
    #[error("invalid token")]
    Invalid,
}

/// Issues and verifies signed bearer tokens. Stateless: nothing is persisted
/// server-side, and expiry is the only invalidation mechanism.
#[derive(Clone)]
pub struct TokenService {
    secret: Arc<String>,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            secret: Arc::new(secret.into()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Build from the process configuration (SECURITY_JWT_SECRET and
    /// SECURITY_TOKEN_TTL_HOURS).
    pub fn from_config() -> Self {
        let security = &config::config().security;
        Self::new(
            security.jwt_secret.clone(),
            security.token_ttl_hours as i64,
        )
    }

    /// The single token lifetime policy used by every issuance path.
    pub fn default_ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token embedding `{identity id, role}` that expires `ttl` from
    /// now.
    pub fn issue(&self, identity_id: Uuid, role: Role, ttl: Duration) -> Result<String, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let now = Utc::now();
        let claims = Claims {
            sub: identity_id,
            role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(TokenError::Signing)
    }

    /// Issue with the configured default lifetime.
    pub fn issue_default(&self, identity_id: Uuid, role: Role) -> Result<String, TokenError> {
        self.issue(identity_id, role, self.ttl)
    }

    /// Check signature and expiry, returning the embedded claims. Malformed,
    /// expired and tampered tokens are all rejected as [`TokenError::Invalid`].
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        match decode::<Claims>(token, &decoding_key, &validation) {
            Ok(token_data) => Ok(token_data.claims),
            Err(e) => {
                tracing::debug!("token rejected: {}", e);
                Err(TokenError::Invalid)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("unit-test-secret", 24)
    }

    #[test]
    fn issue_then_verify_returns_original_claims() {
        let tokens = service();
        let id = Uuid::new_v4();

        let token = tokens.issue_default(id, Role::Administrator).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Administrator);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service();
        let token = tokens
            .issue(Uuid::new_v4(), Role::Standard, Duration::hours(-2))
            .unwrap();

        assert!(matches!(tokens.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let tokens = service();
        let token = tokens.issue_default(Uuid::new_v4(), Role::Standard).unwrap();

        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(matches!(tokens.verify(&tampered), Err(TokenError::Invalid)));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = TokenService::new("other-secret", 24)
            .issue_default(Uuid::new_v4(), Role::Standard)
            .unwrap();

        assert!(matches!(service().verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn malformed_token_is_rejected() {
        assert!(matches!(
            service().verify("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let tokens = TokenService::new("", 24);
        assert!(matches!(
            tokens.issue_default(Uuid::new_v4(), Role::Standard),
            Err(TokenError::MissingSecret)
        ));
    }
}
