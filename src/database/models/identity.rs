use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access role of an identity. New registrations always start as `Standard`;
/// only an administrator editing a different identity may change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Standard,
    Administrator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Standard => "standard",
            Role::Administrator => "administrator",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Role::Standard),
            "administrator" => Ok(Role::Administrator),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full identity record as persisted in the credential store.
///
/// The password hash never leaves the store boundary: anything crossing the
/// HTTP surface goes through [`PublicIdentity`] instead.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub handle: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Build a fresh identity for registration. Role is always `Standard`
    /// here; administrator accounts are only created by promotion.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        handle: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            handle: handle.into(),
            password_hash: password_hash.into(),
            role: Role::Standard,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Client-facing projection of an identity, with the password hash excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicIdentity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub handle: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Identity> for PublicIdentity {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            name: identity.name.clone(),
            email: identity.email.clone(),
            handle: identity.handle.clone(),
            role: identity.role,
            created_at: identity.created_at,
            updated_at: identity.updated_at,
        }
    }
}

impl From<Identity> for PublicIdentity {
    fn from(identity: Identity) -> Self {
        PublicIdentity::from(&identity)
    }
}
