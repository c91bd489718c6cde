use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::identity::Identity;
use crate::database::store::{CredentialStore, DuplicateField, StoreError};

/// In-memory credential store.
///
/// Used by the integration tests and as the development fallback when no
/// DATABASE_URL is configured. Enforces the same email/handle uniqueness the
/// postgres schema does, so duplicate races resolve identically.
#[derive(Default)]
pub struct MemoryCredentialStore {
    identities: RwLock<HashMap<Uuid, Identity>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn conflict(
        identities: &HashMap<Uuid, Identity>,
        email: &str,
        handle: &str,
        exclude: Option<Uuid>,
    ) -> Option<DuplicateField> {
        for other in identities.values() {
            if Some(other.id) == exclude {
                continue;
            }
            if other.email == email {
                return Some(DuplicateField::Email);
            }
            if other.handle == handle {
                return Some(DuplicateField::Handle);
            }
        }
        None
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn insert(&self, identity: Identity) -> Result<Identity, StoreError> {
        let mut identities = self.identities.write().await;

        if let Some(field) = Self::conflict(&identities, &identity.email, &identity.handle, None) {
            return Err(StoreError::Duplicate(field));
        }

        identities.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError> {
        Ok(self.identities.read().await.get(&id).cloned())
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Identity>, StoreError> {
        let identities = self.identities.read().await;
        Ok(identities
            .values()
            .find(|identity| identity.email == identifier || identity.handle == identifier)
            .cloned())
    }

    async fn identifier_taken(
        &self,
        email: &str,
        handle: &str,
    ) -> Result<Option<DuplicateField>, StoreError> {
        let identities = self.identities.read().await;
        Ok(Self::conflict(&identities, email, handle, None))
    }

    async fn list(&self) -> Result<Vec<Identity>, StoreError> {
        let identities = self.identities.read().await;
        let mut all: Vec<Identity> = identities.values().cloned().collect();
        all.sort_by_key(|identity| identity.created_at);
        Ok(all)
    }

    async fn update(&self, identity: &Identity) -> Result<Option<Identity>, StoreError> {
        let mut identities = self.identities.write().await;

        if !identities.contains_key(&identity.id) {
            return Ok(None);
        }

        if let Some(field) = Self::conflict(
            &identities,
            &identity.email,
            &identity.handle,
            Some(identity.id),
        ) {
            return Err(StoreError::Duplicate(field));
        }

        let mut updated = identity.clone();
        updated.updated_at = Utc::now();
        identities.insert(updated.id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.identities.write().await.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
