use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use tenantgate_auth::{IdentityStore, IdentityStoreError};
use tenantgate_core::Identity;

use super::seed::SeedError;

/// In-memory identity store for tests/dev, keyed by email.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    inner: RwLock<HashMap<String, Identity>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identities(identities: impl IntoIterator<Item = Identity>) -> Result<Self, SeedError> {
        let store = Self::new();
        for identity in identities {
            store.insert(identity)?;
        }
        Ok(store)
    }

    /// Add an identity. Emails are unique.
    pub fn insert(&self, identity: Identity) -> Result<(), SeedError> {
        let mut map = self.inner.write().map_err(|_| SeedError::Poisoned)?;
        if map.contains_key(&identity.email) {
            return Err(SeedError::DuplicateEmail(identity.email));
        }
        map.insert(identity.email.clone(), identity);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityStoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| IdentityStoreError::Unavailable("identity map lock poisoned".to_string()))?;
        Ok(map.get(email).cloned())
    }
}
