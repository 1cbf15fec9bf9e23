//! Process-local credential store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CredentialStore, StoreError};
use crate::auth::StoreCredential;
use crate::config::ShopDomain;

/// A credential store backed by a `HashMap` behind an async `RwLock`.
///
/// Cloning shares the underlying map. Contents are lost when the process
/// exits.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    credentials: Arc<RwLock<HashMap<ShopDomain, StoreCredential>>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of shops with a stored credential.
    pub async fn len(&self) -> usize {
        self.credentials.read().await.len()
    }

    /// Returns `true` if no credential has been stored.
    pub async fn is_empty(&self) -> bool {
        self.credentials.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn upsert(&self, credential: StoreCredential) -> Result<(), StoreError> {
        self.credentials
            .write()
            .await
            .insert(credential.shop.clone(), credential);
        Ok(())
    }

    async fn lookup(&self, shop: &ShopDomain) -> Result<Option<StoreCredential>, StoreError> {
        Ok(self.credentials.read().await.get(shop).cloned())
    }
}
