use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::EmailEntry;

use crate::errors::StoreError;
use crate::pagination::BatchQuery;
use crate::storage::EmailStore;

/// Process-local store backed by an ordered map.
///
/// The map is ordered by address, which gives batch reads their stable order.
#[derive(Clone, Default)]
pub struct MemoryEmailStore {
    inner: Arc<RwLock<BTreeMap<String, EmailEntry>>>,
}

impl MemoryEmailStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl EmailStore for MemoryEmailStore {
    async fn create_email(&self, email: &str) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        if map.contains_key(email) {
            return Err(StoreError::Conflict(email.to_string()));
        }
        map.insert(email.to_string(), EmailEntry::new(email));
        Ok(())
    }

    async fn get_email(&self, email: &str) -> Result<Option<EmailEntry>, StoreError> {
        let map = self.inner.read().await;
        Ok(map.get(email).cloned())
    }

    async fn get_email_batch(&self, query: BatchQuery) -> Result<Vec<EmailEntry>, StoreError> {
        let map = self.inner.read().await;
        Ok(map
            .values()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .cloned()
            .collect())
    }

    async fn update_email(&self, entry: &EmailEntry) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        match map.get_mut(&entry.email) {
            Some(stored) => {
                stored.confirmed_at = entry.confirmed_at;
                Ok(())
            }
            None => Err(StoreError::NotFound(entry.email.clone())),
        }
    }

    async fn delete_email(&self, email: &str) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        map.remove(email);
        Ok(())
    }
}
