use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{ProfileStore, StoreError};
use crate::identity::UserId;
use crate::models::profile::ProfileDocument;

/// Process-local profile store. Documents are kept as JSON so a load goes through the
/// same deserialization as a Postgres row.
#[derive(Default)]
pub struct MemoryProfileStore {
    documents: RwLock<HashMap<UserId, Value>>,
    unavailable: AtomicBool,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every call fails with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Stores a raw JSON value as-is, bypassing serialization.
    pub async fn put_raw(&self, user_id: &UserId, value: Value) {
        self.documents.write().await.insert(user_id.clone(), value);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn load(&self, user_id: &UserId) -> Result<Option<ProfileDocument>, StoreError> {
        self.check_available()?;
        let documents = self.documents.read().await;
        match documents.get(user_id) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|source| StoreError::Malformed {
                    user_id: user_id.clone(),
                    source,
                }),
        }
    }

    async fn save(&self, user_id: &UserId, document: &ProfileDocument) -> Result<(), StoreError> {
        self.check_available()?;
        let value = serde_json::to_value(document).map_err(|source| StoreError::Malformed {
            user_id: user_id.clone(),
            source,
        })?;
        self.documents.write().await.insert(user_id.clone(), value);
        Ok(())
    }
}
