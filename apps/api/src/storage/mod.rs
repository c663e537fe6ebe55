//! Persistence gateways: the profile store (one document per user id) and the blob
//! store for profile photos.

pub mod blob;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::identity::UserId;
use crate::models::profile::ProfileDocument;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored profile for {user_id} is malformed: {source}")]
    Malformed {
        user_id: UserId,
        #[source]
        source: serde_json::Error,
    },

    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value store of profile documents keyed by user id. Writes replace the whole
/// document; the last write wins.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored for this user yet.
    async fn load(&self, user_id: &UserId) -> Result<Option<ProfileDocument>, StoreError>;

    async fn save(&self, user_id: &UserId, document: &ProfileDocument) -> Result<(), StoreError>;
}
