//! Blob store for profile photos. The returned URL is opaque to the rest of the service;
//! it is written into `basics.image` and fetched again only by the PDF exporter.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::identity::UserId;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("upload rejected: {0}")]
    Rejected(String),

    #[error("S3 error: {0}")]
    S3(String),
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores the image under the user's profile prefix and returns its public URL.
    async fn upload_image(&self, user_id: &UserId, upload: ImageUpload) -> Result<String, BlobError>;
}

/// `profile/{uid}/{uuid}-{file name}`; the uuid keeps re-uploads of the same file distinct.
pub fn object_key(user_id: &UserId, file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let safe = if safe.is_empty() { "image".to_string() } else { safe };
    format!("profile/{}/{}-{}", user_id, Uuid::new_v4(), safe)
}

fn validate(upload: &ImageUpload) -> Result<(), BlobError> {
    if upload.bytes.is_empty() {
        return Err(BlobError::Rejected("empty file".to_string()));
    }
    if !upload.content_type.starts_with("image/") {
        return Err(BlobError::Rejected(format!(
            "unsupported content type '{}'",
            upload.content_type
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// S3 / MinIO
// ────────────────────────────────────────────────────────────────────────────

pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    /// Public URL of the bucket, ending in `/`.
    url_prefix: String,
}

impl S3BlobStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, url_prefix: String) -> Self {
        Self {
            client,
            bucket,
            url_prefix,
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload_image(&self, user_id: &UserId, upload: ImageUpload) -> Result<String, BlobError> {
        validate(&upload)?;
        let key = object_key(user_id, &upload.file_name);
        let size = upload.bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(&upload.content_type)
            .body(ByteStream::from(upload.bytes.to_vec()))
            .send()
            .await
            .map_err(|e| BlobError::S3(e.to_string()))?;

        info!(user_id = %user_id, key = %key, size, "Profile image uploaded");
        Ok(format!("{}{}", self.url_prefix, key))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

/// Keeps uploads in process memory; URLs use the `memory://` scheme.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<String, ImageUpload>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<ImageUpload> {
        self.objects.read().await.get(key).cloned()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload_image(&self, user_id: &UserId, upload: ImageUpload) -> Result<String, BlobError> {
        validate(&upload)?;
        let key = object_key(user_id, &upload.file_name);
        self.objects.write().await.insert(key.clone(), upload);
        Ok(format!("memory://{key}"))
    }
}
