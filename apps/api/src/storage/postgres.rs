use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{debug, info};

use super::{ProfileStore, StoreError};
use crate::identity::UserId;
use crate::models::profile::ProfileDocument;

/// One JSONB row per user id.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `profiles` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                user_id     TEXT PRIMARY KEY,
                document    JSONB NOT NULL,
                updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        info!("profiles table ready");
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn load(&self, user_id: &UserId) -> Result<Option<ProfileDocument>, StoreError> {
        let row: Option<Value> =
            sqlx::query_scalar("SELECT document FROM profiles WHERE user_id = $1")
                .bind(user_id.as_str())
                .fetch_optional(&self.pool)
                .await?;

        let Some(value) = row else {
            debug!(user_id = %user_id, "No stored profile");
            return Ok(None);
        };

        serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StoreError::Malformed {
                user_id: user_id.clone(),
                source,
            })
    }

    async fn save(&self, user_id: &UserId, document: &ProfileDocument) -> Result<(), StoreError> {
        let value = serde_json::to_value(document).map_err(|source| StoreError::Malformed {
            user_id: user_id.clone(),
            source,
        })?;

        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, document, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (user_id)
            DO UPDATE SET document = EXCLUDED.document, updated_at = now()
            "#,
        )
        .bind(user_id.as_str())
        .bind(value)
        .execute(&self.pool)
        .await?;

        debug!(user_id = %user_id, "Profile saved");
        Ok(())
    }
}
