use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::storage::postgres::PgProfileStore;

/// Connects to PostgreSQL and makes sure the `profiles` table exists.
pub async fn connect_profile_store(database_url: &str) -> Result<PgProfileStore> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;
    info!("PostgreSQL connection pool established");

    let store = PgProfileStore::new(pool);
    store
        .ensure_schema()
        .await
        .context("Failed to prepare the profiles table")?;
    Ok(store)
}
