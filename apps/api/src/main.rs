mod config;
mod cover_letter;
mod db;
mod editor;
mod errors;
mod export;
mod identity;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, S3Config};
use crate::db::connect_profile_store;
use crate::editor::registry::SessionRegistry;
use crate::identity::jwt::JwtIdentityGateway;
use crate::identity::IdentityGateway;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::blob::{BlobStore, MemoryBlobStore, S3BlobStore};
use crate::storage::memory::MemoryProfileStore;
use crate::storage::ProfileStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Profile store: PostgreSQL, or process memory for local runs
    let profiles: Arc<dyn ProfileStore> = match &config.database_url {
        Some(url) => Arc::new(connect_profile_store(url).await?),
        None => {
            warn!("DATABASE_URL not set; profiles are kept in memory and lost on restart");
            Arc::new(MemoryProfileStore::new())
        }
    };

    // Blob store: S3 / MinIO, or process memory
    let blobs: Arc<dyn BlobStore> = match &config.s3 {
        Some(s3) => {
            let client = build_s3_client(s3).await;
            info!(bucket = %s3.bucket, "S3 client initialized");
            Arc::new(S3BlobStore::new(client, s3.bucket.clone(), s3.object_url_prefix()))
        }
        None => {
            warn!("S3_BUCKET not set; uploaded images are kept in memory");
            Arc::new(MemoryBlobStore::new())
        }
    };

    // Identity gateway, and the registry that follows its sign-out events
    let identity = Arc::new(JwtIdentityGateway::new(&config.jwt_secret));
    let sessions = Arc::new(SessionRegistry::new());
    let _identity_listener = sessions.clone().spawn_identity_listener(identity.subscribe());

    // LLM client (optional)
    let llm = match &config.anthropic_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => {
            info!("ANTHROPIC_API_KEY not set; cover letter drafting disabled");
            None
        }
    };

    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    // Build app state
    let state = AppState {
        config: config.clone(),
        profiles,
        blobs,
        identity,
        sessions,
        llm,
        http,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(s3: &S3Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &s3.access_key_id,
        &s3.secret_access_key,
        None,
        None,
        "vitae-static",
    );

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&s3.endpoint)
        .load()
        .await;

    // MinIO serves buckets by path, not by virtual host.
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(true)
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}
