use anyhow::{Context, Result};

/// S3 / MinIO settings. Absent when `S3_BUCKET` is unset; uploads then stay in memory.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: String,
    /// Base for the URLs written into `basics.image`; defaults to the endpoint.
    pub public_url: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl S3Config {
    /// Prefix of every object URL the blob store hands out.
    pub fn object_url_prefix(&self) -> String {
        format!("{}/{}/", self.public_url.trim_end_matches('/'), self.bucket)
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres URL. Without it profiles are kept in process memory.
    pub database_url: Option<String>,
    pub s3: Option<S3Config>,
    pub jwt_secret: String,
    /// Enables cover letter drafting.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub max_image_bytes: usize,
}

pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3 = match optional_env("S3_BUCKET") {
            Some(bucket) => {
                let endpoint = require_env("S3_ENDPOINT")?;
                Some(S3Config {
                    bucket,
                    public_url: optional_env("S3_PUBLIC_URL").unwrap_or_else(|| endpoint.clone()),
                    endpoint,
                    access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                    secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
                })
            }
            None => None,
        };

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            s3,
            jwt_secret: require_env("JWT_SECRET")?,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_image_bytes: match optional_env("MAX_IMAGE_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_IMAGE_BYTES must be a byte count")?,
                None => DEFAULT_MAX_IMAGE_BYTES,
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and empty are treated alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
