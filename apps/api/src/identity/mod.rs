//! Identity gateway: who is calling, and when they sign in or out.
//!
//! Sign-in itself happens at an external identity provider that issues bearer tokens.
//! This service only resolves tokens to an `AuthUser` and republishes sign-in/sign-out
//! transitions so editor sessions can be torn down when their owner leaves.

pub mod jwt;
pub mod middleware;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

/// Opaque user id assigned by the identity provider. Profiles are keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    SignedIn(AuthUser),
    SignedOut(UserId),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Resolves a bearer token to the signed-in user.
    async fn resolve(&self, token: &str) -> Result<AuthUser, AuthError>;

    /// Subscribes to sign-in/sign-out transitions.
    fn subscribe(&self) -> broadcast::Receiver<IdentityEvent>;

    /// Marks the user as signed out and publishes `SignedOut`.
    async fn sign_out(&self, user: &UserId);
}
