//! HS256 bearer-token gateway.
//!
//! Tokens are minted by the identity provider with a shared secret. `sub` is the user id
//! and `email` pre-fills new profiles. Signing out records a millisecond cutoff: tokens
//! issued at or before it no longer resolve. Token lifetime is capped, so a cutoff is
//! forgotten once every token it could revoke has expired.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use super::{AuthError, AuthUser, IdentityEvent, IdentityGateway, UserId};

const EVENT_CAPACITY: usize = 64;

/// Longest accepted `exp - iat`.
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: String,
    pub exp: i64,
    /// NumericDate with millisecond precision.
    #[serde(default)]
    pub iat: Option<f64>,
}

impl Claims {
    fn issued_at_ms(&self) -> Option<i64> {
        self.iat.map(|secs| (secs * 1000.0).round() as i64)
    }
}

#[derive(Default)]
struct Presence {
    active: HashSet<UserId>,
    /// Sign-out time in unix milliseconds.
    signed_out_at: HashMap<UserId, i64>,
}

impl Presence {
    fn forget_expired_cutoffs(&mut self, now_ms: i64) {
        let horizon = now_ms - MAX_TOKEN_LIFETIME_SECS * 1000;
        self.signed_out_at.retain(|_, at| *at > horizon);
    }
}

pub struct JwtIdentityGateway {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    presence: RwLock<Presence>,
    events: broadcast::Sender<IdentityEvent>,
}

impl JwtIdentityGateway {
    pub fn new(secret: &str) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            presence: RwLock::new(Presence::default()),
            events,
        }
    }

    /// Mints a token for `user` valid for `ttl_secs`. Used by local tooling and tests.
    pub fn issue(&self, user: &AuthUser, ttl_secs: i64) -> Result<String, AuthError> {
        let now_ms = Utc::now().timestamp_millis();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            exp: now_ms / 1000 + ttl_secs,
            iat: Some(now_ms as f64 / 1000.0),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}

#[async_trait]
impl IdentityGateway for JwtIdentityGateway {
    async fn resolve(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.decode_claims(token)?;
        if claims.sub.is_empty() {
            return Err(AuthError::InvalidToken("missing subject".to_string()));
        }
        let issued_ms = claims
            .issued_at_ms()
            .ok_or_else(|| AuthError::InvalidToken("missing iat".to_string()))?;
        if claims.exp * 1000 - issued_ms > MAX_TOKEN_LIFETIME_SECS * 1000 {
            return Err(AuthError::InvalidToken("token lifetime too long".to_string()));
        }
        let user = AuthUser {
            id: UserId::new(claims.sub),
            email: claims.email,
        };

        let newly_active = {
            let mut presence = self.presence.write().await;
            if let Some(cutoff) = presence.signed_out_at.get(&user.id) {
                if issued_ms <= *cutoff {
                    return Err(AuthError::InvalidToken("token was signed out".to_string()));
                }
            }
            presence.active.insert(user.id.clone())
        };

        if newly_active {
            info!(user_id = %user.id, "User signed in");
            // No subscribers is fine.
            let _ = self.events.send(IdentityEvent::SignedIn(user.clone()));
        }
        Ok(user)
    }

    fn subscribe(&self) -> broadcast::Receiver<IdentityEvent> {
        self.events.subscribe()
    }

    async fn sign_out(&self, user: &UserId) {
        {
            let now_ms = Utc::now().timestamp_millis();
            let mut presence = self.presence.write().await;
            presence.active.remove(user);
            presence.forget_expired_cutoffs(now_ms);
            presence.signed_out_at.insert(user.clone(), now_ms);
        }
        info!(user_id = %user, "User signed out");
        if self.events.send(IdentityEvent::SignedOut(user.clone())).is_err() {
            debug!("No identity subscribers for sign-out event");
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

    fn jane() -> AuthUser {
        AuthUser {
            id: UserId::new("user-1"),
            email: "jane@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_resolve_valid_token() {
        let gateway = JwtIdentityGateway::new(SECRET);
        let token = gateway.issue(&jane(), 3600).unwrap();
        let user = gateway.resolve(&token).await.unwrap();
        assert_eq!(user, jane());
    }

    #[tokio::test]
    async fn test_resolve_rejects_wrong_secret() {
        let issuer = JwtIdentityGateway::new("another-secret-entirely-different-value");
        let token = issuer.issue(&jane(), 3600).unwrap();
        let gateway = JwtIdentityGateway::new(SECRET);
        assert!(matches!(
            gateway.resolve(&token).await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_rejects_expired_token() {
        let gateway = JwtIdentityGateway::new(SECRET);
        let token = gateway.issue(&jane(), -3600).unwrap();
        assert!(matches!(
            gateway.resolve(&token).await,
            Err(AuthError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn test_events_sign_in_once_then_sign_out() {
        let gateway = JwtIdentityGateway::new(SECRET);
        let mut events = gateway.subscribe();
        let token = gateway.issue(&jane(), 3600).unwrap();

        gateway.resolve(&token).await.unwrap();
        gateway.resolve(&token).await.unwrap();
        gateway.sign_out(&jane().id).await;

        assert_eq!(events.recv().await.unwrap(), IdentityEvent::SignedIn(jane()));
        assert_eq!(
            events.recv().await.unwrap(),
            IdentityEvent::SignedOut(jane().id)
        );
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_signed_out_token_no_longer_resolves() {
        let gateway = JwtIdentityGateway::new(SECRET);
        let token = gateway.issue(&jane(), 3600).unwrap();
        gateway.resolve(&token).await.unwrap();
        gateway.sign_out(&jane().id).await;

        assert!(matches!(
            gateway.resolve(&token).await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn test_sign_in_right_after_sign_out() {
        let gateway = JwtIdentityGateway::new(SECRET);
        let old = gateway.issue(&jane(), 3600).unwrap();
        gateway.resolve(&old).await.unwrap();
        gateway.sign_out(&jane().id).await;

        std::thread::sleep(std::time::Duration::from_millis(2));
        let fresh = gateway.issue(&jane(), 3600).unwrap();
        assert_eq!(gateway.resolve(&fresh).await.unwrap(), jane());
        assert!(gateway.resolve(&old).await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_token_without_iat_or_with_long_lifetime() {
        let gateway = JwtIdentityGateway::new(SECRET);
        let now = Utc::now().timestamp();
        let mint = |iat: Option<f64>, exp: i64| {
            let claims = Claims {
                sub: "user-1".to_string(),
                email: String::new(),
                exp,
                iat,
            };
            encode(&Header::new(Algorithm::HS256), &claims, &gateway.encoding_key).unwrap()
        };

        let no_iat = mint(None, now + 60);
        assert!(matches!(gateway.resolve(&no_iat).await, Err(AuthError::InvalidToken(_))));

        let forever = mint(Some(now as f64), now + MAX_TOKEN_LIFETIME_SECS + 60);
        assert!(matches!(gateway.resolve(&forever).await, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_cutoffs_are_forgotten() {
        let now_ms = Utc::now().timestamp_millis();
        let mut presence = Presence::default();
        presence
            .signed_out_at
            .insert(UserId::new("stale"), now_ms - MAX_TOKEN_LIFETIME_SECS * 1000 - 1);
        presence.signed_out_at.insert(UserId::new("recent"), now_ms - 1000);

        presence.forget_expired_cutoffs(now_ms);
        assert!(!presence.signed_out_at.contains_key(&UserId::new("stale")));
        assert!(presence.signed_out_at.contains_key(&UserId::new("recent")));
    }
}
