//! Owns every open editor session, one per user.
//!
//! Sessions sit behind their own `tokio::sync::Mutex`; callers lock, take a ticket,
//! release, call the gateway, then lock again to complete. The registry map itself is
//! only locked long enough to look up, insert or remove an entry.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::sections::EditorKind;
use super::session::EditorSession;
use crate::identity::{AuthUser, IdentityEvent, UserId};

pub type SharedSession = Arc<Mutex<EditorSession>>;

#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<UserId, SharedSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a fresh session for `user`, tearing down any session they already had.
    pub async fn open(&self, user: AuthUser, kind: EditorKind) -> SharedSession {
        let user_id = user.id.clone();
        let session = Arc::new(Mutex::new(EditorSession::new(user, kind)));
        let previous = self
            .sessions
            .write()
            .await
            .insert(user_id.clone(), session.clone());

        if let Some(previous) = previous {
            previous.lock().await.teardown();
            info!(user_id = %user_id, "Replaced existing editor session");
        }
        session
    }

    pub async fn get(&self, user_id: &UserId) -> Option<SharedSession> {
        self.sessions.read().await.get(user_id).cloned()
    }

    /// Removes and tears down the user's session. Returns `false` if there was none.
    pub async fn close(&self, user_id: &UserId) -> bool {
        let removed = self.sessions.write().await.remove(user_id);
        match removed {
            Some(session) => {
                session.lock().await.teardown();
                info!(user_id = %user_id, "Editor session closed");
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Closes a user's session whenever the identity gateway reports they signed out.
    pub fn spawn_identity_listener(
        self: Arc<Self>,
        mut events: broadcast::Receiver<IdentityEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(IdentityEvent::SignedOut(user_id)) => {
                        self.close(&user_id).await;
                    }
                    Ok(IdentityEvent::SignedIn(_)) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Identity listener lagged; some events were dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
