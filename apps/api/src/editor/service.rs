//! Drives a session's gateway calls without holding its lock across an await.

use tracing::{info, warn};

use super::registry::{SessionRegistry, SharedSession};
use super::session::{Flight, SessionError, Ticket};
use crate::identity::AuthUser;
use crate::models::profile::ProfileDocument;
use crate::storage::blob::{BlobStore, ImageUpload};
use crate::storage::{ProfileStore, StoreError};

/// Held across a gateway await. If the caller's future is dropped before the completion
/// is applied, the in-flight flag is cleared so the action can be retried.
struct InFlight {
    session: SharedSession,
    ticket: Ticket,
    flight: Flight,
    settled: bool,
}

impl InFlight {
    fn new(session: &SharedSession, ticket: Ticket, flight: Flight) -> Self {
        Self {
            session: session.clone(),
            ticket,
            flight,
            settled: false,
        }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let (ticket, flight) = (self.ticket, self.flight);
        if let Ok(mut guard) = self.session.try_lock() {
            guard.abandon(ticket, flight);
            return;
        }
        // Lock is busy; finish the cleanup once it frees up.
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let session = self.session.clone();
            runtime.spawn(async move {
                session.lock().await.abandon(ticket, flight);
            });
        }
    }
}

/// Loads the stored document into the session. Returns `false` if the session moved on
/// before the load came back.
pub async fn load_into(session: &SharedSession, store: &dyn ProfileStore) -> Result<bool, SessionError> {
    let (ticket, user_id) = {
        let mut guard = session.lock().await;
        (guard.begin_load()?, guard.user().id.clone())
    };
    let pending = InFlight::new(session, ticket, Flight::Load);
    let result = store.load(&user_id).await;
    let applied = session.lock().await.complete_load(ticket, result);
    pending.settle();
    Ok(applied)
}

/// Persists the document as it was when the save started. A failed write is reported
/// through the session notice, not as an `Err`.
pub async fn save_from(session: &SharedSession, store: &dyn ProfileStore) -> Result<bool, SessionError> {
    let (ticket, user_id, snapshot) = {
        let mut guard = session.lock().await;
        let (ticket, snapshot) = guard.begin_save()?;
        (ticket, guard.user().id.clone(), snapshot)
    };
    let pending = InFlight::new(session, ticket, Flight::Save);
    let result = store.save(&user_id, &snapshot).await;
    if result.is_ok() {
        info!(user_id = %user_id, "Profile saved from editor session");
    }
    let applied = session.lock().await.complete_save(ticket, result);
    pending.settle();
    Ok(applied)
}

/// Uploads a photo and writes its URL into `basics.image`.
pub async fn upload_image_into(
    session: &SharedSession,
    blobs: &dyn BlobStore,
    upload: ImageUpload,
) -> Result<bool, SessionError> {
    let (ticket, user_id) = {
        let mut guard = session.lock().await;
        (guard.begin_upload()?, guard.user().id.clone())
    };
    let pending = InFlight::new(session, ticket, Flight::Upload);
    let result = blobs.upload_image(&user_id, upload).await;
    let applied = session.lock().await.complete_upload(ticket, result);
    pending.settle();
    Ok(applied)
}

/// The stored document for `user`, or their blank default when nothing is stored or the
/// stored record can't be read back.
pub async fn stored_or_default(
    store: &dyn ProfileStore,
    user: &AuthUser,
) -> Result<ProfileDocument, StoreError> {
    match store.load(&user.id).await {
        Ok(Some(doc)) => Ok(doc),
        Ok(None) => Ok(ProfileDocument::blank_for(&user.email)),
        Err(e @ StoreError::Malformed { .. }) => {
            warn!(user_id = %user.id, error = %e, "Stored profile unreadable, using blank document");
            Ok(ProfileDocument::blank_for(&user.email))
        }
        Err(e) => Err(e),
    }
}

/// What previews and exports show: the open session's in-memory copy if the user has
/// one, else the stored document.
pub async fn current_document(
    sessions: &SessionRegistry,
    store: &dyn ProfileStore,
    user: &AuthUser,
) -> Result<ProfileDocument, StoreError> {
    if let Some(session) = sessions.get(&user.id).await {
        let guard = session.lock().await;
        if !guard.is_closed() {
            return Ok(guard.document().clone());
        }
    }
    stored_or_default(store, user).await
}
