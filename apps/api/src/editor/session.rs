//! Editor session: one user's in-memory working copy of their profile document.
//!
//! Every asynchronous gateway call is split in two: `begin_*` marks the operation in
//! flight and hands out a `Ticket`, `complete_*` applies the result. A completion is
//! applied only if its ticket is still current: `teardown` and a fresh `begin_load`
//! both advance the session epoch, so late results from an abandoned view or an
//! older load are dropped instead of overwriting newer state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use super::commands::{apply_all, EditCommand, EditError};
use super::sections::{EditorKind, Section, SectionCursor};
use crate::identity::AuthUser;
use crate::models::profile::ProfileDocument;
use crate::storage::blob::BlobError;
use crate::storage::StoreError;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load profile";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save profile. Please try again.";
pub const UPLOAD_FAILED_MESSAGE: &str = "Image upload failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    LoadFailed,
    SaveFailed,
    UploadFailed,
}

/// Inline, user-visible error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

/// Which in-flight flag a ticket was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flight {
    Load,
    Save,
    Upload,
}

/// Proof that a gateway call was started against a particular session epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    session_id: Uuid,
    epoch: u64,
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("editor session is closed")]
    Closed,

    #[error("profile is still loading")]
    Loading,

    #[error("a save is already in progress")]
    SaveInFlight,

    #[error("an image upload is already in progress")]
    UploadInFlight,

    #[error(transparent)]
    Edit(#[from] EditError),
}

#[derive(Debug)]
pub struct EditorSession {
    id: Uuid,
    epoch: u64,
    user: AuthUser,
    kind: EditorKind,
    document: ProfileDocument,
    cursor: SectionCursor,
    closed: bool,
    loading: bool,
    saving: bool,
    uploading: bool,
    notice: Option<Notice>,
    last_saved_at: Option<DateTime<Utc>>,
}

/// Serializable view of a session for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub kind: EditorKind,
    pub document: ProfileDocument,
    pub section: Section,
    pub sections: Vec<Section>,
    pub next_section: Option<Section>,
    pub loading: bool,
    pub saving: bool,
    pub uploading: bool,
    pub notice: Option<Notice>,
    pub last_saved_at: Option<DateTime<Utc>>,
}

impl EditorSession {
    /// A session starts on the first section with a blank document until a load completes.
    pub fn new(user: AuthUser, kind: EditorKind) -> Self {
        let document = ProfileDocument::blank_for(&user.email);
        Self {
            id: Uuid::new_v4(),
            epoch: 0,
            user,
            kind,
            document,
            cursor: SectionCursor::new(kind.sections()),
            closed: false,
            loading: false,
            saving: false,
            uploading: false,
            notice: None,
            last_saved_at: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user(&self) -> &AuthUser {
        &self.user
    }

    pub fn document(&self) -> &ProfileDocument {
        &self.document
    }

    pub fn cursor(&self) -> &SectionCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut SectionCursor {
        &mut self.cursor
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            kind: self.kind,
            document: self.document.clone(),
            section: self.cursor.current(),
            sections: self.cursor.order().to_vec(),
            next_section: self.cursor.upcoming(),
            loading: self.loading,
            saving: self.saving,
            uploading: self.uploading,
            notice: self.notice.clone(),
            last_saved_at: self.last_saved_at,
        }
    }

    fn ticket(&self) -> Ticket {
        Ticket {
            session_id: self.id,
            epoch: self.epoch,
        }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        !self.closed && ticket.session_id == self.id && ticket.epoch == self.epoch
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.closed {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }

    // ── Edits ───────────────────────────────────────────────────────────────

    /// Applies a batch of edit commands atomically to the working copy.
    pub fn apply(&mut self, commands: &[EditCommand]) -> Result<(), SessionError> {
        self.ensure_open()?;
        if self.loading {
            return Err(SessionError::Loading);
        }
        self.document = apply_all(&self.document, commands)?;
        Ok(())
    }

    // ── Load ────────────────────────────────────────────────────────────────

    /// Starts a (re)load. Any load already in flight becomes stale.
    pub fn begin_load(&mut self) -> Result<Ticket, SessionError> {
        self.ensure_open()?;
        self.epoch += 1;
        self.loading = true;
        Ok(self.ticket())
    }

    /// Returns `false` when the completion was stale and ignored.
    pub fn complete_load(
        &mut self,
        ticket: Ticket,
        result: Result<Option<ProfileDocument>, StoreError>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(session_id = %self.id, "Discarding stale load completion");
            return false;
        }
        self.loading = false;
        match result {
            Ok(Some(document)) => {
                self.document = document;
                self.clear_notice(NoticeKind::LoadFailed);
            }
            Ok(None) => {
                self.document = ProfileDocument::blank_for(&self.user.email);
                self.clear_notice(NoticeKind::LoadFailed);
            }
            Err(e) => {
                warn!(user_id = %self.user.id, error = %e, "Profile load failed");
                self.document = ProfileDocument::blank_for(&self.user.email);
                self.notice = Some(Notice::new(NoticeKind::LoadFailed, LOAD_FAILED_MESSAGE));
            }
        }
        true
    }

    // ── Save ────────────────────────────────────────────────────────────────

    /// Starts a save of the document as it is right now. Edits made while the save is in
    /// flight stay in the session but are not part of this save.
    pub fn begin_save(&mut self) -> Result<(Ticket, ProfileDocument), SessionError> {
        self.ensure_open()?;
        if self.loading {
            return Err(SessionError::Loading);
        }
        if self.saving {
            return Err(SessionError::SaveInFlight);
        }
        self.saving = true;
        Ok((self.ticket(), self.document.clone()))
    }

    pub fn complete_save(&mut self, ticket: Ticket, result: Result<(), StoreError>) -> bool {
        if !self.is_current(ticket) {
            debug!(session_id = %self.id, "Discarding stale save completion");
            return false;
        }
        self.saving = false;
        match result {
            Ok(()) => {
                self.last_saved_at = Some(Utc::now());
                self.clear_notice(NoticeKind::SaveFailed);
            }
            Err(e) => {
                warn!(user_id = %self.user.id, error = %e, "Profile save failed");
                self.notice = Some(Notice::new(NoticeKind::SaveFailed, SAVE_FAILED_MESSAGE));
            }
        }
        true
    }

    // ── Image upload ────────────────────────────────────────────────────────

    pub fn begin_upload(&mut self) -> Result<Ticket, SessionError> {
        self.ensure_open()?;
        if self.uploading {
            return Err(SessionError::UploadInFlight);
        }
        self.uploading = true;
        Ok(self.ticket())
    }

    /// On success the URL replaces `basics.image`; on failure the previous image stays.
    pub fn complete_upload(&mut self, ticket: Ticket, result: Result<String, BlobError>) -> bool {
        if !self.is_current(ticket) {
            debug!(session_id = %self.id, "Discarding stale upload completion");
            return false;
        }
        self.uploading = false;
        match result {
            Ok(url) => {
                self.document.basics.image = Some(url);
                self.clear_notice(NoticeKind::UploadFailed);
            }
            Err(e) => {
                warn!(user_id = %self.user.id, error = %e, "Profile image upload failed");
                self.notice = Some(Notice::new(NoticeKind::UploadFailed, UPLOAD_FAILED_MESSAGE));
            }
        }
        true
    }

    // ── Lifecycle ───────────────────────────────────────────────────────────

    /// Closes the session; every outstanding ticket becomes stale.
    pub fn teardown(&mut self) {
        self.closed = true;
        self.epoch += 1;
        self.loading = false;
        self.saving = false;
        self.uploading = false;
    }

    /// Clears the flag of a call whose completion will never arrive because its caller
    /// went away. A stale ticket changes nothing.
    pub fn abandon(&mut self, ticket: Ticket, flight: Flight) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        match flight {
            Flight::Load => self.loading = false,
            Flight::Save => self.saving = false,
            Flight::Upload => self.uploading = false,
        }
        debug!(session_id = %self.id, ?flight, "Gateway call abandoned");
        true
    }

    fn clear_notice(&mut self, kind: NoticeKind) {
        if self.notice.as_ref().is_some_and(|n| n.kind == kind) {
            self.notice = None;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
