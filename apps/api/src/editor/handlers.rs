use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use super::commands::EditCommand;
use super::registry::SharedSession;
use super::sections::{EditorKind, Section};
use super::service::{load_into, save_from, stored_or_default, upload_image_into};
use super::session::SessionSnapshot;
use crate::errors::AppError;
use crate::identity::middleware::CurrentUser;
use crate::identity::AuthUser;
use crate::models::profile::ProfileDocument;
use crate::state::AppState;
use crate::storage::blob::ImageUpload;

/// Multipart field that carries the photo.
const IMAGE_FIELD: &str = "file";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest {
    #[serde(default)]
    pub kind: EditorKind,
}

#[derive(Debug, Deserialize)]
pub struct CommandBatch {
    pub commands: Vec<EditCommand>,
}

#[derive(Debug, Deserialize)]
pub struct GoToSectionRequest {
    pub section: Section,
}

async fn open_session_for(state: &AppState, user: &AuthUser) -> Result<SharedSession, AppError> {
    state
        .sessions
        .get(&user.id)
        .await
        .ok_or_else(|| AppError::NotFound("No editor session is open".to_string()))
}

async fn snapshot_of(session: &SharedSession) -> SessionSnapshot {
    session.lock().await.snapshot()
}

// ────────────────────────────────────────────────────────────────────────────
// Stored profile
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ProfileDocument>, AppError> {
    Ok(Json(stored_or_default(state.profiles.as_ref(), &user).await?))
}

/// PUT /api/v1/profile
pub async fn handle_put_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(doc): Json<ProfileDocument>,
) -> Result<Json<ProfileDocument>, AppError> {
    state.profiles.save(&user.id, &doc).await?;
    info!(user_id = %user.id, "Profile replaced");
    Ok(Json(doc))
}

// ────────────────────────────────────────────────────────────────────────────
// Session lifecycle
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/editor/session
pub async fn handle_open_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: Option<Json<OpenSessionRequest>>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let kind = body.map(|Json(req)| req.kind).unwrap_or_default();
    let session = state.sessions.open(user.clone(), kind).await;
    load_into(&session, state.profiles.as_ref()).await?;
    info!(user_id = %user.id, ?kind, "Editor session opened");
    Ok((StatusCode::CREATED, Json(snapshot_of(&session).await)))
}

/// GET /api/v1/editor/session
pub async fn handle_get_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = open_session_for(&state, &user).await?;
    Ok(Json(snapshot_of(&session).await))
}

/// DELETE /api/v1/editor/session
pub async fn handle_close_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, AppError> {
    if state.sessions.close(&user.id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("No editor session is open".to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Editing and navigation
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/editor/commands
pub async fn handle_apply_commands(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(batch): Json<CommandBatch>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = open_session_for(&state, &user).await?;
    let mut guard = session.lock().await;
    guard.apply(&batch.commands)?;
    Ok(Json(guard.snapshot()))
}

/// POST /api/v1/editor/section/next
pub async fn handle_next_section(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = open_session_for(&state, &user).await?;
    let mut guard = session.lock().await;
    guard.cursor_mut().next();
    Ok(Json(guard.snapshot()))
}

/// POST /api/v1/editor/section/previous
pub async fn handle_previous_section(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = open_session_for(&state, &user).await?;
    let mut guard = session.lock().await;
    guard.cursor_mut().previous();
    Ok(Json(guard.snapshot()))
}

/// POST /api/v1/editor/section/restart
pub async fn handle_restart_sections(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = open_session_for(&state, &user).await?;
    let mut guard = session.lock().await;
    guard.cursor_mut().restart();
    Ok(Json(guard.snapshot()))
}

/// POST /api/v1/editor/section/go-to
pub async fn handle_go_to_section(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<GoToSectionRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = open_session_for(&state, &user).await?;
    let mut guard = session.lock().await;
    if !guard.cursor_mut().go_to(req.section) {
        return Err(AppError::Validation(format!(
            "Section '{}' is not part of this editor",
            req.section.title()
        )));
    }
    Ok(Json(guard.snapshot()))
}

// ────────────────────────────────────────────────────────────────────────────
// Gateway-backed actions
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/editor/save
pub async fn handle_save(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = open_session_for(&state, &user).await?;
    save_from(&session, state.profiles.as_ref()).await?;
    Ok(Json(snapshot_of(&session).await))
}

/// POST /api/v1/editor/image
pub async fn handle_upload_image(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = open_session_for(&state, &user).await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("image").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid file: {e}")))?;
        upload = Some(ImageUpload {
            file_name,
            content_type,
            bytes,
        });
        break;
    }

    let upload = upload.ok_or_else(|| AppError::Validation(format!("Missing '{IMAGE_FIELD}' field")))?;
    if upload.bytes.len() > state.config.max_image_bytes {
        return Err(AppError::Validation(format!(
            "Image exceeds the {} byte limit",
            state.config.max_image_bytes
        )));
    }

    info!(user_id = %user.id, size = upload.bytes.len(), "Uploading profile image");
    upload_image_into(&session, state.blobs.as_ref(), upload).await?;
    Ok(Json(snapshot_of(&session).await))
}

/// POST /api/v1/auth/sign-out
pub async fn handle_sign_out(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> StatusCode {
    state.identity.sign_out(&user.id).await;
    state.sessions.close(&user.id).await;
    StatusCode::NO_CONTENT
}
