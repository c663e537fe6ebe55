use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{draft_cover_letter, CoverLetterDraft};
use crate::editor::service::current_document;
use crate::errors::AppError;
use crate::identity::middleware::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    pub job_description: String,
}

#[derive(Serialize)]
pub struct CoverLetterResponse {
    pub draft: CoverLetterDraft,
    pub text: String,
}

/// POST /api/v1/cover-letter
pub async fn handle_draft_cover_letter(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let llm = state.llm.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Cover letter drafting is not configured".to_string())
    })?;
    let doc = current_document(&state.sessions, state.profiles.as_ref(), &user).await?;
    let draft = draft_cover_letter(llm, &doc, &req.job_description).await?;
    let text = draft.to_text(doc.basics.name.trim());
    Ok(Json(CoverLetterResponse { draft, text }))
}
