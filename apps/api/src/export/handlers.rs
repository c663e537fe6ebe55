use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

use super::page_fill::{analyze_page_fill, recommend_fill_action, FillAction, PageFillAnalysis};
use super::photo::PhotoSource;
use super::{download_file_name, export_with_photo};
use crate::editor::service::current_document;
use crate::errors::AppError;
use crate::identity::middleware::CurrentUser;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFitResponse {
    pub page_count: usize,
    pub analysis: PageFillAnalysis,
    pub action: FillAction,
}

/// GET /api/v1/export/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    let doc = current_document(&state.sessions, state.profiles.as_ref(), &user).await?;
    let export = export_with_photo(&state.http, &doc, &PhotoSource::from_config(&state.config)).await?;
    info!(user_id = %user.id, pages = export.page_count, "PDF exported");

    let disposition = format!("attachment; filename=\"{}\"", download_file_name(&doc));
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.bytes,
    )
        .into_response())
}

/// GET /api/v1/export/pdf/fit
pub async fn handle_page_fit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<PageFitResponse>, AppError> {
    let doc = current_document(&state.sessions, state.profiles.as_ref(), &user).await?;
    let export = export_with_photo(&state.http, &doc, &PhotoSource::from_config(&state.config)).await?;
    let analysis = analyze_page_fill(export.used_height, export.available_height);
    let action = recommend_fill_action(&analysis, &doc);
    Ok(Json(PageFitResponse {
        page_count: export.page_count,
        analysis,
        action,
    }))
}
