use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{render_html, RenderOptions, TemplateId};
use crate::editor::service::current_document;
use crate::errors::AppError;
use crate::identity::middleware::CurrentUser;
use crate::identity::AuthUser;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: TemplateId,
    pub display_name: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateQuery {
    pub template_id: Option<String>,
}

async fn render_for(
    state: &AppState,
    user: &AuthUser,
    template_id: &str,
    options: &RenderOptions,
) -> Result<Html<String>, AppError> {
    let template: TemplateId = template_id.parse()?;
    let doc = current_document(&state.sessions, state.profiles.as_ref(), user).await?;
    Ok(Html(render_html(&doc, template, options)))
}

/// GET /api/v1/render/:template_id
pub async fn handle_render(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(template_id): Path<String>,
    Query(options): Query<RenderOptions>,
) -> Result<Html<String>, AppError> {
    render_for(&state, &user, &template_id, &options).await
}

/// GET /api/v1/render?templateId=
pub async fn handle_render_query(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<TemplateQuery>,
    Query(options): Query<RenderOptions>,
) -> Result<Html<String>, AppError> {
    let template_id = query
        .template_id
        .ok_or_else(|| AppError::Validation("Missing 'templateId' query parameter".to_string()))?;
    render_for(&state, &user, &template_id, &options).await
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateSummary>> {
    Json(
        TemplateId::ALL
            .into_iter()
            .map(|id| TemplateSummary {
                id,
                display_name: id.display_name(),
            })
            .collect(),
    )
}
