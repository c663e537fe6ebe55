//! Cover letter drafting from the user's profile and a pasted job description.

pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmRequest};
use crate::models::profile::ProfileDocument;
use crate::render::selection::{select, ResumeView};
use prompts::{cover_letter_prompt, COVER_LETTER_SYSTEM};

/// Job ads longer than this are cut before prompting.
const MAX_JOB_DESCRIPTION_CHARS: usize = 12_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetterDraft {
    pub greeting: String,
    pub paragraphs: Vec<String>,
    pub closing: String,
}

impl CoverLetterDraft {
    pub fn to_text(&self, signature: &str) -> String {
        let mut out = format!("{}\n\n", self.greeting.trim());
        for paragraph in &self.paragraphs {
            out.push_str(paragraph.trim());
            out.push_str("\n\n");
        }
        out.push_str(self.closing.trim());
        if !signature.is_empty() {
            out.push('\n');
            out.push_str(signature);
        }
        out
    }
}

/// Plain-text summary of what the resume shows, for the prompt.
pub fn profile_digest(view: &ResumeView) -> String {
    let mut lines = Vec::new();
    lines.push(match &view.label {
        Some(label) => format!("Name: {} ({label})", view.name),
        None => format!("Name: {}", view.name),
    });
    if let Some(summary) = &view.summary {
        lines.push(format!("Summary: {summary}"));
    }
    for work in &view.experience {
        let role = [work.position.as_deref(), work.company.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" at ");
        lines.push(format!("Experience: {role} ({})", work.dates));
        if let Some(summary) = &work.summary {
            lines.push(format!("  {summary}"));
        }
        for highlight in &work.highlights {
            lines.push(format!("  - {highlight}"));
        }
    }
    for project in &view.projects {
        lines.push(format!(
            "Project: {}{}",
            project.name.as_deref().unwrap_or("(unnamed)"),
            project
                .description
                .as_ref()
                .map(|d| format!(": {d}"))
                .unwrap_or_default()
        ));
        if !project.keywords.is_empty() {
            lines.push(format!("  Technology: {}", project.keywords.join(", ")));
        }
    }
    for edu in &view.education {
        let what = [edu.degree.as_deref(), edu.institution.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Education: {what} ({})", edu.dates));
    }
    for skill in &view.skills {
        lines.push(format!(
            "Skills{}: {}",
            skill.name.as_ref().map(|n| format!(" ({n})")).unwrap_or_default(),
            skill.keywords.join(", ")
        ));
    }
    lines.join("\n")
}

fn clamp_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub async fn draft_cover_letter(
    llm: &LlmClient,
    doc: &ProfileDocument,
    job_description: &str,
) -> Result<CoverLetterDraft, AppError> {
    let job_description = job_description.trim();
    if job_description.is_empty() {
        return Err(AppError::Validation("jobDescription must not be empty".to_string()));
    }

    let view = select(doc);
    let prompt = cover_letter_prompt(
        &profile_digest(&view),
        clamp_chars(job_description, MAX_JOB_DESCRIPTION_CHARS),
    );
    let draft: CoverLetterDraft = llm.call_json(LlmRequest::new(COVER_LETTER_SYSTEM, &prompt)).await?;
    info!(paragraphs = draft.paragraphs.len(), "Cover letter drafted");
    Ok(draft)
}
