//! Page Fill Analysis: does the exported resume fit one A4 page, and how well?
//!
//! The PDF layout reports how many points of vertical space its content consumed.
//! This module classifies that against one page and recommends a single edit.
//!
//! # Page fill rules
//! - Whitespace > 25%  → add content
//! - Overflow ≤ 5%     → tighten spacing
//! - Overflow > 5%     → trim highlights from the longest entry

use serde::{Deserialize, Serialize};

use crate::editor::commands::Collection;
use crate::models::profile::ProfileDocument;

/// Below this fill ratio a one-page resume looks unfinished.
const WHITESPACE_LIMIT: f32 = 0.25;
const MINOR_OVERFLOW_LIMIT: f32 = 1.05;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFillVerdict {
    /// 75–100% of the page used.
    Acceptable,
    /// Less than 75% used.
    TooMuchWhitespace,
    /// Up to 5% past the page.
    MinorOverflow,
    /// More than 5% past the page; content spills onto a second page.
    MajorOverflow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFillAnalysis {
    pub used_height_pt: f32,
    pub available_height_pt: f32,
    pub whitespace_fraction: f32,
    pub overflow_fraction: f32,
    pub verdict: PageFillVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FillAction {
    /// The page is sparse; fill in more experience, projects or a summary.
    AddContent,
    /// Drop highlights from the entry that has the most of them.
    TrimHighlights {
        collection: Collection,
        entry_index: usize,
        highlight_count: usize,
    },
    /// Shorten wording or spacing; the overflow is small.
    TightenSpacing,
    NoAction,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

pub fn analyze_page_fill(used_height_pt: f32, available_height_pt: f32) -> PageFillAnalysis {
    let fill_ratio = if available_height_pt > 0.0 {
        used_height_pt / available_height_pt
    } else {
        0.0
    };

    let whitespace_fraction = (1.0_f32 - fill_ratio).max(0.0);
    let overflow_fraction = (fill_ratio - 1.0_f32).max(0.0);

    let verdict = if fill_ratio > MINOR_OVERFLOW_LIMIT {
        PageFillVerdict::MajorOverflow
    } else if fill_ratio > 1.0 {
        PageFillVerdict::MinorOverflow
    } else if whitespace_fraction > WHITESPACE_LIMIT {
        PageFillVerdict::TooMuchWhitespace
    } else {
        PageFillVerdict::Acceptable
    };

    PageFillAnalysis {
        used_height_pt,
        available_height_pt,
        whitespace_fraction,
        overflow_fraction,
        verdict,
    }
}

pub fn recommend_fill_action(analysis: &PageFillAnalysis, doc: &ProfileDocument) -> FillAction {
    match analysis.verdict {
        PageFillVerdict::Acceptable => FillAction::NoAction,
        PageFillVerdict::TooMuchWhitespace => FillAction::AddContent,
        PageFillVerdict::MinorOverflow => FillAction::TightenSpacing,
        PageFillVerdict::MajorOverflow => match most_highlighted_entry(doc) {
            Some((collection, entry_index, highlight_count)) => FillAction::TrimHighlights {
                collection,
                entry_index,
                highlight_count,
            },
            None => FillAction::TightenSpacing,
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

/// Work or project entry with the most non-blank highlights. Ties go to the later entry,
/// which is usually the older job.
fn most_highlighted_entry(doc: &ProfileDocument) -> Option<(Collection, usize, usize)> {
    let count = |highlights: &[String]| highlights.iter().filter(|h| !h.trim().is_empty()).count();

    let work = doc
        .work
        .iter()
        .enumerate()
        .map(|(i, w)| (Collection::Work, i, count(&w.highlights)));
    let projects = doc
        .projects()
        .iter()
        .enumerate()
        .map(|(i, p)| (Collection::Projects, i, count(&p.highlights)));

    work.chain(projects)
        .filter(|(_, _, n)| *n > 1)
        .max_by_key(|(_, _, n)| *n)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
