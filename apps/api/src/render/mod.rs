//! Template renderer.
//!
//! ```text
//! ProfileDocument ──select──▶ ResumeView ──layout(template)──▶ Node ──to_html──▶ String
//! ```
//!
//! Layouts are pure functions of the view and the render options, so rendering the same
//! document twice yields identical output.

pub mod format;
pub mod handlers;
pub mod macchiato;
pub mod node;
pub mod one_page_plus;
pub mod rick_osborne;
pub mod selection;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::profile::ProfileDocument;
use node::Node;
use selection::{select, Link, SectionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateId {
    #[serde(rename = "macchiato")]
    Macchiato,
    #[serde(rename = "one-page-plus")]
    OnePagePlus,
    #[serde(rename = "rickosborne")]
    RickOsborne,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [
        TemplateId::Macchiato,
        TemplateId::OnePagePlus,
        TemplateId::RickOsborne,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Macchiato => "macchiato",
            TemplateId::OnePagePlus => "one-page-plus",
            TemplateId::RickOsborne => "rickosborne",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateId::Macchiato => "Macchiato",
            TemplateId::OnePagePlus => "One Page Plus",
            TemplateId::RickOsborne => "Rick Osborne",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown template '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    /// Render links as plain text (used for print/preview captures).
    #[serde(default)]
    pub disable_links: bool,
}

pub fn render(doc: &ProfileDocument, template: TemplateId, options: &RenderOptions) -> Node {
    let view = select(doc);
    match template {
        TemplateId::Macchiato => macchiato::layout(&view, options),
        TemplateId::OnePagePlus => one_page_plus::layout(&view, options),
        TemplateId::RickOsborne => rick_osborne::layout(&view, options),
    }
}

pub fn render_html(doc: &ProfileDocument, template: TemplateId, options: &RenderOptions) -> String {
    render(doc, template, options).to_html()
}

// ────────────────────────────────────────────────────────────────────────────
// Shared layout pieces
// ────────────────────────────────────────────────────────────────────────────

/// An anchor, or a plain span when links are disabled.
pub(crate) fn anchor(href: &str, label: &str, class: &str, options: &RenderOptions) -> Node {
    if options.disable_links {
        return Node::el("span").class(class).with_text(label);
    }
    let node = Node::el("a").class(class).attr("href", href);
    let node = if href.starts_with("mailto:") {
        node
    } else {
        node.attr("target", "_blank").attr("rel", "noopener noreferrer")
    };
    node.with_text(label)
}

pub(crate) fn link_node(link: &Link, class: &str, options: &RenderOptions) -> Node {
    anchor(&link.href, &link.display, class, options)
}

/// Entry title that links when a URL is present.
pub(crate) fn maybe_linked(label: &str, url: Option<&str>, class: &str, options: &RenderOptions) -> Node {
    match url {
        Some(href) => anchor(href, label, class, options),
        None => Node::el("span").class(class).with_text(label),
    }
}

pub(crate) fn bullet_list(items: &[String], class: &str) -> Option<Node> {
    if items.is_empty() {
        return None;
    }
    Some(
        Node::el("ul")
            .class(class)
            .children(items.iter().map(|item| Node::el("li").with_text(item.as_str()))),
    )
}

pub(crate) fn section_root(kind: SectionKind, class: &str) -> Node {
    Node::el("section").class(class).section(kind.key())
}

pub(crate) fn profile_image(image: Option<&str>, name: &str, class: &str) -> Option<Node> {
    image.map(|src| {
        Node::el("img")
            .class(class)
            .attr("src", src)
            .attr("alt", format!("{name}'s profile"))
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
