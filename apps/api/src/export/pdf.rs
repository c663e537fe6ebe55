//! PDF export: the profile laid out on fixed A4 pages with the base-14 Helvetica fonts.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Name                                  ┌────┐ │
//! │ Headline                              │img │ │
//! │ email | phone | city | website        └────┘ │
//! │ LinkedIn: ... | Github: ...                  │
//! │ - - - - - - - - - - - - - - - - - - - - - - -│
//! │ SUMMARY   │ wrapped text                     │
//! │ - - - - - - - - - - - - - - - - - - - - - - -│
//! │ EXPERIENCE│ Position, Company        dates   │
//! │           │ • highlight                      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Section order follows the one-page-plus template. The label column is 20% of the
//! inner width and the content column the rest. Text is wrapped with the AFM widths in
//! `font_metrics`, so no font files are read or embedded. Content past the bottom
//! padding continues on a fresh page.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, StringFormat, Stream};
use thiserror::Error;
use tracing::debug;

use super::font_metrics::{metrics, PdfFont};
use crate::models::profile::ProfileDocument;
use crate::render::selection::{select, ResumeView, SectionKind};

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const PADDING: f32 = 32.0;

const INNER_WIDTH: f32 = PAGE_WIDTH - 2.0 * PADDING;
const LABEL_WIDTH: f32 = INNER_WIDTH * 0.2;
const BODY_X: f32 = PADDING + LABEL_WIDTH;
const BODY_WIDTH: f32 = INNER_WIDTH - LABEL_WIDTH;

const NAME_SIZE: f32 = 14.0;
const HEADLINE_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 10.0;
const BODY_SIZE: f32 = 9.0;
const ASIDE_SIZE: f32 = 8.5;
const LABEL_SIZE: f32 = 9.0;
const LINE_SPACING: f32 = 1.3;

const SECTION_GAP: f32 = 10.0;
const RULE_GAP: f32 = 8.0;
const ENTRY_GAP: f32 = 6.0;
const PHOTO_SIZE: f32 = 60.0;
const PHOTO_GAP: f32 = 12.0;

const BULLET: &str = "• ";
const SEPARATOR: &str = "  |  ";
const IMAGE_NAME: &str = "Im1";

/// Sections below the header, in print order.
const PDF_SECTIONS: [SectionKind; 7] = [
    SectionKind::Summary,
    SectionKind::Skills,
    SectionKind::Experience,
    SectionKind::Projects,
    SectionKind::Education,
    SectionKind::Languages,
    SectionKind::AdditionalInformation,
];

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF assembly failed: {0}")]
    Lopdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Decoded photo, 8-bit RGB, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct PdfExport {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Vertical space the content consumed, counting every page before the last as full.
    pub used_height: f32,
    /// Space inside the padding of a single page.
    pub available_height: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Lays out `doc` and serializes it. The photo must already be fetched and decoded;
/// this function does no I/O.
pub fn export_pdf(doc: &ProfileDocument, photo: Option<&EmbeddedImage>) -> Result<PdfExport, PdfError> {
    let view = select(doc);
    let mut writer = PageWriter::new();

    writer.place_header(&view, photo.is_some());
    for kind in PDF_SECTIONS {
        if !view.has(kind) {
            continue;
        }
        let block = section_block(&view, kind);
        writer.place_section(&kind.title().to_uppercase(), &block);
    }

    let used_height = writer.used;
    let pages = writer.finish();
    let page_count = pages.len();
    let bytes = assemble(pages, photo)?;

    debug!(page_count, used_height, bytes = bytes.len(), "PDF laid out");
    Ok(PdfExport {
        bytes,
        page_count,
        used_height,
        available_height: PAGE_HEIGHT - 2.0 * PADDING,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Section content
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Line {
    font: PdfFont,
    size: f32,
    gray: f32,
    text: String,
    indent: f32,
    link: Option<String>,
    /// Right-aligned note on the same baseline (entry dates).
    aside: Option<String>,
    space_before: f32,
}

impl Line {
    fn height(&self) -> f32 {
        self.size * LINE_SPACING
    }
}

/// Wrapped lines for the content column of one section.
#[derive(Debug, Default)]
struct Block {
    lines: Vec<Line>,
}

impl Block {
    fn push(&mut self, mut line: Line) {
        if self.lines.is_empty() {
            line.space_before = 0.0;
        }
        self.lines.push(line);
    }

    fn paragraph(&mut self, text: &str, gray: f32, space_before: f32) {
        let wrapped = metrics(PdfFont::Helvetica).wrap(text, BODY_SIZE, BODY_WIDTH);
        for (i, text) in wrapped.into_iter().enumerate() {
            self.push(Line {
                font: PdfFont::Helvetica,
                size: BODY_SIZE,
                gray,
                text,
                indent: 0.0,
                link: None,
                aside: None,
                space_before: if i == 0 { space_before } else { 0.0 },
            });
        }
    }

    /// Bold entry heading, linked when `link` is set, with optional right-aligned dates.
    fn title(&mut self, title: &str, link: Option<&str>, aside: Option<&str>, space_before: f32) {
        let aside_width = aside
            .map(|a| metrics(PdfFont::Helvetica).measure(a, ASIDE_SIZE) + 8.0)
            .unwrap_or(0.0);
        let wrapped = metrics(PdfFont::HelveticaBold).wrap(title, TITLE_SIZE, BODY_WIDTH - aside_width);
        for (i, text) in wrapped.into_iter().enumerate() {
            self.push(Line {
                font: PdfFont::HelveticaBold,
                size: TITLE_SIZE,
                gray: 0.0,
                link: link.filter(|_| !text.is_empty()).map(str::to_string),
                text,
                indent: 0.0,
                aside: if i == 0 { aside.map(str::to_string) } else { None },
                space_before: if i == 0 { space_before } else { 0.0 },
            });
        }
    }

    fn bullets(&mut self, items: &[String]) {
        let table = metrics(PdfFont::Helvetica);
        let hang = table.measure(BULLET, BODY_SIZE);
        for item in items {
            let wrapped = table.wrap(item, BODY_SIZE, BODY_WIDTH - hang);
            for (i, text) in wrapped.into_iter().enumerate() {
                let (text, indent) = if i == 0 {
                    (format!("{BULLET}{text}"), 0.0)
                } else {
                    (text, hang)
                };
                self.push(Line {
                    font: PdfFont::Helvetica,
                    size: BODY_SIZE,
                    gray: 0.0,
                    text,
                    indent,
                    link: None,
                    aside: None,
                    space_before: if i == 0 { 1.5 } else { 0.0 },
                });
            }
        }
    }
}

fn joined(parts: [Option<&str>; 2], separator: &str) -> String {
    parts.into_iter().flatten().collect::<Vec<_>>().join(separator)
}

fn section_block(view: &ResumeView, kind: SectionKind) -> Block {
    let mut block = Block::default();
    match kind {
        SectionKind::Summary => {
            if let Some(summary) = &view.summary {
                block.paragraph(summary, 0.0, 0.0);
            }
        }
        SectionKind::Skills => {
            for skill in &view.skills {
                let name = match (&skill.name, &skill.level) {
                    (Some(name), Some(level)) => Some(format!("{name} ({level})")),
                    (Some(name), None) => Some(name.clone()),
                    (None, _) => None,
                };
                let keywords = skill.keywords.join(", ");
                let line = match name {
                    Some(name) if keywords.is_empty() => name,
                    Some(name) => format!("{name}: {keywords}"),
                    None => keywords,
                };
                block.paragraph(&line, 0.0, 2.0);
            }
        }
        SectionKind::Experience => {
            for work in &view.experience {
                let title = joined([work.position.as_deref(), work.company.as_deref()], ", ");
                block.title(&title, work.company_url.as_deref(), Some(&work.dates), ENTRY_GAP);
                if let Some(summary) = &work.summary {
                    block.paragraph(summary, 0.0, 1.5);
                }
                block.bullets(&work.highlights);
            }
        }
        SectionKind::Projects => {
            for project in &view.projects {
                block.title(
                    project.name.as_deref().unwrap_or_default(),
                    project.url.as_deref(),
                    None,
                    ENTRY_GAP,
                );
                if let Some(description) = &project.description {
                    block.paragraph(description, 0.0, 1.5);
                }
                if !project.keywords.is_empty() {
                    block.paragraph(&format!("Technologies: {}", project.keywords.join(", ")), 0.35, 1.5);
                }
                block.bullets(&project.highlights);
            }
        }
        SectionKind::Education => {
            for edu in &view.education {
                let (heading, detail) = match (&edu.institution, &edu.degree) {
                    (Some(institution), degree) => (institution.as_str(), degree.as_deref()),
                    (None, degree) => (degree.as_deref().unwrap_or_default(), None),
                };
                block.title(heading, edu.url.as_deref(), Some(&edu.dates), ENTRY_GAP);
                if let Some(detail) = detail {
                    block.paragraph(detail, 0.0, 1.5);
                }
                if let Some(score) = &edu.score {
                    block.paragraph(&format!("Score: {score}"), 0.35, 1.5);
                }
                if !edu.courses.is_empty() {
                    block.paragraph(&format!("Courses: {}", edu.courses.join(", ")), 0.35, 1.5);
                }
            }
        }
        SectionKind::Languages => {
            let languages = view
                .languages
                .iter()
                .map(|l| match &l.fluency {
                    Some(fluency) => format!("{} ({fluency})", l.language),
                    None => l.language.clone(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            block.paragraph(&languages, 0.0, 0.0);
        }
        SectionKind::AdditionalInformation => {
            if let Some(info) = &view.additional_information {
                block.paragraph(info, 0.0, 0.0);
            }
        }
        SectionKind::Contact | SectionKind::Profiles => {}
    }
    block
}

// ────────────────────────────────────────────────────────────────────────────
// Page writer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct PageOps {
    operations: Vec<Operation>,
    /// `[x1, y1, x2, y2]` rectangles with their target URI.
    links: Vec<([f32; 4], String)>,
}

/// Places content top-down. `cursor` is the y of the next free line top, in PDF user
/// space (origin bottom-left).
struct PageWriter {
    finished: Vec<PageOps>,
    current: PageOps,
    cursor: f32,
    used: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            finished: Vec::new(),
            current: PageOps::default(),
            cursor: PAGE_HEIGHT - PADDING,
            used: 0.0,
        }
    }

    fn page_index(&self) -> usize {
        self.finished.len()
    }

    fn at_page_top(&self) -> bool {
        self.cursor >= PAGE_HEIGHT - PADDING
    }

    fn remaining(&self) -> f32 {
        self.cursor - PADDING
    }

    fn new_page(&mut self) {
        self.used += self.remaining().max(0.0);
        self.finished.push(std::mem::take(&mut self.current));
        self.cursor = PAGE_HEIGHT - PADDING;
    }

    /// Starts a new page unless `height` still fits. A fresh page always accepts.
    fn ensure(&mut self, height: f32) {
        if height > self.remaining() && !self.at_page_top() {
            self.new_page();
        }
    }

    fn advance(&mut self, height: f32) {
        self.cursor -= height;
        self.used += height;
    }

    fn finish(mut self) -> Vec<PageOps> {
        self.finished.push(self.current);
        self.finished
    }

    fn text(&mut self, x: f32, baseline: f32, font: PdfFont, size: f32, gray: f32, text: &str) {
        let ops = &mut self.current.operations;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("g", vec![gray.into()]));
        ops.push(Operation::new("Tf", vec![font.resource_name().into(), size.into()]));
        ops.push(Operation::new("Td", vec![x.into(), baseline.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    fn link(&mut self, x: f32, baseline: f32, width: f32, size: f32, uri: &str) {
        self.current
            .links
            .push(([x, baseline - 2.0, x + width, baseline + size], uri.to_string()));
    }

    fn dashed_rule(&mut self) {
        let y = self.cursor;
        let ops = &mut self.current.operations;
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new("G", vec![0.6_f32.into()]));
        ops.push(Operation::new("w", vec![0.5_f32.into()]));
        ops.push(Operation::new(
            "d",
            vec![Object::Array(vec![3.into(), 2.into()]), 0.into()],
        ));
        ops.push(Operation::new("m", vec![PADDING.into(), y.into()]));
        ops.push(Operation::new("l", vec![(PAGE_WIDTH - PADDING).into(), y.into()]));
        ops.push(Operation::new("S", vec![]));
        ops.push(Operation::new("Q", vec![]));
    }

    fn image(&mut self, x: f32, y: f32, size: f32) {
        let ops = &mut self.current.operations;
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "cm",
            vec![size.into(), 0.into(), 0.into(), size.into(), x.into(), y.into()],
        ));
        ops.push(Operation::new("Do", vec![IMAGE_NAME.into()]));
        ops.push(Operation::new("Q", vec![]));
    }

    fn place_line(&mut self, x: f32, width: f32, line: &Line) {
        self.ensure(line.space_before + line.height());
        if !self.at_page_top() {
            self.advance(line.space_before);
        }
        let baseline = self.cursor - line.size;
        let x = x + line.indent;
        self.text(x, baseline, line.font, line.size, line.gray, &line.text);
        if let Some(uri) = &line.link {
            let text_width = metrics(line.font).measure(&line.text, line.size);
            self.link(x, baseline, text_width, line.size, uri);
        }
        if let Some(aside) = &line.aside {
            let aside_width = metrics(PdfFont::Helvetica).measure(aside, ASIDE_SIZE);
            self.text(x + width - aside_width, baseline, PdfFont::Helvetica, ASIDE_SIZE, 0.35, aside);
        }
        self.advance(line.height());
    }

    /// Text runs on one baseline separated by `SEPARATOR`, wrapping between runs.
    fn place_runs(&mut self, runs: &[(String, Option<String>)], width: f32) {
        if runs.is_empty() {
            return;
        }
        let table = metrics(PdfFont::Helvetica);
        let height = BODY_SIZE * LINE_SPACING;
        let separator_width = table.measure(SEPARATOR, BODY_SIZE);

        self.ensure(height);
        let mut x = PADDING;
        for (i, (text, link)) in runs.iter().enumerate() {
            let run_width = table.measure(text, BODY_SIZE);
            if i > 0 {
                if x + separator_width + run_width > PADDING + width {
                    self.advance(height);
                    x = PADDING;
                } else {
                    let baseline = self.cursor - BODY_SIZE;
                    self.text(x, baseline, PdfFont::Helvetica, BODY_SIZE, 0.6, SEPARATOR);
                    x += separator_width;
                }
            }
            let baseline = self.cursor - BODY_SIZE;
            self.text(x, baseline, PdfFont::Helvetica, BODY_SIZE, 0.2, text);
            if let Some(uri) = link {
                self.link(x, baseline, run_width, BODY_SIZE, uri);
            }
            x += run_width;
        }
        self.advance(height);
    }

    fn place_header(&mut self, view: &ResumeView, with_photo: bool) {
        let top = self.cursor;
        let width = if with_photo {
            INNER_WIDTH - PHOTO_SIZE - PHOTO_GAP
        } else {
            INNER_WIDTH
        };
        if with_photo {
            self.image(PAGE_WIDTH - PADDING - PHOTO_SIZE, top - PHOTO_SIZE, PHOTO_SIZE);
        }

        let mut heading = Block::default();
        if !view.name.is_empty() {
            for text in metrics(PdfFont::HelveticaBold).wrap(&view.name, NAME_SIZE, width) {
                heading.push(Line {
                    font: PdfFont::HelveticaBold,
                    size: NAME_SIZE,
                    gray: 0.0,
                    text,
                    indent: 0.0,
                    link: None,
                    aside: None,
                    space_before: 0.0,
                });
            }
        }
        if let Some(label) = &view.label {
            for text in metrics(PdfFont::Helvetica).wrap(label, HEADLINE_SIZE, width) {
                heading.push(Line {
                    font: PdfFont::Helvetica,
                    size: HEADLINE_SIZE,
                    gray: 0.3,
                    text,
                    indent: 0.0,
                    link: None,
                    aside: None,
                    space_before: 0.0,
                });
            }
        }
        for line in &heading.lines {
            self.place_line(PADDING, width, line);
        }

        let contact = &view.contact;
        let contact_runs: Vec<(String, Option<String>)> = [
            contact.email.as_ref().map(|l| (l.display.clone(), Some(l.href.clone()))),
            contact.phone.as_ref().map(|p| (p.clone(), None)),
            contact.city.as_ref().map(|c| (c.clone(), None)),
            contact.website.as_ref().map(|l| (l.display.clone(), Some(l.href.clone()))),
        ]
        .into_iter()
        .flatten()
        .collect();
        self.place_runs(&contact_runs, width);

        let social_runs: Vec<(String, Option<String>)> = view
            .profiles
            .iter()
            .map(|p| {
                (
                    format!("{}: {}", p.network.label(), p.link.display),
                    Some(p.link.href.clone()),
                )
            })
            .collect();
        self.place_runs(&social_runs, width);

        if with_photo && self.page_index() == 0 {
            let photo_bottom = top - PHOTO_SIZE;
            if self.cursor > photo_bottom {
                let gap = self.cursor - photo_bottom;
                self.advance(gap);
            }
        }
    }

    fn place_section(&mut self, label: &str, block: &Block) {
        let Some(first) = block.lines.first() else {
            return;
        };
        let label_lines = metrics(PdfFont::HelveticaBold).wrap(label, LABEL_SIZE, LABEL_WIDTH - 8.0);
        let label_height = label_lines.len() as f32 * LABEL_SIZE * LINE_SPACING;

        self.ensure(SECTION_GAP + RULE_GAP + label_height.max(first.height()));
        if !self.at_page_top() {
            self.advance(SECTION_GAP);
        }
        self.dashed_rule();
        self.advance(RULE_GAP);

        let top = self.cursor;
        let page = self.page_index();
        for (i, text) in label_lines.iter().enumerate() {
            let baseline = top - LABEL_SIZE - i as f32 * LABEL_SIZE * LINE_SPACING;
            self.text(PADDING, baseline, PdfFont::HelveticaBold, LABEL_SIZE, 0.0, text);
        }
        for line in &block.lines {
            self.place_line(BODY_X, BODY_WIDTH, line);
        }
        if self.page_index() == page {
            let label_bottom = top - label_height;
            if self.cursor > label_bottom {
                let gap = self.cursor - label_bottom;
                self.advance(gap);
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document assembly
// ────────────────────────────────────────────────────────────────────────────

fn font_dictionary(font: PdfFont) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn link_annotation(rect: [f32; 4], uri: &str) -> Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => rect.iter().map(|v| Object::from(*v)).collect::<Vec<Object>>(),
        "Border" => vec![Object::from(0), Object::from(0), Object::from(0)],
        "A" => dictionary! {
            "S" => "URI",
            "URI" => Object::string_literal(uri),
        },
    }
}

fn assemble(pages: Vec<PageOps>, photo: Option<&EmbeddedImage>) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(PdfFont::Helvetica));
    let bold_id = doc.add_object(font_dictionary(PdfFont::HelveticaBold));

    let mut xobjects = Dictionary::new();
    if let Some(img) = photo {
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => img.width as i64,
                "Height" => img.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            img.rgb.clone(),
        ));
        xobjects.set(IMAGE_NAME, image_id);
    }

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            PdfFont::Helvetica.resource_name() => regular_id,
            PdfFont::HelveticaBold.resource_name() => bold_id,
        },
        "XObject" => xobjects,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page.operations,
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

        let annots: Vec<Object> = page
            .links
            .iter()
            .map(|(rect, uri)| doc.add_object(link_annotation(*rect, uri)).into())
            .collect();

        let media_box: Vec<Object> = vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()];
        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box,
            "Resources" => resources_id,
            "Contents" => content_id,
        };
        if !annots.is_empty() {
            page_dict.set("Annots", annots);
        }
        kids.push(doc.add_object(page_dict).into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// WinAnsi bytes for the standard fonts. Latin-1 passes through, a few typographic
/// marks map into the 0x80..0x9F block, anything else becomes '?'.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '•' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '€' => 0x80,
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{SkillEntry, WorkEntry};

    fn sample() -> ProfileDocument {
        let mut doc = ProfileDocument::blank_for("jane@example.com");
        doc.basics.name = "Jane Doe".to_string();
        doc.basics.label = "Backend Engineer".to_string();
        doc.basics.summary = "Builds reliable services.".to_string();
        doc.basics.url = Some("https://jane.dev".to_string());
        doc.work.push(WorkEntry {
            name: "ACME".to_string(),
            position: "Engineer".to_string(),
            start_date: "2021-01".to_string(),
            highlights: vec!["Shipped the billing pipeline".to_string()],
            ..WorkEntry::default()
        });
        doc.skills.push(SkillEntry {
            name: "Languages".to_string(),
            keywords: vec!["Rust".to_string(), "Go".to_string()],
            ..SkillEntry::default()
        });
        doc
    }

    fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(bytes).expect("valid pdf");
        doc.get_pages()
            .values()
            .map(|id| {
                let content = Content::decode(&doc.get_page_content(*id).expect("page content"))
                    .expect("decodable content");
                content
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj")
                    .filter_map(|op| match op.operands.first() {
                        Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_export_contains_header_and_section_labels() {
        let export = export_pdf(&sample(), None).expect("export");
        assert_eq!(export.page_count, 1);
        let texts = page_texts(&export.bytes).concat();
        for expected in ["Jane Doe", "Backend Engineer", "SUMMARY", "SKILLS", "EXPERIENCE", "Engineer, ACME"] {
            assert!(texts.iter().any(|t| t == expected), "missing {expected}: {texts:?}");
        }
        assert!(texts.iter().any(|t| t == "Jan 2021 - Present"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let mut doc = ProfileDocument::blank_for("");
        doc.basics.name = "Only Name".to_string();
        let texts = page_texts(&export_pdf(&doc, None).expect("export").bytes).concat();
        assert_eq!(texts, vec!["Only Name".to_string()]);
    }

    #[test]
    fn test_section_order_follows_print_order() {
        let texts = page_texts(&export_pdf(&sample(), None).expect("export").bytes).concat();
        let at = |label: &str| texts.iter().position(|t| t == label).expect(label);
        assert!(at("SUMMARY") < at("SKILLS"));
        assert!(at("SKILLS") < at("EXPERIENCE"));
    }

    #[test]
    fn test_overflow_continues_on_new_page() {
        let mut doc = sample();
        doc.work = (0..40)
            .map(|i| WorkEntry {
                name: format!("Company {i}"),
                position: "Engineer".to_string(),
                start_date: "2020-01".to_string(),
                highlights: vec!["Did a thing that took a full line of text to describe properly".to_string(); 3],
                ..WorkEntry::default()
            })
            .collect();
        let export = export_pdf(&doc, None).expect("export");
        assert!(export.page_count >= 2);
        assert_eq!(page_texts(&export.bytes).len(), export.page_count);
        assert!(export.used_height > export.available_height);
        assert!(page_texts(&export.bytes).concat().iter().any(|t| t == "Engineer, Company 39"));
    }

    #[test]
    fn test_sparse_profile_uses_part_of_the_page() {
        let export = export_pdf(&sample(), None).expect("export");
        assert!(export.used_height > 0.0);
        assert!(export.used_height < export.available_height);
        assert_eq!(export.available_height, 778.0);
    }

    #[test]
    fn test_urls_become_link_annotations() {
        let export = export_pdf(&sample(), None).expect("export");
        let doc = Document::load_mem(&export.bytes).expect("valid pdf");
        let page_id = *doc.get_pages().values().next().expect("one page");
        let page = doc.get_object(page_id).and_then(Object::as_dict).expect("page dict");
        let annots = page.get(b"Annots").and_then(Object::as_array).expect("annotations");
        // mailto link and website
        assert_eq!(annots.len(), 2);
    }

    #[test]
    fn test_photo_is_drawn_as_xobject() {
        let photo = EmbeddedImage {
            width: 2,
            height: 2,
            rgb: vec![255; 12],
        };
        let export = export_pdf(&sample(), Some(&photo)).expect("export");
        let doc = Document::load_mem(&export.bytes).expect("valid pdf");
        let page_id = *doc.get_pages().values().next().expect("one page");
        let content = Content::decode(&doc.get_page_content(page_id).expect("content")).expect("decode");
        assert!(content.operations.iter().any(|op| op.operator == "Do"));
    }

    #[test]
    fn test_win_ansi_mapping() {
        assert_eq!(win_ansi("a•b"), vec![b'a', 0x95, b'b']);
        assert_eq!(win_ansi("2020\u{2013}2021"), b"2020\x962021".to_vec());
        assert_eq!(win_ansi("é"), vec![0xE9]);
        assert_eq!(win_ansi("日本"), b"??".to_vec());
    }
}
