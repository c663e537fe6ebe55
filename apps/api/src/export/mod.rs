//! PDF export and one-page fit analysis.
//!
//! ```text
//! ProfileDocument ─┬─ photo::fetch_image ──▶ EmbeddedImage (optional)
//!                  └─ pdf::export_pdf ─────▶ PdfExport { bytes, page_count, used_height }
//!                                                  │
//!                          page_fill::analyze_page_fill ──▶ FillAction
//! ```

pub mod font_metrics;
pub mod handlers;
pub mod photo;
pub mod page_fill;
pub mod pdf;

use crate::models::profile::{filled, ProfileDocument};
use pdf::{export_pdf, PdfError, PdfExport};
use photo::PhotoSource;

/// Resolves the photo (if any) and lays out the PDF.
pub async fn export_with_photo(
    http: &reqwest::Client,
    doc: &ProfileDocument,
    source: &PhotoSource,
) -> Result<PdfExport, PdfError> {
    let embedded = match filled(&doc.basics.image) {
        Some(url) => photo::fetch_image(http, url, source).await,
        None => None,
    };
    export_pdf(doc, embedded.as_ref())
}

/// `Content-Disposition` file name, from the profile name when there is one.
pub fn download_file_name(doc: &ProfileDocument) -> String {
    let stem: String = doc
        .basics
        .name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "resume.pdf".to_string()
    } else {
        format!("{stem}_resume.pdf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_file_name() {
        let mut doc = ProfileDocument::default();
        assert_eq!(download_file_name(&doc), "resume.pdf");
        doc.basics.name = " Jane O'Doe ".to_string();
        assert_eq!(download_file_name(&doc), "Jane_O_Doe_resume.pdf");
    }

    #[tokio::test]
    async fn test_export_skips_unfetchable_photo() {
        let mut doc = ProfileDocument::blank_for("jane@example.com");
        doc.basics.image = Some("memory://profile/u1/me.png".to_string());
        let source = PhotoSource {
            allowed_prefix: Some("https://cdn.example.com/vitae/".to_string()),
            max_bytes: 1024,
        };
        let export = export_with_photo(&reqwest::Client::new(), &doc, &source)
            .await
            .expect("export");
        assert_eq!(export.page_count, 1);
    }
}
