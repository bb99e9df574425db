//! PDF text extraction backed by lopdf.

use super::TextExtractor;
use lopdf::Document;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Extracts text page by page from PDF files.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn extract(&self, path: &Path) -> String {
        let doc = match Document::load(path) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Error extracting text from PDF {}: {}", path.display(), e);
                return String::new();
            }
        };

        let pages = doc.get_pages();
        let mut text = String::new();

        // A page that fails contributes nothing; the rest still count.
        for page_num in pages.keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => debug!("Page {} yielded no text: {}", page_num, e),
            }
        }

        if text.trim().is_empty() {
            debug!("No extractable text in {} ({} pages)", path.display(), pages.len());
            return String::new();
        }

        debug!("Extracted {} chars from {} pages", text.chars().count(), pages.len());
        text
    }
}
