//! Document text extraction.
//!
//! Extraction never fails the caller: anything that goes wrong is logged
//! and reported as an empty string.

mod pdf;

pub use pdf::PdfTextExtractor;

#[cfg(test)]
pub(crate) use pdf::tests::write_pdf;

use std::path::Path;

/// Trait for turning a document on disk into plain text.
pub trait TextExtractor: Send + Sync {
    /// Extract all text from the document at `path`.
    ///
    /// Returns an empty string when the file cannot be read or contains
    /// no extractable text.
    fn extract(&self, path: &Path) -> String;
}
