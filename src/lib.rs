//! # pdfoutline
//!
//! Heading outline inference for PDF documents.
//!
//! Given a PDF, this library produces the document title and a flat list of
//! H1-H4 headings with their page numbers. A usable native outline
//! (bookmarks) is mirrored directly; otherwise headings are inferred from the
//! typography of the text layer.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{extract_outline, render};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!
//!     let json = render::to_json(&outline, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bookmark fast path**: native outlines are used when present
//! - **Typographic inference**: body style and heading styles are found per document
//! - **Numbering aware**: "2.1 Scope" is an H2 whatever its font says
//! - **Parallel processing**: Uses Rayon for multi-page documents

pub mod analysis;
pub mod detect;
pub mod error;
pub mod model;
pub mod options;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{is_pdf_bytes, pdf_version_from_bytes, pdf_version_from_path};
pub use error::{Error, Result};
pub use model::{
    BBox, Bookmark, DocumentOutline, HeadingLevel, Metadata, OutlineEntry, PageContent,
    SourceDocument, Span,
};
pub use options::{ErrorMode, OutlineOptions};
pub use parser::{LopdfSource, PdfSource};
pub use render::JsonFormat;

use std::io::Read;
use std::path::Path;

/// Extract the outline of a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::extract_outline;
///
/// let outline = extract_outline("document.pdf").unwrap();
/// for entry in &outline.outline {
///     println!("{} {} (p. {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<DocumentOutline> {
    OutlineExtractor::new().extract(path)
}

/// Extract the outline of a PDF held in memory.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::extract_outline_from_bytes;
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let outline = extract_outline_from_bytes(&data).unwrap();
/// ```
pub fn extract_outline_from_bytes(data: &[u8]) -> Result<DocumentOutline> {
    OutlineExtractor::new().extract_bytes(data)
}

/// Extract the outline of a PDF read from `reader`.
pub fn extract_outline_from_reader<R: Read>(reader: R) -> Result<DocumentOutline> {
    OutlineExtractor::new().extract_reader(reader)
}

/// Extract the outline of any [`PdfSource`], such as an in-memory
/// [`SourceDocument`].
pub fn extract_outline_from_source<S: PdfSource + ?Sized>(source: &S) -> Result<DocumentOutline> {
    OutlineExtractor::new().extract_source(source)
}

/// Builder for configuring an extraction run.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::OutlineExtractor;
///
/// let outline = OutlineExtractor::new()
///     .lenient()
///     .without_bookmarks()
///     .extract("document.pdf")?;
/// # Ok::<(), pdfoutline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    options: OutlineOptions,
}

impl OutlineExtractor {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options at once.
    pub fn with_options(mut self, options: OutlineOptions) -> Self {
        self.options = options;
        self
    }

    /// Skip pages whose text cannot be extracted instead of failing.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Always infer headings from typography, ignoring native bookmarks.
    pub fn without_bookmarks(mut self) -> Self {
        self.options = self.options.with_bookmarks(false);
        self
    }

    /// Current options.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Extract the outline of a PDF file.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<DocumentOutline> {
        let source = LopdfSource::open(path)?;
        self.extract_source(&source)
    }

    /// Extract the outline of a PDF held in memory.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<DocumentOutline> {
        let source = LopdfSource::from_bytes(data)?;
        self.extract_source(&source)
    }

    /// Extract the outline of a PDF read from `reader`.
    pub fn extract_reader<R: Read>(&self, reader: R) -> Result<DocumentOutline> {
        let source = LopdfSource::from_reader(reader)?;
        self.extract_source(&source)
    }

    /// Extract the outline of an already opened source.
    pub fn extract_source<S: PdfSource + ?Sized>(&self, source: &S) -> Result<DocumentOutline> {
        analysis::extract_outline(source, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_builder() {
        let extractor = OutlineExtractor::new()
            .lenient()
            .sequential()
            .without_bookmarks();

        assert_eq!(extractor.options().error_mode, ErrorMode::Lenient);
        assert!(!extractor.options().parallel);
        assert!(!extractor.options().use_bookmarks);
    }

    #[test]
    fn test_extractor_default() {
        let extractor = OutlineExtractor::default();
        assert_eq!(extractor.options().error_mode, ErrorMode::Strict);
        assert!(extractor.options().parallel);
        assert!(extractor.options().use_bookmarks);
    }

    #[test]
    fn test_extractor_with_options() {
        let options = OutlineOptions::new().with_heading_chars(5, 80);
        let extractor = OutlineExtractor::new().with_options(options);
        assert_eq!(extractor.options().min_heading_chars, 5);
        assert_eq!(extractor.options().max_heading_chars, 80);
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_extract_bytes_empty_data() {
        let data: [u8; 0] = [];
        assert!(matches!(
            extract_outline_from_bytes(&data),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_extract_bytes_unknown_magic() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        assert!(matches!(
            extract_outline_from_bytes(&data),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_extract_bytes_truncated_pdf() {
        // Valid header, nothing behind it
        let result = extract_outline_from_bytes(b"%PDF-1.7\n%garbage");
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_reader_propagates_format_error() {
        let result = extract_outline_from_reader(&b"<!DOCTYPE html>"[..]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_extract_missing_file() {
        let result = extract_outline("/nonexistent/dir/missing.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_extract_from_empty_source() {
        let doc = SourceDocument::new();
        let outline = extract_outline_from_source(&doc).unwrap();
        assert_eq!(outline, DocumentOutline::default());
    }
}
