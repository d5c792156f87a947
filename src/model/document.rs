//! Document-level types.

use super::PageContent;
use serde::{Deserialize, Serialize};

/// An in-memory document: metadata, the text layer of each page, and the
/// native bookmark tree.
///
/// This is what [`crate::parser::LopdfSource`] reads out of a PDF file, and
/// it can also be built by hand from spans produced by another parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Document metadata (title, author, etc.)
    pub metadata: Metadata,

    /// Pages in the document
    pub pages: Vec<PageContent>,

    /// Native outline, flattened in depth-first order
    pub bookmarks: Vec<Bookmark>,
}

impl SourceDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&PageContent> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: PageContent) {
        self.pages.push(page);
    }

    /// Add a native outline entry.
    pub fn add_bookmark(&mut self, bookmark: Bookmark) {
        self.bookmarks.push(bookmark);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// Total number of pages
    pub page_count: u32,
}

impl Metadata {
    /// Create metadata carrying only a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

/// One entry of a PDF's native outline (bookmarks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Nesting depth (1 = top level)
    pub level: u8,

    /// Entry title as stored in the PDF
    pub title: String,

    /// Target page number (1-indexed), if the destination resolves
    pub page: Option<u32>,
}

impl Bookmark {
    /// Create a new bookmark.
    pub fn new(level: u8, title: impl Into<String>, page: Option<u32>) -> Self {
        Self {
            level,
            title: title.into(),
            page,
        }
    }
}
