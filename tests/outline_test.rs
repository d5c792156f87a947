//! Integration tests for outline extraction over in-memory documents.

use std::borrow::Cow;

use pdfoutline::error::{Error, Result};
use pdfoutline::render::{to_json, JsonFormat};
use pdfoutline::{
    extract_outline_from_source, Bookmark, DocumentOutline, HeadingLevel, Metadata,
    OutlineEntry, OutlineExtractor, PageContent, PdfSource, SourceDocument,
};

const BODY_FONT: &str = "Helvetica";
const BOLD_FONT: &str = "Helvetica-Bold";
const BODY_TEXT: &str = "the quick brown fox jumps over the lazy dog";

/// Add `count` body lines at 10pt, 15pt apart, starting at `y`.
fn add_body(page: &mut PageContent, y: f32, count: usize) {
    for i in 0..count {
        page.push_text(BODY_TEXT, 72.0, y + i as f32 * 15.0, 10.0, BODY_FONT);
    }
}

fn document(title: Option<&str>, pages: Vec<PageContent>) -> SourceDocument {
    let mut doc = SourceDocument::new();
    if let Some(title) = title {
        doc.metadata = Metadata::with_title(title);
    }
    for page in pages {
        doc.add_page(page);
    }
    doc
}

/// Body text at 10pt, an 18pt bold heading on page 1 and a 14pt regular
/// heading on page 2.
fn synthetic_document() -> SourceDocument {
    let mut page1 = PageContent::letter(1);
    page1.push_text("Introduction", 72.0, 100.0, 18.0, BOLD_FONT);
    add_body(&mut page1, 130.0, 12);

    let mut page2 = PageContent::letter(2);
    page2.push_text("Methods Overview", 72.0, 100.0, 14.0, BODY_FONT);
    add_body(&mut page2, 130.0, 12);

    document(Some("Synthetic Test Document"), vec![page1, page2])
}

fn entry(level: HeadingLevel, text: &str, page: u32) -> OutlineEntry {
    OutlineEntry::new(level, text, page)
}

// ==================== Typographic Inference ====================

#[test]
fn test_synthetic_document_levels() {
    let outline = extract_outline_from_source(&synthetic_document()).unwrap();

    assert_eq!(outline.title, "Synthetic Test Document");
    assert_eq!(
        outline.outline,
        vec![
            entry(HeadingLevel::H1, "Introduction", 1),
            entry(HeadingLevel::H2, "Methods Overview", 2),
        ]
    );
    assert!(!outline.outline.iter().any(|e| e.text == BODY_TEXT));
}

#[test]
fn test_numbering_overrides_style_level() {
    let mut page1 = PageContent::letter(1);
    page1.push_text("Overview", 72.0, 100.0, 18.0, BOLD_FONT);
    add_body(&mut page1, 130.0, 10);

    let mut page2 = PageContent::letter(2);
    page2.push_text("Context", 72.0, 100.0, 14.0, BODY_FONT);
    page2.push_text("1.2 Background", 72.0, 130.0, 12.0, BOLD_FONT);
    add_body(&mut page2, 160.0, 10);

    let doc = document(Some("Numbered Headings"), vec![page1, page2]);
    let outline = extract_outline_from_source(&doc).unwrap();

    assert_eq!(
        outline.outline,
        vec![
            entry(HeadingLevel::H1, "Overview", 1),
            entry(HeadingLevel::H2, "Context", 2),
            // 12pt bold maps to H3, the numbering says H2
            entry(HeadingLevel::H2, "1.2 Background", 2),
        ]
    );
}

#[test]
fn test_urls_and_leaders_never_emitted() {
    let mut page = PageContent::letter(1);
    page.push_text("https://example.com/x", 72.0, 100.0, 18.0, BOLD_FONT);
    page.push_text("Contents ...... 4", 72.0, 130.0, 18.0, BOLD_FONT);
    page.push_text("Results", 72.0, 160.0, 18.0, BOLD_FONT);
    add_body(&mut page, 190.0, 10);

    let doc = document(Some("Noise Filtering"), vec![page]);
    let outline = extract_outline_from_source(&doc).unwrap();

    assert_eq!(outline.outline, vec![entry(HeadingLevel::H1, "Results", 1)]);
}

#[test]
fn test_duplicates_once_per_page() {
    let mut page1 = PageContent::letter(1);
    page1.push_text("Summary", 72.0, 100.0, 16.0, BOLD_FONT);
    add_body(&mut page1, 130.0, 6);
    page1.push_text("Summary", 72.0, 250.0, 16.0, BOLD_FONT);
    add_body(&mut page1, 280.0, 6);

    let mut page2 = PageContent::letter(2);
    page2.push_text("Summary", 72.0, 100.0, 16.0, BOLD_FONT);
    add_body(&mut page2, 130.0, 6);

    let doc = document(Some("Repeated Headings"), vec![page1, page2]);
    let outline = extract_outline_from_source(&doc).unwrap();

    assert_eq!(
        outline.outline,
        vec![
            entry(HeadingLevel::H1, "Summary", 1),
            entry(HeadingLevel::H1, "Summary", 2),
        ]
    );
}

#[test]
fn test_uniform_typography_gives_empty_outline() {
    let mut page = PageContent::letter(1);
    page.push_text("Short line", 72.0, 100.0, 10.0, BODY_FONT);
    add_body(&mut page, 130.0, 20);

    let doc = document(Some("Uniform Typography Report"), vec![page]);
    let outline = extract_outline_from_source(&doc).unwrap();

    assert_eq!(outline.title, "Uniform Typography Report");
    assert!(outline.is_empty());
}

#[test]
fn test_title_from_first_page_and_echo_suppressed() {
    let mut page1 = PageContent::letter(1);
    page1.push_text("Project Plan", 72.0, 80.0, 24.0, BOLD_FONT);
    page1.push_text("Goals", 72.0, 130.0, 16.0, BOLD_FONT);
    add_body(&mut page1, 160.0, 10);

    // Metadata title is a file name, so the first page decides
    let doc = document(Some("plan_v3.docx"), vec![page1]);
    let outline = extract_outline_from_source(&doc).unwrap();

    assert_eq!(outline.title, "Project Plan");
    assert_eq!(outline.outline, vec![entry(HeadingLevel::H2, "Goals", 1)]);
}

#[test]
fn test_running_headers_and_footers_ignored() {
    let mut page1 = PageContent::letter(1);
    page1.push_text("ACME Corp Confidential", 72.0, 20.0, 16.0, BOLD_FONT);
    page1.push_text("Findings", 72.0, 100.0, 16.0, BOLD_FONT);
    add_body(&mut page1, 130.0, 10);
    page1.push_text("Page footer note", 72.0, 760.0, 16.0, BOLD_FONT);

    let doc = document(Some("Margin Handling"), vec![page1]);
    let outline = extract_outline_from_source(&doc).unwrap();

    assert_eq!(outline.outline, vec![entry(HeadingLevel::H1, "Findings", 1)]);
}

#[test]
fn test_split_spans_merge_into_one_heading() {
    let mut page = PageContent::letter(1);
    page.push_text("Key", 72.0, 100.0, 16.0, BOLD_FONT);
    page.push_text("Findings", 110.0, 101.0, 16.0, BOLD_FONT);
    add_body(&mut page, 130.0, 10);

    let doc = document(Some("Span Merging"), vec![page]);
    let outline = extract_outline_from_source(&doc).unwrap();

    assert_eq!(outline.outline, vec![entry(HeadingLevel::H1, "Key Findings", 1)]);
}

// ==================== Bookmark Fast Path ====================

fn bookmarked_document() -> SourceDocument {
    let mut doc = synthetic_document();
    doc.add_bookmark(Bookmark::new(1, "Part One", Some(1)));
    doc.add_bookmark(Bookmark::new(2, "Background", Some(1)));
    doc.add_bookmark(Bookmark::new(3, "Prior Work", Some(2)));
    doc.add_bookmark(Bookmark::new(1, "Part Two", Some(2)));
    doc
}

#[test]
fn test_bookmarks_mirrored_exactly() {
    let outline = extract_outline_from_source(&bookmarked_document()).unwrap();

    assert_eq!(outline.title, "Synthetic Test Document");
    assert_eq!(
        outline.outline,
        vec![
            entry(HeadingLevel::H1, "Part One", 1),
            entry(HeadingLevel::H2, "Background", 1),
            entry(HeadingLevel::H3, "Prior Work", 2),
            entry(HeadingLevel::H1, "Part Two", 2),
        ]
    );
}

#[test]
fn test_bookmarks_can_be_ignored() {
    let outline = OutlineExtractor::new()
        .without_bookmarks()
        .extract_source(&bookmarked_document())
        .unwrap();

    assert_eq!(
        outline.outline,
        vec![
            entry(HeadingLevel::H1, "Introduction", 1),
            entry(HeadingLevel::H2, "Methods Overview", 2),
        ]
    );
}

#[test]
fn test_unusable_bookmarks_fall_back_to_typography() {
    let mut doc = synthetic_document();
    doc.add_bookmark(Bookmark::new(1, "123", Some(1)));
    doc.add_bookmark(Bookmark::new(2, "Orphan", None));

    let outline = extract_outline_from_source(&doc).unwrap();
    assert_eq!(outline.outline[0], entry(HeadingLevel::H1, "Introduction", 1));
}

// ==================== Determinism ====================

#[test]
fn test_identical_input_identical_json() {
    let doc = synthetic_document();
    let first = to_json(&extract_outline_from_source(&doc).unwrap(), JsonFormat::Pretty).unwrap();
    let second = to_json(&extract_outline_from_source(&doc).unwrap(), JsonFormat::Pretty).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_parallel_and_sequential_agree() {
    let mut pages = Vec::new();
    for n in 1..=12 {
        let mut page = PageContent::letter(n);
        page.push_text(&format!("Chapter {}", n), 72.0, 100.0, 18.0, BOLD_FONT);
        page.push_text(&format!("Section {}.1", n), 72.0, 130.0, 14.0, BODY_FONT);
        add_body(&mut page, 160.0, 8);
        pages.push(page);
    }
    let doc = document(Some("Many Pages"), pages);

    let parallel = OutlineExtractor::new().extract_source(&doc).unwrap();
    let sequential = OutlineExtractor::new().sequential().extract_source(&doc).unwrap();

    assert_eq!(parallel, sequential);
    assert_eq!(parallel.len(), 24);
    assert_eq!(parallel.outline[23], entry(HeadingLevel::H2, "Section 12.1", 12));
}

// ==================== Edge Cases ====================

#[test]
fn test_empty_document() {
    let doc = document(Some("Nothing Inside"), Vec::new());
    let outline = extract_outline_from_source(&doc).unwrap();
    assert_eq!(outline, DocumentOutline::title_only("Nothing Inside"));
}

#[test]
fn test_untitled_document_has_empty_title() {
    let mut page = PageContent::letter(1);
    add_body(&mut page, 600.0, 5);
    let doc = document(None, vec![page]);

    let outline = extract_outline_from_source(&doc).unwrap();
    assert_eq!(outline.title, "");
}

/// Source whose page `broken` cannot be read.
struct FlakySource {
    inner: SourceDocument,
    broken: u32,
}

impl PdfSource for FlakySource {
    fn page_count(&self) -> u32 {
        self.inner.page_count()
    }

    fn page(&self, page_num: u32) -> Result<Cow<'_, PageContent>> {
        if page_num == self.broken {
            return Err(Error::TextExtract(format!("Page {}: bad stream", page_num)));
        }
        self.inner.page(page_num)
    }

    fn metadata(&self) -> Metadata {
        self.inner.metadata()
    }

    fn bookmarks(&self) -> Vec<Bookmark> {
        self.inner.bookmarks()
    }
}

#[test]
fn test_strict_mode_fails_on_unreadable_page() {
    let source = FlakySource {
        inner: synthetic_document(),
        broken: 2,
    };
    let result = OutlineExtractor::new().extract_source(&source);
    assert!(matches!(result, Err(Error::TextExtract(_))));
}

#[test]
fn test_lenient_mode_skips_unreadable_page() {
    let source = FlakySource {
        inner: synthetic_document(),
        broken: 2,
    };
    let outline = OutlineExtractor::new()
        .lenient()
        .extract_source(&source)
        .unwrap();

    assert_eq!(outline.title, "Synthetic Test Document");
    assert_eq!(outline.outline, vec![entry(HeadingLevel::H1, "Introduction", 1)]);
}

#[test]
fn test_bookmarks_do_not_need_a_readable_first_page() {
    let source = FlakySource {
        inner: bookmarked_document(),
        broken: 1,
    };
    let outline = OutlineExtractor::new().extract_source(&source).unwrap();
    assert_eq!(outline.title, "Synthetic Test Document");
    assert_eq!(outline.len(), 4);
    assert_eq!(outline.outline[0], entry(HeadingLevel::H1, "Part One", 1));

    // Without a metadata title the page is tried for one, and its failure
    // only costs the title
    let mut untitled = bookmarked_document();
    untitled.metadata = Metadata::default();
    let source = FlakySource {
        inner: untitled,
        broken: 1,
    };
    let outline = OutlineExtractor::new().extract_source(&source).unwrap();
    assert_eq!(outline.title, "");
    assert_eq!(outline.len(), 4);

    // Typographic inference still needs every page in strict mode
    let result = OutlineExtractor::new()
        .without_bookmarks()
        .extract_source(&source);
    assert!(matches!(result, Err(Error::TextExtract(_))));
}
