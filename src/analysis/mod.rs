//! Heading outline inference.
//!
//! The pipeline runs in three phases over one document:
//!
//! 1. [`PageTextCollector`] rebuilds reading lines from the spans of every
//!    page.
//! 2. [`StyleProfiler`] finds the body style and heading candidates over the
//!    complete line set, and [`assign_levels`] ranks the candidates.
//! 3. [`OutlineAssembler`] filters and emits the headings.
//!
//! [`TitleResolver`] runs first, on its own; its result suppresses the title
//! when it shows up again as a heading. Documents with a usable native
//! outline skip phases 1-3 entirely, and read page 1 only when the metadata
//! title is unusable.

mod assembler;
mod collector;
mod levels;
mod profile;
mod title;

pub use assembler::{normalize_whitespace, OutlineAssembler};
pub use collector::{is_bold_font_name, Line, PageTextCollector, Style};
pub use levels::{assign_levels, LevelMap};
pub use profile::{StyleAnalysis, StyleProfile, StyleProfiler};
pub use title::TitleResolver;

use std::borrow::Cow;

use crate::error::Result;
use crate::model::{DocumentOutline, Metadata, PageContent};
use crate::options::{ErrorMode, OutlineOptions};
use crate::parser::PdfSource;

/// Extract the outline of a document.
///
/// Only failures to read the document are errors. Empty documents and
/// documents without a clear heading hierarchy produce an outline with no
/// entries.
pub fn extract_outline<S>(source: &S, options: &OutlineOptions) -> Result<DocumentOutline>
where
    S: PdfSource + ?Sized,
{
    let metadata = source.metadata();
    let page_count = source.page_count();
    log::debug!("Extracting outline from {} page(s)", page_count);

    let collector = PageTextCollector::new(options);
    let assembler = OutlineAssembler::new(options);
    let resolver = TitleResolver::new(&collector, options.title_region);

    if options.use_bookmarks {
        let entries = assembler.from_bookmarks(&source.bookmarks());
        if !entries.is_empty() {
            log::info!("Using {} native bookmark(s)", entries.len());
            let title = resolver
                .metadata_title(&metadata)
                .unwrap_or_else(|| bookmark_path_title(source, &resolver, &metadata));
            return Ok(DocumentOutline::new(title, entries));
        }
    }

    let first_page = if page_count > 0 {
        load_page(source, 1, options.error_mode)?
    } else {
        None
    };
    let title = resolver.resolve(&metadata, first_page.as_deref());

    let mut pages: Vec<Cow<'_, PageContent>> = Vec::with_capacity(page_count as usize);
    pages.extend(first_page);
    for page_num in 2..=page_count {
        pages.extend(load_page(source, page_num, options.error_mode)?);
    }

    let lines = collector.collect(&pages, options.parallel);
    log::debug!("Reconstructed {} line(s)", lines.len());

    let Some(analysis) = StyleProfiler::new(options).analyze(&lines) else {
        log::debug!("Insufficient typographic signal; returning title only");
        return Ok(DocumentOutline::title_only(title));
    };

    let levels = assign_levels(&analysis.candidates);
    let outline = assembler.assemble(&lines, &levels, &title);
    Ok(DocumentOutline::new(title, outline))
}

/// Title fallback when the outline comes from bookmarks. Page 1 is read only
/// for its text; if that fails the title is empty in either error mode.
fn bookmark_path_title<S>(
    source: &S,
    resolver: &TitleResolver<'_>,
    metadata: &Metadata,
) -> String
where
    S: PdfSource + ?Sized,
{
    if source.page_count() == 0 {
        return String::new();
    }
    match source.page(1) {
        Ok(page) => resolver.resolve(metadata, Some(&*page)),
        Err(e) => {
            log::warn!("Failed to extract text from page 1 for the title: {}", e);
            String::new()
        }
    }
}

/// Load one page, skipping it in lenient mode if its text cannot be read.
fn load_page<S>(
    source: &S,
    page_num: u32,
    mode: ErrorMode,
) -> Result<Option<Cow<'_, PageContent>>>
where
    S: PdfSource + ?Sized,
{
    match source.page(page_num) {
        Ok(page) => Ok(Some(page)),
        Err(e) if mode == ErrorMode::Lenient => {
            log::warn!("Failed to extract text from page {}: {}", page_num, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
