//! Document title resolution.

use std::collections::BTreeMap;

use regex::Regex;

use crate::model::{Metadata, PageContent};

use super::collector::{round_size, PageTextCollector};

/// Authoring tools write this into the Title field of untitled documents.
const PLACEHOLDER_TITLE: &str = "Microsoft Word";

/// Resolves the document title from metadata, falling back to the
/// largest text in the top part of the first page.
pub struct TitleResolver<'a> {
    collector: &'a PageTextCollector,
    title_region: f32,
    filename: Regex,
}

impl<'a> TitleResolver<'a> {
    /// Create a resolver that searches the top `title_region` fraction of page 1.
    pub fn new(collector: &'a PageTextCollector, title_region: f32) -> Self {
        Self {
            collector,
            title_region,
            filename: Regex::new(r"(?i)\.(pdf|docx?|pptx?|xlsx?|cdr)$").unwrap(),
        }
    }

    /// Resolve the title. Returns an empty string when nothing qualifies.
    pub fn resolve(&self, metadata: &Metadata, first_page: Option<&PageContent>) -> String {
        if let Some(title) = self.metadata_title(metadata) {
            return title;
        }

        first_page
            .map(|page| self.largest_text_title(page))
            .unwrap_or_default()
    }

    /// The metadata title, if usable. When this is `Some`, [`resolve`]
    /// never looks at the first page.
    ///
    /// [`resolve`]: TitleResolver::resolve
    pub fn metadata_title(&self, metadata: &Metadata) -> Option<String> {
        let title = self.usable_title(metadata.title.as_deref()?)?;
        log::debug!("Using metadata title {:?}", title);
        Some(title)
    }

    /// Accept a metadata title unless it is too short, a file name, or a
    /// placeholder.
    fn usable_title(&self, raw: &str) -> Option<String> {
        let title = raw.trim();
        let usable = title.chars().count() > 4
            && !self.filename.is_match(title)
            && !title.contains(PLACEHOLDER_TITLE);
        usable.then(|| title.to_string())
    }

    /// Join every line set in the largest font size near the top of the page.
    fn largest_text_title(&self, page: &PageContent) -> String {
        let bottom = page.height * self.title_region;
        let mut by_size: BTreeMap<u32, Vec<String>> = BTreeMap::new();

        for line in self.collector.collect_region(page, 0.0, bottom) {
            if line.text.chars().any(|c| c.is_ascii_alphabetic()) {
                by_size
                    .entry(round_size(line.avg_size))
                    .or_default()
                    .push(line.text);
            }
        }

        by_size
            .pop_last()
            .map(|(_, lines)| lines.join(" "))
            .unwrap_or_default()
    }
}
