//! Line reconstruction from styled spans.
//!
//! Spans whose top edges fall into the same vertical bucket are merged into
//! one reading line. Only the content band of each page is considered, so
//! running headers and footers never reach the classifier.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::model::{PageContent, Span};
use crate::options::OutlineOptions;

/// Font name fragments that mark a bold-ish weight.
const BOLD_MARKERS: [&str; 5] = ["bold", "black", "heavy", "condb", "cbi"];

/// Classification key of a line: rounded font size and boldness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Style {
    /// Font size rounded to the nearest point
    pub size: u32,
    /// Whether the font name suggests a bold weight
    pub bold: bool,
}

impl Style {
    /// Create a new style.
    pub fn new(size: u32, bold: bool) -> Self {
        Self { size, bold }
    }

    /// Style of a span.
    pub fn of_span(span: &Span) -> Self {
        Self::new(round_size(span.font_size), is_bold_font_name(&span.font_name))
    }
}

/// A reconstructed reading line.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Span texts, trimmed and joined with single spaces
    pub text: String,
    /// Style of the leftmost span
    pub style: Style,
    /// Page number (1-indexed)
    pub page: u32,
    /// Mean font size over all spans of the line
    pub avg_size: f32,
}

/// Check if a font name suggests a bold weight.
///
/// Purely name based: subsetted or obfuscated font names defeat it.
pub fn is_bold_font_name(font_name: &str) -> bool {
    let name = font_name.to_lowercase();
    BOLD_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Round a font size to whole points, ties to even.
pub(crate) fn round_size(size: f32) -> u32 {
    size.round_ties_even().max(0.0) as u32
}

/// Merges per-page spans into ordered lines.
#[derive(Debug, Clone)]
pub struct PageTextCollector {
    margin_top: f32,
    margin_bottom: f32,
    bucket: f32,
}

impl PageTextCollector {
    /// Create a collector from extraction options.
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            margin_top: options.margin_top,
            margin_bottom: options.margin_bottom,
            bucket: options.line_bucket.max(f32::EPSILON),
        }
    }

    /// Lines of every page in reading order.
    ///
    /// Pages are reconstructed independently, in parallel if requested, and
    /// concatenated in the order given.
    pub fn collect<P>(&self, pages: &[P], parallel: bool) -> Vec<Line>
    where
        P: Borrow<PageContent> + Sync,
    {
        let per_page: Vec<Vec<Line>> = if parallel {
            pages
                .par_iter()
                .map(|page| self.collect_page(page.borrow()))
                .collect()
        } else {
            pages
                .iter()
                .map(|page| self.collect_page(page.borrow()))
                .collect()
        };

        per_page.into_iter().flatten().collect()
    }

    /// Lines inside the content band of one page.
    pub fn collect_page(&self, page: &PageContent) -> Vec<Line> {
        let top = page.height * self.margin_top;
        let bottom = page.height * self.margin_bottom;
        self.collect_region(page, top, bottom)
    }

    /// Lines whose spans have their vertical midpoint in `[top, bottom]`.
    pub fn collect_region(&self, page: &PageContent, top: f32, bottom: f32) -> Vec<Line> {
        let mut buckets: BTreeMap<i64, Vec<&Span>> = BTreeMap::new();
        for span in &page.spans {
            let center = span.bbox.center_y();
            if center < top || center > bottom {
                continue;
            }
            let key = (span.baseline() / self.bucket).round_ties_even() as i64;
            buckets.entry(key).or_default().push(span);
        }

        let mut lines = Vec::with_capacity(buckets.len());
        for mut spans in buckets.into_values() {
            spans.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

            let text = spans
                .iter()
                .map(|s| s.text.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if text.is_empty() {
                continue;
            }

            let avg_size = spans.iter().map(|s| s.font_size).sum::<f32>() / spans.len() as f32;
            lines.push(Line {
                text,
                style: Style::of_span(spans[0]),
                page: page.number,
                avg_size,
            });
        }

        lines
    }
}

impl Default for PageTextCollector {
    fn default() -> Self {
        Self::new(&OutlineOptions::default())
    }
}
