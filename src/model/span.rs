//! Styled text runs as produced by the PDF parser.

use serde::{Deserialize, Serialize};

/// Ascender and descender as fractions of the font size.
pub(crate) const ASCENT: f32 = 0.8;
pub(crate) const DESCENT: f32 = 0.2;

/// An axis-aligned rectangle in page space.
///
/// The origin is the top-left corner of the page and `y` grows downwards,
/// so `y0` is the top edge and `y1` the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    /// Create a new box from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Vertical midpoint.
    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A single run of text sharing one font and size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The text content (not trimmed)
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Bounding box in top-left page coordinates
    pub bbox: BBox,
    /// Page number (1-indexed)
    pub page: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(
        text: impl Into<String>,
        font_size: f32,
        font_name: impl Into<String>,
        bbox: BBox,
        page: u32,
    ) -> Self {
        Self {
            text: text.into(),
            font_size,
            font_name: font_name.into(),
            bbox,
            page,
        }
    }

    /// Estimated baseline, shared by every run of a line whatever its size.
    pub fn baseline(&self) -> f32 {
        self.bbox.y1 - self.font_size * DESCENT
    }
}

/// The text layer of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Spans in content-stream order
    pub spans: Vec<Span>,
}

impl PageContent {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            spans: Vec::new(),
        }
    }

    /// Create an empty US Letter page (612 x 792 points).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Add a span of `text` whose top-left corner is at (`x`, `y`).
    ///
    /// The box is estimated from the font size, which is all the
    /// outline analysis needs.
    pub fn push_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, font_name: &str) {
        let width = text.chars().count() as f32 * font_size * 0.5;
        let bbox = BBox::new(x, y, x + width, y + font_size);
        self.spans
            .push(Span::new(text, font_size, font_name, bbox, self.number));
    }
}
