//! Document model types.
//!
//! The input side ([`SourceDocument`], [`PageContent`], [`Span`]) is what a
//! PDF parser hands to the analysis; the output side ([`DocumentOutline`],
//! [`OutlineEntry`]) is what the analysis produces.

mod document;
mod outline;
mod span;

pub use document::{Bookmark, Metadata, SourceDocument};
pub use outline::{DocumentOutline, HeadingLevel, OutlineEntry};
pub use span::{BBox, PageContent, Span};
pub(crate) use span::{ASCENT, DESCENT};
