//! The extracted outline: a title plus H1-H4 entries in reading order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Heading level of an outline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    /// All levels, outermost first.
    pub const ALL: [HeadingLevel; 4] = [Self::H1, Self::H2, Self::H3, Self::H4];

    /// Level for a 1-based depth, if it is within 1..=4.
    pub fn from_depth(depth: usize) -> Option<Self> {
        depth
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    /// 1-based depth of this level.
    pub fn depth(self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
            Self::H4 => 4,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.depth())
    }
}

/// A single heading in the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,

    /// Whitespace-normalized heading text
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,
}

impl OutlineEntry {
    /// Create a new entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Result of an extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOutline {
    /// Resolved document title (empty if none was found)
    pub title: String,

    /// Headings in document reading order
    pub outline: Vec<OutlineEntry>,
}

impl DocumentOutline {
    /// Create an outline.
    pub fn new(title: impl Into<String>, outline: Vec<OutlineEntry>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// An outline with a title and no headings.
    pub fn title_only(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }

    /// Check if no headings were found.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.outline.len()
    }
}
