//! Heading level assignment by descending font size.

use std::collections::BTreeMap;

use crate::model::HeadingLevel;

use super::collector::Style;

/// Lookup from heading style to heading level.
///
/// Entries are ordered by level, bold before regular within a level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelMap {
    entries: Vec<(Style, HeadingLevel)>,
}

impl LevelMap {
    /// Level assigned to a style, if any.
    pub fn get(&self, style: Style) -> Option<HeadingLevel> {
        self.entries
            .iter()
            .find(|(s, _)| *s == style)
            .map(|(_, level)| *level)
    }

    /// All assignments in level order.
    pub fn entries(&self) -> &[(Style, HeadingLevel)] {
        &self.entries
    }

    /// Check if no style has a level.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of styles with a level.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Map heading candidate styles to H1..H4.
///
/// Distinct sizes are ranked largest first and the first four get H1..H4.
/// Smaller sizes get no level at all rather than being folded into H4.
/// Bold and regular variants of one size share a level.
pub fn assign_levels(candidates: &[Style]) -> LevelMap {
    let mut by_size: BTreeMap<u32, Vec<Style>> = BTreeMap::new();
    for style in candidates {
        let group = by_size.entry(style.size).or_default();
        if !group.contains(style) {
            group.push(*style);
        }
    }

    let mut entries = Vec::new();
    for (mut group, level) in by_size.into_values().rev().zip(HeadingLevel::ALL) {
        group.sort_by_key(|s| !s.bold);
        entries.extend(group.into_iter().map(|style| (style, level)));
    }

    LevelMap { entries }
}
