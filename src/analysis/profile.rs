//! Whole-document style statistics.
//!
//! Body and heading styles are relative notions: a 12pt line is a heading
//! in a 10pt document and body text in a 12pt one. The profile therefore
//! needs the complete line sequence before anything can be classified.

use std::collections::HashMap;

use crate::options::OutlineOptions;

use super::collector::{Line, Style};

/// Occurrence statistics of one style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleProfile {
    /// Number of lines set in the style
    pub count: usize,
    /// Total whitespace-separated words over those lines
    pub total_words: usize,
}

impl StyleProfile {
    /// Average words per line.
    pub fn avg_words(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total_words as f64 / self.count as f64
    }
}

/// Outcome of profiling a document with enough typographic signal.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleAnalysis {
    /// Per-style statistics in first-seen order
    pub profiles: Vec<(Style, StyleProfile)>,
    /// The dominant paragraph style
    pub body: Style,
    /// Styles that may carry headings, in first-seen order
    pub candidates: Vec<Style>,
}

/// Computes style statistics and picks body and heading styles.
#[derive(Debug, Clone)]
pub struct StyleProfiler {
    body_max_avg_words: f64,
    heading_max_avg_words: f64,
    min_heading_ratio: f64,
}

impl StyleProfiler {
    /// Create a profiler from extraction options.
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            body_max_avg_words: options.body_max_avg_words,
            heading_max_avg_words: options.heading_max_avg_words,
            min_heading_ratio: options.min_heading_ratio,
        }
    }

    /// Count lines and words per style, keeping first-seen order.
    pub fn profile(&self, lines: &[Line]) -> Vec<(Style, StyleProfile)> {
        let mut index: HashMap<Style, usize> = HashMap::new();
        let mut profiles: Vec<(Style, StyleProfile)> = Vec::new();

        for line in lines {
            let slot = *index.entry(line.style).or_insert_with(|| {
                profiles.push((line.style, StyleProfile::default()));
                profiles.len() - 1
            });
            let profile = &mut profiles[slot].1;
            profile.count += 1;
            profile.total_words += line.text.split_whitespace().count();
        }

        profiles
    }

    /// Determine the body style and heading candidates.
    ///
    /// Returns `None` when the document does not separate headings from body
    /// text clearly enough; no outline is better than a wrong one.
    pub fn analyze(&self, lines: &[Line]) -> Option<StyleAnalysis> {
        let profiles = self.profile(lines);

        // First-seen wins on equal counts
        let mut body: Option<(Style, usize)> = None;
        for (style, profile) in &profiles {
            if profile.avg_words() > self.body_max_avg_words {
                continue;
            }
            if body.map_or(true, |(_, count)| profile.count > count) {
                body = Some((*style, profile.count));
            }
        }
        let Some((body, _)) = body else {
            log::debug!("No style qualifies as body text");
            return None;
        };

        let candidates: Vec<Style> = profiles
            .iter()
            .filter(|(style, profile)| {
                let outranks_body = style.size > body.size
                    || (style.size == body.size && style.bold && !body.bold);
                outranks_body && profile.avg_words() <= self.heading_max_avg_words
            })
            .map(|(style, _)| *style)
            .collect();

        let largest = candidates.iter().map(|s| s.size).max()?;
        if (largest as f64) < body.size as f64 * self.min_heading_ratio {
            log::debug!(
                "Largest heading size {} too close to body size {}",
                largest,
                body.size
            );
            return None;
        }

        log::debug!(
            "Body style {:?}, {} heading candidate(s)",
            body,
            candidates.len()
        );
        Some(StyleAnalysis {
            profiles,
            body,
            candidates,
        })
    }
}

impl Default for StyleProfiler {
    fn default() -> Self {
        Self::new(&OutlineOptions::default())
    }
}
