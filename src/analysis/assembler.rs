//! Outline assembly.
//!
//! Each line runs through an ordered chain of steps. A step either passes the
//! candidate on (possibly changed) or drops it. Surviving candidates are
//! deduplicated by (text, page) and emitted in reading order.

use std::collections::HashSet;

use regex::Regex;

use crate::model::{Bookmark, HeadingLevel, OutlineEntry};
use crate::options::OutlineOptions;

use super::collector::{Line, Style};
use super::levels::LevelMap;

/// A line on its way through the step chain.
#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    text: String,
    page: u32,
    style: Style,
    level: Option<HeadingLevel>,
}

/// Per-document inputs shared by all steps.
struct Context<'a> {
    title: &'a str,
    levels: &'a LevelMap,
}

type Step = fn(&OutlineAssembler, Candidate, &Context<'_>) -> Option<Candidate>;

/// The chain, in the order it runs.
const STEPS: [(&str, Step); 7] = [
    ("length", OutlineAssembler::check_length),
    ("url", OutlineAssembler::reject_url),
    ("toc-leader", OutlineAssembler::reject_toc_leader),
    ("style", OutlineAssembler::lookup_level),
    ("numbering", OutlineAssembler::apply_numbering),
    ("title", OutlineAssembler::suppress_title),
    ("whitespace", OutlineAssembler::normalize_whitespace),
];

/// Turns classified lines, or native bookmarks, into outline entries.
pub struct OutlineAssembler {
    min_chars: usize,
    max_chars: usize,
    url: Regex,
    numbering: Regex,
}

impl OutlineAssembler {
    /// Create an assembler from extraction options.
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            min_chars: options.min_heading_chars,
            max_chars: options.max_heading_chars,
            url: Regex::new(r"^https?://\S+").unwrap(),
            numbering: Regex::new(r"^\s*(\d+(?:\.\d+)*)\s+").unwrap(),
        }
    }

    /// Entries for native bookmarks at levels 1-4 with letters in their
    /// title and a resolvable target page.
    pub fn from_bookmarks(&self, bookmarks: &[Bookmark]) -> Vec<OutlineEntry> {
        bookmarks
            .iter()
            .filter_map(|bookmark| {
                let level = HeadingLevel::from_depth(bookmark.level as usize)?;
                let text = bookmark.title.trim();
                if !text.chars().any(|c| c.is_ascii_alphabetic()) {
                    return None;
                }
                let page = bookmark.page?;
                Some(OutlineEntry::new(level, text, page))
            })
            .collect()
    }

    /// Run every line through the step chain and deduplicate the survivors.
    pub fn assemble(&self, lines: &[Line], levels: &LevelMap, title: &str) -> Vec<OutlineEntry> {
        let ctx = Context { title, levels };
        let mut seen: HashSet<(String, u32)> = HashSet::new();
        let mut outline = Vec::new();

        for line in lines {
            let Some(candidate) = self.run_steps(line, &ctx) else {
                continue;
            };
            let Some(level) = candidate.level else {
                continue;
            };
            if !seen.insert((candidate.text.clone(), candidate.page)) {
                continue;
            }
            outline.push(OutlineEntry::new(level, candidate.text, candidate.page));
        }

        outline
    }

    fn run_steps(&self, line: &Line, ctx: &Context<'_>) -> Option<Candidate> {
        let mut candidate = Candidate {
            text: line.text.clone(),
            page: line.page,
            style: line.style,
            level: None,
        };

        for (name, step) in STEPS {
            match step(self, candidate, ctx) {
                Some(next) => candidate = next,
                None => {
                    log::trace!("Dropped {:?} (page {}) at {}", line.text, line.page, name);
                    return None;
                }
            }
        }

        Some(candidate)
    }

    fn check_length(&self, c: Candidate, _: &Context<'_>) -> Option<Candidate> {
        let len = c.text.chars().count();
        (self.min_chars..=self.max_chars).contains(&len).then_some(c)
    }

    fn reject_url(&self, c: Candidate, _: &Context<'_>) -> Option<Candidate> {
        (!self.url.is_match(&c.text)).then_some(c)
    }

    /// Dot leaders of tables of contents.
    fn reject_toc_leader(&self, c: Candidate, _: &Context<'_>) -> Option<Candidate> {
        (!c.text.contains("....")).then_some(c)
    }

    fn lookup_level(&self, c: Candidate, ctx: &Context<'_>) -> Option<Candidate> {
        let level = ctx.levels.get(c.style)?;
        Some(Candidate {
            level: Some(level),
            ..c
        })
    }

    /// A leading "1", "2.3", "4.5.6" ... sets the level by its dot count,
    /// whatever the typography says.
    fn apply_numbering(&self, c: Candidate, _: &Context<'_>) -> Option<Candidate> {
        let Some(number) = self.numbering.captures(&c.text).and_then(|caps| caps.get(1)) else {
            return Some(c);
        };
        let dots = number.as_str().matches('.').count();
        let level = HeadingLevel::from_depth(dots + 1).unwrap_or(HeadingLevel::H4);
        Some(Candidate {
            level: Some(level),
            ..c
        })
    }

    /// The title is reported separately, so drop its H1 echo on page 1.
    fn suppress_title(&self, c: Candidate, ctx: &Context<'_>) -> Option<Candidate> {
        let is_title_echo = c.page == 1
            && c.level == Some(HeadingLevel::H1)
            && normalize_whitespace(&c.text) == ctx.title;
        (!is_title_echo).then_some(c)
    }

    fn normalize_whitespace(&self, c: Candidate, _: &Context<'_>) -> Option<Candidate> {
        Some(Candidate {
            text: normalize_whitespace(&c.text),
            ..c
        })
    }
}

impl Default for OutlineAssembler {
    fn default() -> Self {
        Self::new(&OutlineOptions::default())
    }
}

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
