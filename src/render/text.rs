//! Indented plain text rendering for document outlines.

use crate::model::DocumentOutline;

/// Render the outline as an indented table of contents.
///
/// The title comes first (when there is one), followed by one line per
/// heading, indented two spaces per level below H1.
pub fn to_text(outline: &DocumentOutline) -> String {
    let mut output = String::new();

    if !outline.title.is_empty() {
        output.push_str(&outline.title);
        output.push('\n');
    }

    for entry in &outline.outline {
        let indent = "  ".repeat(usize::from(entry.level.depth() - 1));
        output.push_str(&format!(
            "{}{} {} (p. {})\n",
            indent, entry.level, entry.text, entry.page
        ));
    }

    output.trim_end().to_string()
}
