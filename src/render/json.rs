//! JSON rendering for document outlines.

use crate::error::{Error, Result};
use crate::model::DocumentOutline;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to JSON.
///
/// Produces `{"title": ..., "outline": [{"level": "H1", "text": ..., "page": 1}]}`.
pub fn to_json(outline: &DocumentOutline, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(outline),
        JsonFormat::Compact => serde_json::to_string(outline),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, OutlineEntry};

    fn sample() -> DocumentOutline {
        DocumentOutline::new(
            "Annual Report",
            vec![
                OutlineEntry::new(HeadingLevel::H1, "Introduction", 1),
                OutlineEntry::new(HeadingLevel::H2, "Scope", 2),
            ],
        )
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"Annual Report\""));
        assert!(json.contains("\"level\": \"H2\""));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact_shape() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Annual Report","outline":[{"level":"H1","text":"Introduction","page":1},{"level":"H2","text":"Scope","page":2}]}"#
        );
    }

    #[test]
    fn test_empty_outline_is_empty_array() {
        let json = to_json(&DocumentOutline::default(), JsonFormat::Compact).unwrap();
        assert_eq!(json, r#"{"title":"","outline":[]}"#);
    }

    #[test]
    fn test_non_ascii_unescaped() {
        let outline = DocumentOutline::new(
            "Überblick",
            vec![OutlineEntry::new(HeadingLevel::H1, "日本語の概要", 1)],
        );
        let json = to_json(&outline, JsonFormat::Compact).unwrap();
        assert!(json.contains("Überblick"));
        assert!(json.contains("日本語の概要"));
    }

    #[test]
    fn test_round_trips_through_serde() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        let parsed: DocumentOutline = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
    }
}
