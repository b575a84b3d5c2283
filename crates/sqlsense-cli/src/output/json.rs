//! JSON output formatting.

use serde::Serialize;

/// Format suggestions, a cursor context or a schema as JSON.
///
/// If `compact` is true, outputs minified JSON without whitespace.
pub fn format_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlsense_core::{complete, CompletionRequest};

    fn suggestions() -> Vec<sqlsense_core::Suggestion> {
        complete(&CompletionRequest::new("SEL", 3, vec![]))
    }

    #[test]
    fn test_json_pretty() {
        let json = format_json(&suggestions(), false).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("\"insertText\": \"SELECT\""));
    }

    #[test]
    fn test_json_compact() {
        let json = format_json(&suggestions(), true).unwrap();
        assert_eq!(
            json,
            r#"[{"label":"SELECT","insertText":"SELECT","kind":"keyword"}]"#
        );
    }
}
