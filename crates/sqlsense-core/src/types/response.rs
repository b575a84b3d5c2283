//! Response types for the completion API.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Category of a completion candidate. Drives both filtering and ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Keyword,
    Table,
    Column,
    Function,
    Schema,
    Value,
}

impl SuggestionKind {
    pub const ALL: [SuggestionKind; 6] = [
        SuggestionKind::Keyword,
        SuggestionKind::Table,
        SuggestionKind::Column,
        SuggestionKind::Function,
        SuggestionKind::Schema,
        SuggestionKind::Value,
    ];

    /// Tie-break precedence used after the score (lower sorts first).
    pub fn precedence(self) -> u8 {
        match self {
            SuggestionKind::Keyword => 0,
            SuggestionKind::Function => 1,
            SuggestionKind::Schema => 2,
            SuggestionKind::Table => 3,
            SuggestionKind::Column => 4,
            SuggestionKind::Value => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionKind::Keyword => "keyword",
            SuggestionKind::Table => "table",
            SuggestionKind::Column => "column",
            SuggestionKind::Function => "function",
            SuggestionKind::Schema => "schema",
            SuggestionKind::Value => "value",
        }
    }
}

/// A single completion candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub label: String,
    pub insert_text: String,
    pub kind: SuggestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Suggestion {
    pub fn new(label: impl Into<String>, insert_text: impl Into<String>, kind: SuggestionKind) -> Self {
        Self {
            label: label.into(),
            insert_text: insert_text.into(),
            kind,
            detail: None,
        }
    }

    /// A keyword inserted exactly as labelled.
    pub fn keyword(label: &str) -> Self {
        Self::new(label, label, SuggestionKind::Keyword)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_serialization() {
        let suggestion = Suggestion::new("email", "u.email", SuggestionKind::Column)
            .with_detail("varchar");
        let json = serde_json::to_string(&suggestion).unwrap();
        assert_eq!(
            json,
            r#"{"label":"email","insertText":"u.email","kind":"column","detail":"varchar"}"#
        );

        let keyword = serde_json::to_string(&Suggestion::keyword("WHERE")).unwrap();
        assert!(!keyword.contains("detail"));
    }

    #[test]
    fn test_precedence_is_total() {
        let mut order: Vec<u8> = SuggestionKind::ALL.iter().map(|k| k.precedence()).collect();
        order.sort_unstable();
        order.dedup();
        assert_eq!(order.len(), SuggestionKind::ALL.len());
    }
}
