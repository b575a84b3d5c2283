//! Lexical scanning around the cursor.
//!
//! Splits the query at the cursor, extracts the word being typed and
//! classifies the clause the cursor is in. Everything here works on plain
//! text and never fails.

use std::sync::LazyLock;

use regex::Regex;

#[cfg(feature = "tracing")]
use tracing::debug;

use super::patterns::{
    count_quotes, last_statement, mask_closed_groups, mask_string_literals, IDENT_QUOTE,
};
use crate::types::ContextType;

/// The character that forces "show everything" mode.
pub(crate) const TRIGGER_DOT: char = '.';

/// `"A".` at the end of the text
static QUOTED_TRIGGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"\.$"#).expect("Invalid regex pattern"));

/// `A.` at the end of the text
static BARE_TRIGGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_][\w$]*)\.$").expect("Invalid regex pattern"));

/// `"A"."B` with the second identifier unterminated
static QUOTED_DOTTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"\."([^"]*)$"#).expect("Invalid regex pattern"));

/// `A.B` or `"A".B`
static DOTTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:"([^"]*)"|([A-Za-z_][\w$]*))\.([\w$]+)$"#).expect("Invalid regex pattern")
});

/// `"A` with the identifier unterminated
static UNTERMINATED_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)$"#).expect("Invalid regex pattern"));

static TRAILING_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w$]+$").expect("Invalid regex pattern"));

/// Clause keywords, complete only when followed by whitespace or `(`.
static CONTEXT_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(select|from|where|join|order\s+by|group\s+by|having|insert|into|values|update|set|delete)(?:\s|\()",
    )
    .expect("Invalid regex pattern")
});

/// A statement that starts with DELETE
static DELETE_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*delete\b").expect("Invalid regex pattern"));

/// The word under the cursor and how it was typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct WordInfo {
    pub current_word: String,
    pub trigger_character: Option<char>,
    pub is_after_trigger: bool,
    /// Identifier before a `.` at the cursor
    pub qualifier: Option<String>,
}

/// Result of scanning a query at a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Scan<'a> {
    pub text_before: &'a str,
    pub text_after: &'a str,
    pub word: WordInfo,
    pub context_type: ContextType,
}

/// Scans `query` at `cursor_offset`. Out-of-range offsets are clamped.
pub(crate) fn scan(query: &str, cursor_offset: usize) -> Scan<'_> {
    let (text_before, text_after) = split_at_cursor(query, cursor_offset);
    Scan {
        text_before,
        text_after,
        word: extract_word(text_before),
        context_type: classify_context(text_before),
    }
}

/// Splits at the cursor, clamping it to the query and moving it back to the
/// nearest char boundary.
pub(crate) fn split_at_cursor(query: &str, cursor_offset: usize) -> (&str, &str) {
    let mut cursor = cursor_offset.min(query.len());
    while !query.is_char_boundary(cursor) {
        cursor -= 1;
    }
    #[cfg(feature = "tracing")]
    {
        if cursor != cursor_offset {
            debug!(requested = cursor_offset, used = cursor, "cursor offset clamped");
        }
    }
    query.split_at(cursor)
}

/// Extracts the word being typed. The first matching rule wins.
pub(crate) fn extract_word(text_before: &str) -> WordInfo {
    if text_before.ends_with(TRIGGER_DOT) {
        let qualifier = QUOTED_TRIGGER
            .captures(text_before)
            .or_else(|| BARE_TRIGGER.captures(text_before))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        return WordInfo {
            current_word: String::new(),
            trigger_character: Some(TRIGGER_DOT),
            is_after_trigger: true,
            qualifier,
        };
    }

    if let Some(caps) = QUOTED_DOTTED.captures(text_before) {
        return qualified_word(caps.get(1), caps.get(2));
    }

    if let Some(caps) = DOTTED.captures(text_before) {
        return qualified_word(caps.get(1).or_else(|| caps.get(2)), caps.get(3));
    }

    if text_before.ends_with(char::is_whitespace) {
        return WordInfo::default();
    }

    if count_quotes(text_before, IDENT_QUOTE) % 2 == 1 {
        if let Some(word) = UNTERMINATED_QUOTE
            .captures(text_before)
            .and_then(|caps| caps.get(1))
            .filter(|m| !m.as_str().starts_with(char::is_whitespace))
        {
            return WordInfo {
                current_word: word.as_str().to_string(),
                ..WordInfo::default()
            };
        }
    }

    WordInfo {
        current_word: TRAILING_WORD
            .find(text_before.trim_end())
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        ..WordInfo::default()
    }
}

fn qualified_word(
    qualifier: Option<regex::Match<'_>>,
    word: Option<regex::Match<'_>>,
) -> WordInfo {
    WordInfo {
        current_word: word.map(|m| m.as_str().to_string()).unwrap_or_default(),
        trigger_character: None,
        is_after_trigger: false,
        qualifier: qualifier.map(|m| m.as_str().to_string()),
    }
}

/// Classifies the clause at the end of `text_before` by its last complete
/// clause keyword. Keywords inside string literals and closed parenthesized
/// groups are ignored. The FROM of a DELETE statement belongs to the DELETE.
pub(crate) fn classify_context(text_before: &str) -> ContextType {
    let statement = last_statement(text_before);
    let masked = mask_closed_groups(&mask_string_literals(statement));

    let context = CONTEXT_KEYWORD
        .captures_iter(&masked)
        .last()
        .and_then(|caps| caps.get(1))
        .map_or(ContextType::General, |m| keyword_context(m.as_str()));

    if context == ContextType::From && DELETE_STATEMENT.is_match(&masked) {
        ContextType::Delete
    } else {
        context
    }
}

fn keyword_context(keyword: &str) -> ContextType {
    let lower = keyword.to_ascii_lowercase();
    match lower.split_whitespace().next().unwrap_or_default() {
        "select" => ContextType::Select,
        "from" => ContextType::From,
        "where" => ContextType::Where,
        "join" => ContextType::Join,
        "order" => ContextType::Order,
        "group" => ContextType::Group,
        "having" => ContextType::Having,
        "insert" | "into" | "values" => ContextType::Insert,
        "update" | "set" => ContextType::Update,
        "delete" => ContextType::Delete,
        _ => ContextType::General,
    }
}
