//! Shared lexical patterns and identifier helpers.
//!
//! All regexes are compiled once on first use. Identifier patterns accept
//! both double-quoted (`"Order Items"`) and bare (`order_items`) parts.
//!
//! Note: keyword matching is ASCII case-insensitive; identifiers may contain
//! any characters inside double quotes.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::NormalizedTableRef;

/// One identifier part: a double-quoted name or a bare word.
pub(crate) const IDENT_PART: &str = r#"(?:"[^"]+"|[A-Za-z_][\w$]*)"#;

/// Double quote used for identifiers.
pub(crate) const IDENT_QUOTE: char = '"';

/// Single quote used for string literals.
pub(crate) const LITERAL_QUOTE: char = '\'';

/// Words that are never table names, even where the grammar expects one.
const RESERVED_WORDS: &[&str] = &[
    "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CREATE", "CROSS", "DELETE",
    "DESC", "DISTINCT", "DROP", "ELSE", "END", "EXCEPT", "EXISTS", "FROM", "FULL", "GROUP",
    "HAVING", "IN", "INNER", "INSERT", "INTERSECT", "INTO", "IS", "JOIN", "LATERAL", "LEFT",
    "LIKE", "LIMIT", "NATURAL", "NOT", "NULL", "OFFSET", "ON", "ONLY", "OR", "ORDER", "OUTER",
    "QUALIFY", "RETURNING", "RIGHT", "SELECT", "SET", "TABLE", "THEN", "UNION", "UPDATE",
    "USING", "VALUES", "WHEN", "WHERE", "WINDOW", "WITH",
];

static SIMPLE_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").expect("Invalid regex pattern"));

/// Returns true for SQL words that cannot stand in for a table name.
pub(crate) fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(word))
}

/// Pattern for a possibly schema-qualified table reference.
pub(crate) fn qualified_ident_pattern() -> String {
    format!("{IDENT_PART}(?:\\.{IDENT_PART})?")
}

/// Splits a dotted identifier into unquoted parts. Dots inside double quotes
/// are kept; `""` inside quotes is an escaped quote.
pub(crate) fn split_identifier_parts(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = text.trim().chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            IDENT_QUOTE if in_quotes && chars.peek() == Some(&IDENT_QUOTE) => {
                current.push(IDENT_QUOTE);
                chars.next();
            }
            IDENT_QUOTE => in_quotes = !in_quotes,
            '.' if !in_quotes => parts.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    parts.push(current);
    parts
}

/// Strips surrounding double quotes from a single identifier part.
pub(crate) fn unquote(part: &str) -> String {
    let trimmed = part.trim();
    if trimmed.len() >= 2 && trimmed.starts_with(IDENT_QUOTE) && trimmed.ends_with(IDENT_QUOTE) {
        trimmed[1..trimmed.len() - 1].replace("\"\"", "\"")
    } else {
        trimmed.to_string()
    }
}

/// Normalizes a table reference as written (`"s"."t"`, `"t"`, `s.t`, `t`).
///
/// Three-part names keep only schema and table. Returns `None` for empty
/// names and reserved words.
pub(crate) fn normalize_table_ref(text: &str) -> Option<NormalizedTableRef> {
    let original = text.trim();
    let mut parts = split_identifier_parts(original);
    let table = parts.pop().filter(|table| !table.is_empty())?;
    if !original.ends_with(IDENT_QUOTE) && is_reserved_word(&table) {
        return None;
    }
    let schema = parts.pop().filter(|schema| !schema.is_empty());
    Some(NormalizedTableRef::new(schema, table, original))
}

/// Quotes an identifier only when it would not parse bare: reserved words
/// and names with characters outside `[A-Za-z0-9_$]`. Case is preserved.
pub(crate) fn quote_ident(name: &str) -> String {
    if SIMPLE_IDENTIFIER.is_match(name) && !is_reserved_word(name) {
        name.to_string()
    } else {
        always_quote(name)
    }
}

/// Wraps an identifier in double quotes, escaping embedded quotes.
pub(crate) fn always_quote(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Number of occurrences of `quote` in `text`.
pub(crate) fn count_quotes(text: &str, quote: char) -> usize {
    text.chars().filter(|&ch| ch == quote).count()
}

/// True when `text` ends inside an unterminated single-quoted literal.
pub(crate) fn inside_open_literal(text: &str) -> bool {
    count_quotes(text, LITERAL_QUOTE) % 2 == 1
}

/// Replaces the contents of single-quoted literals with spaces, preserving
/// byte offsets, so keyword scans never see text inside strings.
pub(crate) fn mask_string_literals(text: &str) -> String {
    let mut masked = String::with_capacity(text.len());
    let mut in_literal = false;
    for ch in text.chars() {
        if ch == LITERAL_QUOTE {
            in_literal = !in_literal;
            masked.push(ch);
        } else if in_literal {
            masked.extend(std::iter::repeat_n(' ', ch.len_utf8()));
        } else {
            masked.push(ch);
        }
    }
    masked
}

/// Blanks out every parenthesized group that is closed before the end of
/// `text`, preserving byte offsets. Unclosed groups are left intact.
pub(crate) fn mask_closed_groups(text: &str) -> String {
    let mut open = Vec::new();
    let mut groups = Vec::new();
    for (pos, byte) in text.bytes().enumerate() {
        match byte {
            b'(' => open.push(pos),
            b')' => {
                if let Some(start) = open.pop() {
                    groups.push(start..pos + 1);
                }
            }
            _ => {}
        }
    }

    let mut masked = text.as_bytes().to_vec();
    // Groups close inner-first, so an outer group covers its inner ones.
    let mut covered_until = 0;
    groups.sort_by_key(|range| range.start);
    for range in groups {
        if range.start < covered_until {
            continue;
        }
        masked[range.clone()].fill(b' ');
        covered_until = range.end;
    }
    String::from_utf8(masked).unwrap_or_else(|_| text.to_string())
}

/// The text after the last `;` that is not inside a string literal.
pub(crate) fn last_statement(text: &str) -> &str {
    let masked = mask_string_literals(text);
    match masked.rfind(';') {
        Some(pos) => &text[pos + 1..],
        None => text,
    }
}

/// Case-insensitive ASCII prefix test that never panics on char boundaries.
pub(crate) fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
